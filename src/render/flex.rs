//! Flex message layout.

use serde_json::{Value, json};

use super::{ResultsView, TrackCard};

const BRAND_GREEN: &str = "#1DB954";
const BRAND_BLACK: &str = "#191414";

pub(super) fn text_message(text: &str) -> Value {
    json!({ "type": "text", "text": text })
}

pub(super) fn queued_message() -> Value {
    json!({
        "type": "flex",
        "altText": "Thanks! Your track has been added.",
        "contents": {
            "type": "bubble",
            "size": "kilo",
            "body": {
                "type": "box",
                "layout": "vertical",
                "contents": [{
                    "type": "text",
                    "wrap": true,
                    "contents": [
                        { "type": "span", "text": "Thanks! ", "color": BRAND_GREEN, "weight": "bold" },
                        { "type": "span", "text": "Your track has been added to the playlist.", "color": BRAND_BLACK }
                    ]
                }]
            }
        }
    })
}

pub(super) fn results_message(view: &ResultsView) -> Value {
    let mut bubble = json!({
        "type": "bubble",
        "size": "giga",
        "header": {
            "type": "box",
            "layout": "horizontal",
            "paddingAll": "10px",
            "contents": [{
                "type": "text",
                "text": "Search results",
                "color": "#FFFFFF",
                "size": "xs",
                "weight": "bold"
            }]
        },
        "body": {
            "type": "box",
            "layout": "vertical",
            "spacing": "md",
            "backgroundColor": BRAND_BLACK,
            "contents": view.cards.iter().map(track_row).collect::<Vec<_>>()
        },
        "styles": {
            "header": { "backgroundColor": BRAND_GREEN }
        }
    });

    if let Some(data) = &view.more_data {
        bubble["footer"] = json!({
            "type": "box",
            "layout": "vertical",
            "backgroundColor": BRAND_BLACK,
            "contents": [{
                "type": "button",
                "style": "secondary",
                "action": postback_action("More", data)
            }]
        });
    }

    json!({
        "type": "flex",
        "altText": "Your search results",
        "contents": bubble
    })
}

fn track_row(card: &TrackCard) -> Value {
    let mut columns = Vec::with_capacity(3);

    if let Some(url) = &card.image_url {
        columns.push(json!({
            "type": "box",
            "layout": "vertical",
            "width": "30%",
            "flex": 0,
            "cornerRadius": "5px",
            "contents": [{
                "type": "image",
                "url": url,
                "aspectRatio": "4:3",
                "aspectMode": "cover"
            }]
        }));
    }

    columns.push(json!({
        "type": "box",
        "layout": "vertical",
        "width": "45%",
        "contents": [
            { "type": "text", "text": card.title, "size": "md", "weight": "bold", "color": BRAND_GREEN, "wrap": true },
            { "type": "text", "text": card.artists, "size": "xxs", "color": "#FFFFFF", "wrap": true }
        ]
    }));

    if let Some(data) = &card.add_data {
        columns.push(json!({
            "type": "box",
            "layout": "vertical",
            "width": "20%",
            "contents": [{
                "type": "button",
                "style": "primary",
                "height": "sm",
                "gravity": "bottom",
                "color": BRAND_GREEN,
                "action": postback_action("Add", data)
            }]
        }));
    }

    json!({
        "type": "box",
        "layout": "horizontal",
        "spacing": "xl",
        "cornerRadius": "5px",
        "backgroundColor": BRAND_BLACK,
        "contents": columns
    })
}

fn postback_action(label: &str, data: &str) -> Value {
    json!({ "type": "postback", "label": label, "data": data })
}
