//! Turns search pages and queue results into chat replies.
//!
//! Rendering is pure: the same page always yields the same [`Reply`]. The
//! typed view ([`ResultsView`]) is what callers and tests inspect; the
//! platform's Flex message JSON is produced from it by [`Reply::to_message`].

mod flex;

use tracing::warn;

use crate::catalog::{SearchPage, Track};
use crate::pagination::{self, Postback, QueueCommand, SearchQuery};

/// A track as shown in a result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackCard {
    pub track_id: String,
    pub title: String,
    pub artists: String,
    pub popularity: u32,
    pub image_url: Option<String>,
    /// Postback data of the "Add" button.
    pub add_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub cards: Vec<TrackCard>,
    /// Postback data of the "More" button, when more results exist.
    pub more_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Results(ResultsView),
    NoResults,
    Queued,
    Failure,
}

impl Reply {
    /// Platform message object for this reply.
    pub fn to_message(&self) -> serde_json::Value {
        match self {
            Reply::Results(view) => flex::results_message(view),
            Reply::NoResults => flex::text_message("No tracks found. Try different keywords."),
            Reply::Queued => flex::queued_message(),
            Reply::Failure => flex::text_message("Sorry, something went wrong. Please try again."),
        }
    }
}

/// Render one page of results for `query`.
///
/// Items are ordered by popularity, most popular first; equal scores keep
/// upstream order. A "More" action is attached iff the catalog reports
/// matches beyond this page.
pub fn render_results(query: &SearchQuery, page: SearchPage) -> Reply {
    if page.items.is_empty() {
        return Reply::NoResults;
    }

    let more_data = if page.has_more() {
        let current = SearchQuery {
            terms: query.terms.clone(),
            offset: page.offset,
            page_size: page.page_size,
        };
        encode_or_warn(&Postback::SearchMore(current.next_cursor()))
    } else {
        None
    };

    let mut items = page.items;
    items.sort_by(|a, b| b.popularity.cmp(&a.popularity));

    Reply::Results(ResultsView {
        cards: items.into_iter().map(track_card).collect(),
        more_data,
    })
}

pub fn render_queued() -> Reply {
    Reply::Queued
}

pub fn render_failure() -> Reply {
    Reply::Failure
}

/// Artist names joined in catalog order.
pub fn artist_label(artists: &[String]) -> String {
    artists.join(", ")
}

/// Widest artwork variant; the first one wins among equal widths.
pub fn largest_artwork(track: &Track) -> Option<&str> {
    let mut variants: Vec<_> = track.artwork.iter().collect();
    variants.sort_by(|a, b| b.width.cmp(&a.width));
    variants.first().map(|a| a.url.as_str())
}

fn track_card(track: Track) -> TrackCard {
    TrackCard {
        image_url: largest_artwork(&track).map(str::to_string),
        artists: artist_label(&track.artists),
        popularity: track.popularity,
        add_data: encode_or_warn(&Postback::AddTrack(QueueCommand {
            track_id: track.id.clone(),
        })),
        title: track.name,
        track_id: track.id,
    }
}

fn encode_or_warn(postback: &Postback) -> Option<String> {
    match pagination::encode(postback) {
        Ok(data) => Some(data),
        Err(e) => {
            warn!(error = %e, "Dropping button with unencodable payload");
            None
        }
    }
}
