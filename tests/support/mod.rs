//! Local stand-ins for the music catalog and the messaging reply endpoint.

#![allow(dead_code)]

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jukebot::config::Config;

pub const SEARCH_TOTAL: u32 = 25;
pub const CHANNEL_SECRET: &str = "channel-secret";

#[derive(Debug, Default)]
pub struct Recorded {
    pub token_forms: Vec<HashMap<String, String>>,
    pub token_auth: Vec<String>,
    pub searches: Vec<HashMap<String, String>>,
    pub created: Vec<(String, Value)>,
    pub added: Vec<(String, Value)>,
    pub replies: Vec<Value>,
    pub reply_auth: Vec<String>,
}

#[derive(Clone, Default)]
pub struct Upstream {
    pub recorded: Arc<Mutex<Recorded>>,
    pub playlists: Arc<Mutex<Vec<(String, String)>>>,
}

impl Upstream {
    pub fn with_playlists(playlists: &[(&str, &str)]) -> Self {
        let upstream = Self::default();
        *upstream.playlists.lock().unwrap() = playlists
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();
        upstream
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }
}

/// Starts the stub on an ephemeral port and returns its base URL.
pub async fn start_upstream(upstream: Upstream) -> String {
    let app = Router::new()
        .route("/api/token", post(token))
        .route("/v1/search", get(search))
        .route("/v1/me/playlists", get(list_playlists))
        .route("/v1/users/{account}/playlists", post(create_playlist))
        .route("/v1/playlists/{id}/tracks", post(add_tracks))
        .route("/reply", post(reply))
        .with_state(upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    format!("http://{addr}")
}

/// Configuration pointing both upstreams at the stub.
pub fn test_config(base: &str) -> Config {
    let mut config = Config::default();
    config.catalog.client_id = "client-id".to_string();
    config.catalog.client_secret = Some("client-secret".to_string());
    config.catalog.account_id = "owner".to_string();
    config.catalog.redirect_uri = "http://localhost:3000/spotify".to_string();
    config.catalog.accounts_base_url = base.to_string();
    config.catalog.api_base_url = format!("{base}/v1");
    config.chat.access_token = Some("line-token".to_string());
    config.chat.channel_secret = Some(CHANNEL_SECRET.to_string());
    config.chat.api_base_url = base.to_string();
    config
}

fn auth_header(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn token(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let grant_type = form.get("grant_type").cloned().unwrap_or_default();
    let code = form.get("code").cloned().unwrap_or_default();
    {
        let mut recorded = upstream.recorded();
        recorded.token_auth.push(auth_header(&headers));
        recorded.token_forms.push(form);
    }

    match grant_type.as_str() {
        "authorization_code" if code == "bad" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid authorization code" })),
        ),
        "authorization_code" => (
            StatusCode::OK,
            Json(json!({
                "access_token": "stub-access",
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "stub-refresh",
                "scope": "playlist-modify-private"
            })),
        ),
        "refresh_token" => (
            StatusCode::OK,
            Json(json!({
                "access_token": "stub-refreshed",
                "token_type": "Bearer",
                "expires_in": 3600
            })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "unsupported_grant_type" })),
        ),
    }
}

async fn search(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    upstream.recorded().searches.push(params.clone());

    if params.get("q").map(String::as_str) == Some("expired") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "status": 401, "message": "The access token expired" } })),
        );
    }

    let offset: u32 = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit: u32 = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    let end = SEARCH_TOTAL.min(offset + limit);

    let items: Vec<Value> = (offset..end)
        .map(|i| {
            json!({
                "id": format!("t{i}"),
                "name": format!("Track {i}"),
                "popularity": (i * 7) % 100,
                "artists": [{ "name": "Daft Punk" }, { "name": "Pharrell Williams" }],
                "album": {
                    "images": [
                        { "url": format!("https://img.example/{i}/64"), "width": 64 },
                        { "url": format!("https://img.example/{i}/640"), "width": 640 }
                    ]
                }
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "tracks": { "items": items, "total": SEARCH_TOTAL, "offset": offset, "limit": limit }
        })),
    )
}

async fn list_playlists(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    let playlists = upstream.playlists.lock().unwrap().clone();

    let items: Vec<Value> = playlists
        .iter()
        .skip(offset)
        .take(limit)
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();

    Json(json!({ "items": items, "total": playlists.len() }))
}

async fn create_playlist(
    State(upstream): State<Upstream>,
    Path(account): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    upstream.recorded().created.push((account, body));
    upstream
        .playlists
        .lock()
        .unwrap()
        .push(("pl-created".to_string(), name.clone()));

    (
        StatusCode::CREATED,
        Json(json!({ "id": "pl-created", "name": name })),
    )
}

async fn add_tracks(
    State(upstream): State<Upstream>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    upstream.recorded().added.push((id, body));
    (StatusCode::CREATED, Json(json!({ "snapshot_id": "snap-1" })))
}

async fn reply(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut recorded = upstream.recorded();
    recorded.reply_auth.push(auth_header(&headers));
    recorded.replies.push(body);
    Json(json!({}))
}
