use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
};
use http_body_util::BodyExt;
use std::collections::HashMap;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use super::{
    models::{CallbackQuery, HealthResponse},
    state::AppState,
};
use crate::api::error::ApiError;
use crate::catalog::{CatalogError, authorize_url};
use crate::chat::{MessageContent, SIGNATURE_HEADER, WebhookBody, WebhookEvent, verify_signature};
use crate::render::Reply;
use crate::router::Inbound;

pub const LOGIN_SUCCEEDED: &str = "Login successful! You can return to the chat.";
pub const LOGIN_FAILED: &str = "Login failed. Please try again from the authorization link.";

/// Messaging webhook (POST {webhook_path})
///
/// The body must be signed with the channel secret before anything in it is
/// trusted. Every event in the batch is handled on its own task and answered through
/// its own reply token. The response is sent once all of them finished;
/// failures inside an event never change the status code.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    super::utils::require_json(&headers)?;

    let body_bytes = read_body(body, state.config.server.max_payload_bytes).await?;
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    if let Err(e) = verify_signature(
        state.config.chat.channel_secret.as_deref(),
        signature,
        &body_bytes,
    ) {
        warn!(error = %e, "Rejecting unsigned webhook");
        return Err(e.into());
    }

    let payload: WebhookBody = serde_json::from_slice(&body_bytes)?;
    debug!(
        events = payload.events.len(),
        destination = payload.destination.as_deref().unwrap_or("-"),
        "Webhook received"
    );

    let mut tasks = JoinSet::new();
    for event in payload.events {
        let span = info_span!("event", delivery_id = %Uuid::now_v7(), kind = event.kind());
        tasks.spawn(handle_event(state.clone(), event).instrument(span));
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Event task aborted");
        }
    }

    Ok(StatusCode::OK)
}

async fn handle_event(state: AppState, event: WebhookEvent) {
    state.metrics.event_received();

    let (reply_token, inbound) = match event {
        WebhookEvent::Message {
            reply_token,
            message: MessageContent::Text { text },
        } => (reply_token, Inbound::Text(text)),
        WebhookEvent::Postback {
            reply_token,
            postback,
        } => (reply_token, Inbound::Postback(postback.data)),
        other => {
            debug!(kind = other.kind(), "Ignoring unsupported event");
            return;
        }
    };

    let reply = state.router.handle(inbound).await;
    match &reply {
        Reply::Results(_) | Reply::NoResults => state.metrics.search_served(),
        Reply::Queued => state.metrics.track_queued(),
        Reply::Failure => state.metrics.failure_rendered(),
    }

    match state
        .transport
        .reply(&reply_token, vec![reply.to_message()])
        .await
    {
        Ok(()) => state.metrics.reply_sent(),
        Err(e) => {
            state.metrics.reply_failed();
            warn!(error = %e, "Reply delivery failed");
        }
    }
}

/// Reads request body and validates size
///
/// Decompression is handled by `RequestDecompressionLayer`.
async fn read_body(body: axum::body::Body, max_size: usize) -> Result<Vec<u8>, ApiError> {
    let data = body
        .collect()
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .to_bytes()
        .to_vec();

    super::utils::validate_body_size(&data, max_size)?;

    Ok(data)
}

/// Authorization callback (GET {callback_path})
///
/// Exchanges the code for tokens. Playlist resolution continues in the
/// background and is not awaited here.
pub async fn authorization_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> impl IntoResponse {
    if let Some(reason) = query.error {
        warn!(%reason, "Authorization declined");
        return (StatusCode::BAD_REQUEST, LOGIN_FAILED);
    }

    let Some(code) = query.code.filter(|code| !code.is_empty()) else {
        warn!("Authorization callback without code");
        return (StatusCode::BAD_REQUEST, LOGIN_FAILED);
    };

    match state.catalog.exchange_authorization_code(&code).await {
        Ok(()) => {
            state.metrics.authorization_completed();
            info!("Account connected");
            (StatusCode::OK, LOGIN_SUCCEEDED)
        }
        Err(e @ CatalogError::AuthExchange(_)) => {
            warn!(error = %e, "Authorization code rejected");
            (StatusCode::BAD_REQUEST, LOGIN_FAILED)
        }
        Err(e) => {
            error!(error = %e, "Authorization exchange failed");
            (StatusCode::BAD_REQUEST, LOGIN_FAILED)
        }
    }
}

/// Login redirect (GET /authorize)
pub async fn authorize(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let url = authorize_url(&state.config.catalog, &Uuid::new_v4().simple().to_string())?;
    Ok(Redirect::to(url.as_str()))
}

/// Health check endpoint (GET /health)
///
/// Always answers 200 while the process is serving; `status` is `ready` once
/// a credential is held and the target playlist is resolved, otherwise
/// `awaiting_authorization`.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let credential = if state.catalog.is_credential_valid().await {
        "valid"
    } else if state.catalog.has_credential().await {
        "expired"
    } else {
        "missing"
    };
    let playlist = match state.catalog.target_playlist().await {
        Some(_) => "resolved",
        None => "unresolved",
    };

    let mut components = HashMap::new();
    components.insert("api".to_string(), "healthy".to_string());
    components.insert("credential".to_string(), credential.to_string());
    components.insert("playlist".to_string(), playlist.to_string());

    let status = if credential != "missing" && playlist == "resolved" {
        "ready"
    } else {
        "awaiting_authorization"
    };
    let response = HealthResponse {
        status: status.to_string(),
        components,
        metrics: state.metrics.snapshot(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}
