//! Per-event interaction flow.
//!
//! Each inbound event walks a small state machine and ends in exactly one
//! reply:
//!
//! ```text
//! Idle --text--------------------> Searching --ok--> Rendered
//! Idle --postback(SEARCH_MORE)---> Searching --err-> Failed
//! Idle --postback(ADD_TRACK)-----> Queueing  --ok--> Rendered
//! Idle --postback(malformed)-----> Failed         \-err-> Failed
//! ```
//!
//! Nothing survives between events; a follow-up button carries all the state
//! it needs in its payload.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{CatalogClient, CatalogError};
use crate::pagination::{self, PayloadError, Postback, QueueCommand, SearchQuery};
use crate::render::{self, Reply};

/// What the user did, stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    Postback(String),
}

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error(transparent)]
    MalformedPayload(#[from] PayloadError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("search text is empty")]
    EmptyQuery,
}

#[derive(Debug)]
pub enum RouteState {
    Idle(Inbound),
    Searching(SearchQuery),
    Queueing(QueueCommand),
    Rendered(Reply),
    Failed(InteractionError),
}

impl RouteState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RouteState::Rendered(_) | RouteState::Failed(_))
    }
}

pub struct InteractionRouter {
    catalog: Arc<CatalogClient>,
    default_page_size: u32,
}

impl InteractionRouter {
    pub fn new(catalog: Arc<CatalogClient>, default_page_size: u32) -> Self {
        Self {
            catalog,
            default_page_size,
        }
    }

    /// Produce the reply for one inbound event. Failures become a generic
    /// failure notice.
    pub async fn handle(&self, inbound: Inbound) -> Reply {
        match self.run(inbound).await {
            RouteState::Rendered(reply) => reply,
            RouteState::Failed(e) => {
                warn!(error = %e, "Interaction failed");
                render::render_failure()
            }
            state => {
                warn!(?state, "Interaction stopped in a non-terminal state");
                render::render_failure()
            }
        }
    }

    /// Drive the state machine to a terminal state.
    pub async fn run(&self, inbound: Inbound) -> RouteState {
        let mut state = RouteState::Idle(inbound);
        while !state.is_terminal() {
            state = self.step(state).await;
        }
        state
    }

    pub async fn step(&self, state: RouteState) -> RouteState {
        match state {
            RouteState::Idle(inbound) => self.classify(inbound),
            RouteState::Searching(query) => {
                debug!(terms = %query.terms, offset = query.offset, page_size = query.page_size, "Searching");
                match self
                    .catalog
                    .search(&query.terms, query.offset, query.page_size)
                    .await
                {
                    Ok(page) => RouteState::Rendered(render::render_results(&query, page)),
                    Err(e) => RouteState::Failed(e.into()),
                }
            }
            RouteState::Queueing(command) => {
                match self.catalog.queue_track(&command.track_id).await {
                    Ok(_) => RouteState::Rendered(render::render_queued()),
                    Err(e) => RouteState::Failed(e.into()),
                }
            }
            terminal => terminal,
        }
    }

    fn classify(&self, inbound: Inbound) -> RouteState {
        match inbound {
            Inbound::Text(text) => {
                let terms = text.trim();
                if terms.is_empty() {
                    return RouteState::Failed(InteractionError::EmptyQuery);
                }
                RouteState::Searching(SearchQuery::first_page(terms, self.default_page_size))
            }
            Inbound::Postback(data) => match pagination::decode(&data) {
                Ok(Postback::AddTrack(command)) => RouteState::Queueing(command),
                Ok(Postback::SearchMore(cursor)) => RouteState::Searching(cursor.into_query()),
                Err(e) => RouteState::Failed(e.into()),
            },
        }
    }
}
