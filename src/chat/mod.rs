//! Messaging platform boundary: inbound webhook models, signature checks and the reply client.

mod events;
mod signature;
mod transport;

pub use events::{MessageContent, PostbackContent, WebhookBody, WebhookEvent};
pub use signature::{SIGNATURE_HEADER, SignatureError, sign_body, verify_signature};
pub use transport::{ChatError, ChatTransport, LineMessagingClient};
