pub mod api;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod observability;
pub mod pagination;
pub mod render;
pub mod router;
