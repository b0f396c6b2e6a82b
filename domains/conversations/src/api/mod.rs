//! HTTP API for the Conversations domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::ConversationsState;
pub use routes::routes;
