//! HTTP gateway implementations of the Podium collaborator traits.
//!
//! - [`HttpConfigSource`]: remote competition configuration document
//! - [`HttpRunQuery`]: experiment-tracking backend queries
//! - [`DiscordRestClient`]: Discord REST v10 message delivery
//!
//! Every gateway borrows a shared `reqwest::Client`; the daemon builds it
//! with a bounded timeout so no outbound call can stall the refresh loop.

pub mod config_source;
pub mod discord;
pub mod tracking;

pub use config_source::HttpConfigSource;
pub use discord::DiscordRestClient;
pub use tracking::HttpRunQuery;
