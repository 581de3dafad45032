//! Amadeus self-service flight search adapter
//!
//! Authenticates with OAuth client credentials. Access tokens are cached in
//! memory and refreshed shortly before they expire.

mod client;
mod token_cache;
mod types;

pub use client::AmadeusClient;
pub use token_cache::TokenCache;
