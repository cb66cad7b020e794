//! Shared building blocks for the scoreqr workspace: code alphabet and
//! generation, API-key derivation, env config loading, health handlers,
//! request-id middleware, pagination types, and tracing setup.

pub mod apikey;
pub mod code;
pub mod config;
pub mod health;
pub mod middleware;
pub mod pagination;
pub mod serde;
pub mod tracing;
