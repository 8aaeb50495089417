/// Meridian API client library
/// Owns the outbound half of the connector: static credentials, the request
/// signer and the single signed HTTP round trip every operation performs.

pub mod client;
pub mod config;
pub mod signature;

pub use client::MeridianClient;
pub use config::MeridianConfig;
pub use signature::{sign, unix_timestamp, SignatureHeaders};
