// crates/gateway/src/lib.rs
pub mod adapters;
pub mod backend;
pub mod config;
pub mod enrich;
pub mod error;
pub mod http_api;
pub mod session;

pub use error::BridgeError;
