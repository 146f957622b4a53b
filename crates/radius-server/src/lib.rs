//! RADIUS Server Implementation
//!
//! This crate provides a RADIUS server built on top of the `radius-proto`
//! protocol implementation.
//!
//! # Features
//!
//! - Async I/O with Tokio, one receive loop per port
//! - Authentication (1812) and accounting (1813) ports
//! - Duplicate request suppression
//! - Pluggable request handlers
//! - JSON configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use radius_proto::{MemoryDictionary, Packet};
//! use radius_server::{RadiusServer, RequestHandler, ServerConfig};
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//!
//! struct Handler;
//!
//! impl RequestHandler for Handler {
//!     fn shared_secret(&self, _client: SocketAddr, _packet: Option<&Packet>) -> Option<String> {
//!         Some("secret".to_string())
//!     }
//!
//!     fn user_password(&self, user_name: &str) -> Option<String> {
//!         (user_name == "alice").then(|| "password".to_string())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = RadiusServer::bind(
//!         ServerConfig::new("0.0.0.0".parse()?),
//!         MemoryDictionary::standard().into_shared(),
//!         Arc::new(Handler),
//!     )
//!     .await?;
//!
//!     server.start(true, true)?;
//!     server.join().await;
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod handler;
pub mod server;

pub use cache::{duplicate_key, DuplicateCache};
pub use config::{Client, Config, ConfigError, User};
pub use handler::{access_response, ConfigHandler, RequestHandler};
pub use server::{Dispatch, RadiusServer, ServerConfig, ServerError};
