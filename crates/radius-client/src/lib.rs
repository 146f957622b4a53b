//! RADIUS client
//!
//! Sends Access-Request and Accounting-Request packets over UDP, retrying on
//! timeout, and validates the response identifier and authenticator before
//! handing the answer back.
//!
//! ```no_run
//! use radius_client::RadiusClient;
//! use radius_proto::MemoryDictionary;
//!
//! # async fn run() -> Result<(), radius_client::ClientError> {
//! let client = RadiusClient::new("127.0.0.1", "testing123", MemoryDictionary::standard().into_shared())?;
//! let _accepted = client.authenticate_user("alice", "password").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod endpoint;

pub use client::{ClientError, RadiusClient};
pub use endpoint::RadiusEndpoint;
