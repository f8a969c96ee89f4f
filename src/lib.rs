//! # sam-client
//!
//! A safe, practical Rust client for the SAM bridge protocol of a local
//! I2P router.
//!
//! This crate provides an async client for the SAM v3.0 control channel,
//! allowing you to:
//!
//! - Perform the version handshake over a persistent TCP connection
//! - Resolve human-readable names to destination keys (`NAMING LOOKUP`)
//! - Generate destination key pairs (`DEST GENERATE`)
//! - Send one-shot datagrams over the separate UDP channel
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sam_client::{Result, SamClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Connect to the default bridge (127.0.0.1:7656) and handshake.
//!     let client = SamClient::with_defaults();
//!     client.connect().await?;
//!
//!     // Naming lookup supports internationalized names.
//!     if let Some(destination) = client.lookup("forum.i2p").await? {
//!         println!("forum.i2p = {}", destination);
//!     }
//!
//!     // Generate a fresh destination key pair.
//!     let keys = client.generate_keypair().await?;
//!     println!("public key: {}", keys.public);
//!
//!     client.disconnect().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! The control protocol is strictly half-duplex: the bridge answers the
//! most recent request on the same line-based stream, with no request ids.
//! [`SamClient`] therefore serializes exchanges internally; it can be
//! shared across tasks behind an `Arc` and every caller is guaranteed the
//! reply to its own request:
//!
//! ```rust,no_run
//! # use sam_client::{Result, SamClient};
//! # async fn example() -> Result<()> {
//! use std::sync::Arc;
//!
//! let client = Arc::new(SamClient::with_defaults());
//! client.connect().await?;
//!
//! let a = tokio::spawn({
//!     let client = Arc::clone(&client);
//!     async move { client.lookup("forum.i2p").await }
//! });
//! let b = tokio::spawn({
//!     let client = Arc::clone(&client);
//!     async move { client.generate_keypair().await }
//! });
//! # let _ = (a, b);
//! # Ok(())
//! # }
//! ```
//!
//! ## Datagrams
//!
//! The datagram channel is connectionless and requires no client state:
//!
//! ```rust,no_run
//! # async fn example() -> sam_client::Result<()> {
//! sam_client::send_datagram(
//!     ("127.0.0.1", sam_client::DEFAULT_DATAGRAM_PORT),
//!     "my-session",
//!     "destination-key",
//!     b"hello",
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `tokio-runtime` (default): Enable the async client and datagram
//!   sender using the Tokio runtime. The message codec, configuration, and
//!   error types are available without it.
//!
//! ## Protocol Compatibility
//!
//! This crate speaks SAM version 3.0 as implemented by the I2P router's
//! SAM bridge. Only one protocol version is negotiated; the handshake
//! rejects anything else.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod protocol;
pub mod types;

#[cfg(feature = "tokio-runtime")]
pub mod connection;
#[cfg(feature = "tokio-runtime")]
pub mod datagram;

// Re-export main types for convenience
pub use error::{Result, ResultCode, SamError};

#[cfg(feature = "tokio-runtime")]
pub use connection::SamClient;
#[cfg(feature = "tokio-runtime")]
pub use datagram::{send_datagram, DEFAULT_DATAGRAM_PORT};

pub use config::{SamConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use protocol::SamMessage;
pub use types::KeyPair;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// SAM protocol version spoken by this client.
pub const SAM_VERSION: &str = "3.0";
