//! Error types for the SAM bridge client.
//!
//! This module provides error handling for everything that can fail when
//! talking to a SAM bridge: I/O, the wire grammar, the handshake, and
//! misuse of the client API itself.

use std::io;
use thiserror::Error;

/// The main error type for all SAM bridge operations.
#[derive(Error, Debug)]
pub enum SamError {
    /// I/O error occurred during communication.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Connection to the SAM bridge failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The client is already connected; disconnect before reconnecting.
    #[error("Already connected to the SAM bridge")]
    AlreadyConnected,

    /// The client is not connected.
    #[error("Not connected to the SAM bridge")]
    NotConnected,

    /// The connection was closed unexpectedly.
    #[error("Connection closed unexpectedly")]
    ConnectionClosed,

    /// The version handshake with the bridge failed.
    #[error("Handshake failed: {0}")]
    HandshakeFailed(String),

    /// A wire line violated the message grammar.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// A well-formed reply was semantically wrong (unexpected module,
    /// operation, or missing key).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The bridge answered a request with a non-OK result code.
    #[error("{request} failed with result {result}")]
    RequestFailed {
        /// The request that was rejected, e.g. `NAMING LOOKUP`.
        request: String,
        /// The `RESULT=` code returned by the bridge.
        result: String,
    },

    /// Attempted to modify a message parsed from the wire.
    #[error("Cannot modify a parsed message")]
    ImmutableMessage,

    /// Invalid argument provided to an operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Timeout waiting for a reply line.
    #[error("Operation timed out")]
    Timeout,
}

/// Result type alias for SAM bridge operations.
pub type Result<T> = std::result::Result<T, SamError>;

/// SAM reply result codes carried in the `RESULT=` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultCode {
    /// The operation succeeded.
    Ok,
    /// A naming lookup did not match any destination.
    KeyNotFound,
    /// The supplied key was not a valid destination key.
    InvalidKey,
    /// The supplied session or stream id was not known.
    InvalidId,
    /// The session id is already in use.
    DuplicatedId,
    /// The destination is already in use by another session.
    DuplicatedDest,
    /// The router reported an internal error.
    I2pError,
    /// The router timed out performing the operation.
    Timeout,
    /// A result code this client does not know about.
    Other(String),
}

impl ResultCode {
    /// Parse a result code from its wire representation.
    pub fn parse(code: &str) -> Self {
        match code {
            "OK" => ResultCode::Ok,
            "KEY_NOT_FOUND" => ResultCode::KeyNotFound,
            "INVALID_KEY" => ResultCode::InvalidKey,
            "INVALID_ID" => ResultCode::InvalidId,
            "DUPLICATED_ID" => ResultCode::DuplicatedId,
            "DUPLICATED_DEST" => ResultCode::DuplicatedDest,
            "I2P_ERROR" => ResultCode::I2pError,
            "TIMEOUT" => ResultCode::Timeout,
            other => ResultCode::Other(other.to_string()),
        }
    }

    /// Get the wire representation of this result code.
    pub fn as_str(&self) -> &str {
        match self {
            ResultCode::Ok => "OK",
            ResultCode::KeyNotFound => "KEY_NOT_FOUND",
            ResultCode::InvalidKey => "INVALID_KEY",
            ResultCode::InvalidId => "INVALID_ID",
            ResultCode::DuplicatedId => "DUPLICATED_ID",
            ResultCode::DuplicatedDest => "DUPLICATED_DEST",
            ResultCode::I2pError => "I2P_ERROR",
            ResultCode::Timeout => "TIMEOUT",
            ResultCode::Other(code) => code,
        }
    }

    /// Check if this result code indicates success.
    pub fn is_ok(&self) -> bool {
        matches!(self, ResultCode::Ok)
    }
}
