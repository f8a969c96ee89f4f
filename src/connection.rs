//! SAM bridge connection and client.
//!
//! This module provides the main client for connecting to and
//! communicating with a SAM bridge over its control channel.

use crate::config::SamConfig;
use crate::error::{Result, ResultCode, SamError};
use crate::protocol::SamMessage;
use crate::types::KeyPair;
use crate::SAM_VERSION;

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, trace};

/// The reader and writer halves of an established bridge connection.
struct Connection {
    reader: BufReader<tokio::net::tcp::OwnedReadHalf>,
    writer: BufWriter<tokio::net::tcp::OwnedWriteHalf>,
}

impl Connection {
    /// Write one message line to the bridge.
    async fn write_line(&mut self, line: &str) -> Result<()> {
        trace!("Sending line: {}", line);
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Read one line from the bridge within the given deadline.
    ///
    /// The deadline is measured from the moment the read begins. Elapsing
    /// it fails with [`SamError::Timeout`]; a clean EOF fails with
    /// [`SamError::ConnectionClosed`].
    async fn read_line(&mut self, timeout: Duration) -> Result<String> {
        let mut line = String::new();
        let bytes_read = tokio::time::timeout(timeout, self.reader.read_line(&mut line))
            .await
            .map_err(|_| SamError::Timeout)??;

        if bytes_read == 0 {
            return Err(SamError::ConnectionClosed);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']);
        trace!("Received line: {}", trimmed);
        Ok(trimmed.to_string())
    }
}

/// A client for communicating with a SAM bridge.
///
/// The client owns a single persistent TCP connection. Any number of tasks
/// may share it behind an `Arc`: every request/response exchange runs under
/// an internal lock, so exchanges are serialized and a caller always
/// receives the reply to the request it just sent. The protocol itself is
/// strictly half-duplex with no request ids, which makes that pairing the
/// correctness-critical invariant of the whole client.
pub struct SamClient {
    config: SamConfig,
    inner: Mutex<Option<Connection>>,
}

impl SamClient {
    /// Create an unconnected client with the given configuration.
    pub fn new(config: SamConfig) -> Self {
        SamClient {
            config,
            inner: Mutex::new(None),
        }
    }

    /// Create an unconnected client with default settings
    /// (bridge at 127.0.0.1:7656).
    pub fn with_defaults() -> Self {
        Self::new(SamConfig::default())
    }

    /// The configuration this client was created with.
    pub fn config(&self) -> &SamConfig {
        &self.config
    }

    /// Connect to the SAM bridge and perform the version handshake.
    ///
    /// Sends `HELLO VERSION MIN=3.0 MAX=3.0` and requires a
    /// `HELLO REPLY RESULT=OK VERSION=3.0` answer within the configured
    /// handshake timeout. Fails with [`SamError::AlreadyConnected`] on a
    /// connected client; a handshake failure releases the socket, so the
    /// client can be connected again.
    pub async fn connect(&self) -> Result<()> {
        let mut guard = self.inner.lock().await;
        if guard.is_some() {
            return Err(SamError::AlreadyConnected);
        }

        let endpoint = self.config.endpoint();
        let stream = tokio::time::timeout(
            self.config.connect_timeout,
            TcpStream::connect((self.config.host.as_str(), self.config.port)),
        )
        .await
        .map_err(|_| SamError::ConnectionFailed(format!("connect to {} timed out", endpoint)))??;
        debug!("Connected to SAM bridge at {}", endpoint);

        let (read_half, write_half) = stream.into_split();
        let mut conn = Connection {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        };

        // The connection is stored only after a successful handshake; any
        // failure drops it here and releases the socket.
        self.handshake(&mut conn).await?;
        debug!("Handshake complete, negotiated SAM {}", SAM_VERSION);

        *guard = Some(conn);
        Ok(())
    }

    /// Perform the version handshake on a fresh connection.
    async fn handshake(&self, conn: &mut Connection) -> Result<()> {
        let mut hello = SamMessage::new("HELLO", "VERSION");
        hello.set("MIN", SAM_VERSION)?;
        hello.set("MAX", SAM_VERSION)?;
        conn.write_line(&hello.to_line()).await?;

        let line = conn.read_line(self.config.handshake_timeout).await?;
        let reply = SamMessage::parse(&line)?;
        if !reply.validate(
            "HELLO",
            "REPLY",
            &[&["RESULT", "OK"], &["VERSION", SAM_VERSION]],
        ) {
            return Err(SamError::HandshakeFailed(format!(
                "expected HELLO REPLY RESULT=OK VERSION={}, got '{}'",
                SAM_VERSION, line
            )));
        }
        Ok(())
    }

    /// Send a request and read its reply, as one atomic exchange.
    ///
    /// The internal lock is held across the whole write-then-read cycle, so
    /// concurrent callers are queued and never interleave on the wire. The
    /// timeout bounds the read of the reply line; on [`SamError::Timeout`]
    /// the connection stays open but must be considered desynchronized (a
    /// late reply may still arrive), so the caller should
    /// [`disconnect`](SamClient::disconnect) and reconnect.
    pub async fn exchange(&self, request: &SamMessage, timeout: Duration) -> Result<SamMessage> {
        let mut guard = self.inner.lock().await;
        let conn = guard.as_mut().ok_or(SamError::NotConnected)?;

        conn.write_line(&request.to_line()).await?;
        let line = conn.read_line(timeout).await?;
        SamMessage::parse(&line)
    }

    /// Check whether the client currently holds a bridge connection.
    pub async fn is_connected(&self) -> bool {
        self.inner.lock().await.is_some()
    }

    /// Disconnect from the bridge, releasing the socket.
    ///
    /// Idempotent: disconnecting an unconnected client does nothing.
    pub async fn disconnect(&self) {
        let mut guard = self.inner.lock().await;
        if guard.take().is_some() {
            debug!("Disconnected from SAM bridge");
        }
    }

    // ==================== Operations ====================

    /// Look up the destination key for a human-readable name.
    ///
    /// The name is converted to its ASCII (punycode) form before being sent,
    /// so internationalized names like `😺😺😺.i2p` work. Returns `Ok(None)`
    /// when the bridge reports `KEY_NOT_FOUND`; any other non-OK result code
    /// fails with [`SamError::RequestFailed`].
    pub async fn lookup(&self, name: &str) -> Result<Option<String>> {
        let ascii = idna::domain_to_ascii(name).map_err(|_| {
            SamError::InvalidArgument(format!("'{}' is not a valid destination name", name))
        })?;

        let mut request = SamMessage::new("NAMING", "LOOKUP");
        request.set("NAME", &ascii)?;
        let reply = self.exchange(&request, self.config.exchange_timeout).await?;

        if !reply.validate("NAMING", "REPLY", &[&["RESULT"]]) {
            return Err(SamError::Protocol(format!(
                "expected NAMING REPLY with a RESULT, got '{}'",
                reply
            )));
        }

        // validate() guarantees RESULT is present.
        let result = reply.get("RESULT").unwrap_or_default();
        match ResultCode::parse(result) {
            ResultCode::Ok => {
                let value = reply.get("VALUE").ok_or_else(|| {
                    SamError::Protocol(format!("NAMING REPLY RESULT=OK without VALUE: '{}'", reply))
                })?;
                Ok(Some(value.to_string()))
            }
            ResultCode::KeyNotFound => Ok(None),
            other => Err(SamError::RequestFailed {
                request: "NAMING LOOKUP".to_string(),
                result: other.as_str().to_string(),
            }),
        }
    }

    /// Generate a fresh destination key pair on the router.
    pub async fn generate_keypair(&self) -> Result<KeyPair> {
        let request = SamMessage::new("DEST", "GENERATE");
        let reply = self.exchange(&request, self.config.exchange_timeout).await?;

        if !reply.validate("DEST", "REPLY", &[&["PUB"], &["PRIV"]]) {
            return Err(SamError::Protocol(format!(
                "expected DEST REPLY with PUB and PRIV, got '{}'",
                reply
            )));
        }

        let public = reply.get("PUB").unwrap_or_default();
        let private = reply.get("PRIV").unwrap_or_default();
        Ok(KeyPair::new(public, private))
    }
}
