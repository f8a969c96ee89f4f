//! One-shot datagram sending through the SAM bridge.
//!
//! The datagram channel is separate from the control channel: each send
//! opens an ephemeral UDP socket, writes a single header line followed by
//! the raw payload bytes, and closes it. No handshake, no locking, no
//! session state on this side.

use crate::error::{Result, SamError};
use crate::SAM_VERSION;

use tokio::net::UdpSocket;
use tracing::debug;

/// Default UDP port of the SAM bridge datagram channel.
pub const DEFAULT_DATAGRAM_PORT: u16 = 7655;

/// Send one datagram to a target destination through the SAM bridge.
///
/// `addr` is the bridge's datagram endpoint (conventionally
/// `127.0.0.1:7655`, see [`DEFAULT_DATAGRAM_PORT`]) and is always passed
/// explicitly rather than read from ambient state. The wire format is the
/// ASCII header `"3.0 <session_id> <target>\n"` followed immediately by the
/// payload bytes, all in a single datagram.
///
/// `session_id` must name a datagram session previously created on the
/// control channel; `target` is the destination key of the receiver.
/// Neither may contain whitespace, since both live on the one-line header.
pub async fn send_datagram(
    addr: impl tokio::net::ToSocketAddrs,
    session_id: &str,
    target: &str,
    payload: &[u8],
) -> Result<()> {
    check_header_token("session id", session_id)?;
    check_header_token("target", target)?;

    let mut buf = Vec::with_capacity(payload.len() + 64);
    buf.extend_from_slice(format!("{} {} {}\n", SAM_VERSION, session_id, target).as_bytes());
    buf.extend_from_slice(payload);

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    let sent = socket.send_to(&buf, addr).await?;
    if sent != buf.len() {
        return Err(SamError::ConnectionFailed(format!(
            "datagram truncated: sent {} of {} bytes",
            sent,
            buf.len()
        )));
    }

    debug!(
        "Sent {} payload bytes as a datagram on session {}",
        payload.len(),
        session_id
    );
    Ok(())
}

fn check_header_token(what: &str, value: &str) -> Result<()> {
    if value.is_empty() || value.contains(char::is_whitespace) {
        return Err(SamError::InvalidArgument(format!(
            "{} '{}' must be non-empty and contain no whitespace",
            what, value
        )));
    }
    Ok(())
}
