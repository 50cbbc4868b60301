//! Line framing for the stdio wire.
//!
//! One JSON object per `\n`-terminated line in both directions. The write
//! side serializes, rejects embedded newlines (a caller contract violation
//! that would desynchronize the stream), appends exactly one newline, and
//! flushes immediately — the child blocks waiting for input, so buffering
//! must not delay delivery. The read side blocks for one full line and
//! never fails on bad bytes: an unparseable line comes back as
//! [`Incoming::Raw`] and end-of-stream as [`Incoming::Absent`].

use std::io;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use mprobe_core::rpc::Incoming;

/// Serialize `message` to one line of JSON and write it, newline-terminated.
///
/// # Errors
///
/// Returns `InvalidData` if the serialized form contains an embedded newline
/// (only possible through a malformed caller-supplied string), or an I/O
/// error if the write or flush fails.
pub async fn write_line<W, T>(writer: &mut W, message: &T) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let json = serde_json::to_string(message)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if json.contains('\n') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "serialized message contains an embedded newline",
        ));
    }
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Block until one full line is available and classify it.
///
/// Blank lines are skipped — the wire convention tolerates an extra blank
/// line between messages.
///
/// # Errors
///
/// Returns an I/O error only when the underlying read fails; parse failures
/// and EOF are data, not errors.
pub async fn read_line<R>(reader: &mut R) -> io::Result<Incoming>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = String::new();
    loop {
        buf.clear();
        let n = reader.read_line(&mut buf).await?;
        if n == 0 {
            return Ok(Incoming::Absent);
        }
        let trimmed = buf.trim();
        if trimmed.is_empty() {
            continue;
        }
        return Ok(match serde_json::from_str(trimmed) {
            Ok(value) => Incoming::Parsed(value),
            Err(_) => Incoming::Raw(trimmed.to_string()),
        });
    }
}
