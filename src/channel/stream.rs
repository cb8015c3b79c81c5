//! Newline-delimited JSON bridge between a port and a byte stream.
//!
//! Each message is one compact JSON value followed by `\n`. Lines that do not
//! parse, including ones that are not UTF-8 or exceed the length limit, are
//! dropped, the same way unaddressed messages are dropped further up.

use log::{debug, warn};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::channel::port::{Port, message_channel};

/// Maximum accepted line length (16 MB).
pub const MAX_LINE_LENGTH: usize = 16 * 1024 * 1024;

/// Adapt a reader/writer pair to a port.
///
/// Lines read from `reader` arrive on the returned port; messages sent on the
/// returned port are written to `writer`. Must be called inside a tokio runtime.
pub fn bridge_stream<R, W>(reader: R, writer: W) -> Port
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    bridge_stream_with_max_length(reader, writer, MAX_LINE_LENGTH)
}

/// Like [`bridge_stream`], dropping lines longer than `max_length` bytes
/// without buffering them.
pub fn bridge_stream_with_max_length<R, W>(reader: R, writer: W, max_length: usize) -> Port
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (local, remote) = message_channel::<Value>();
    let (inbound, mut outbound) = remote.into_split();

    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();

        loop {
            match read_frame(&mut reader, &mut line, max_length).await {
                Ok(Frame::Eof) => {
                    debug!("Stream reached EOF");
                    break;
                }
                Ok(Frame::Oversized(length)) => {
                    warn!("Dropping oversized line ({} > {} bytes)", length, max_length);
                }
                Ok(Frame::Line) => {
                    let trimmed = line.trim_ascii();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match serde_json::from_slice::<Value>(trimmed) {
                        Ok(message) => {
                            if inbound.send(message).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Dropping unparsable line: {}", e),
                    }
                }
                Err(e) => {
                    warn!("Stream read failed: {}", e);
                    break;
                }
            }
        }
    });

    tokio::spawn(async move {
        let mut writer = writer;
        while let Some(message) = outbound.recv().await {
            let mut json = match serde_json::to_vec(&message) {
                Ok(json) => json,
                Err(e) => {
                    warn!("Failed to serialize outbound message: {}", e);
                    continue;
                }
            };
            json.push(b'\n');
            if let Err(e) = writer.write_all(&json).await {
                warn!("Stream write failed: {}", e);
                break;
            }
            if let Err(e) = writer.flush().await {
                warn!("Stream flush failed: {}", e);
                break;
            }
        }
    });

    local
}

#[derive(Debug, PartialEq)]
enum Frame {
    /// A complete line (without `\n`) is in the buffer
    Line,
    /// A line exceeded the limit and was discarded
    Oversized(usize),
    Eof,
}

/// Read one `\n`-terminated line into `line`, never holding more than
/// `max_length` bytes of it. A trailing line without `\n` counts at EOF.
async fn read_frame<R>(reader: &mut R, line: &mut Vec<u8>, max_length: usize) -> std::io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    line.clear();
    let mut discarded = 0usize;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(match (discarded, line.is_empty()) {
                (0, true) => Frame::Eof,
                (0, false) => Frame::Line,
                (n, _) => Frame::Oversized(n),
            });
        }

        let newline = available.iter().position(|&b| b == b'\n');
        let chunk = &available[..newline.unwrap_or(available.len())];
        if discarded > 0 || line.len() + chunk.len() > max_length {
            discarded += line.len() + chunk.len();
            line.clear();
        } else {
            line.extend_from_slice(chunk);
        }

        let used = newline.map_or(available.len(), |i| i + 1);
        reader.consume(used);

        if newline.is_some() {
            return Ok(if discarded > 0 {
                Frame::Oversized(discarded)
            } else {
                Frame::Line
            });
        }
    }
}
