//! Envelope frame source - the stand-in for the upstream producer callback.
//!
//! Reads a length-delimited stream (`u32` LE frame length, then that many
//! bytes of serialized envelope) and feeds each frame through the channel
//! the dispatcher consumes from.

use std::future::Future;

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// Upper bound on one frame; anything larger is a framing error
const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Where the envelope feed comes from
#[derive(Debug, Clone)]
pub enum EnvelopeInput {
    /// Read frames from stdin
    Stdin,
    /// Read frames from a file
    File(std::path::PathBuf),
}

/// Feed frames from `input` into `tx` until EOF, `max` frames, or `shutdown`
/// resolves.
///
/// Returns the number of frames fed. Stops quietly when the receiver is
/// dropped (the dispatcher aborted). A shutdown takes effect at the next
/// frame boundary; frames already in the channel still reach the dispatcher,
/// which drains them and closes its sinks normally.
pub async fn feed_frames(
    input: EnvelopeInput,
    tx: mpsc::Sender<Bytes>,
    max: Option<u64>,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<u64> {
    match input {
        EnvelopeInput::Stdin => feed(tokio::io::stdin(), tx, max, shutdown).await,
        EnvelopeInput::File(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open envelope input {}", path.display()))?;
            feed(BufReader::new(file), tx, max, shutdown).await
        }
    }
}

async fn feed<R: AsyncRead + Unpin>(
    mut reader: R,
    tx: mpsc::Sender<Bytes>,
    max: Option<u64>,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<u64> {
    tokio::pin!(shutdown);
    let mut count: u64 = 0;

    loop {
        if let Some(max) = max {
            if count >= max {
                debug!(frames = count, "Envelope limit reached");
                break;
            }
        }

        let header = tokio::select! {
            biased;
            _ = &mut shutdown => {
                debug!(frames = count, "Shutdown requested, stopping feed");
                break;
            }
            header = read_frame_len(&mut reader) => header?,
        };
        let len = match header {
            Some(len) => len,
            None => break, // clean EOF at a frame boundary
        };
        if len > MAX_FRAME_LEN {
            bail!("frame length {len} exceeds maximum {MAX_FRAME_LEN}");
        }

        let mut frame = vec![0u8; len];
        reader
            .read_exact(&mut frame)
            .await
            .context("truncated frame body")?;

        if tx.send(Bytes::from(frame)).await.is_err() {
            debug!(frames = count, "Dispatcher gone, stopping feed");
            break;
        }
        count += 1;
    }

    Ok(count)
}

/// Read the 4-byte LE frame length; `None` on clean EOF before any byte.
async fn read_frame_len<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<usize>> {
    let mut len_bytes = [0u8; 4];
    let mut filled = 0;

    while filled < len_bytes.len() {
        let n = reader
            .read(&mut len_bytes[filled..])
            .await
            .context("failed to read frame header")?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            bail!("truncated frame header ({filled} of 4 bytes)");
        }
        filled += n;
    }

    Ok(Some(u32::from_le_bytes(len_bytes) as usize))
}
