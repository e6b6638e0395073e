//! Line-oriented state source and action sink.
//!
//! - In: one JSON state snapshot per line. A `null` line is a removal
//!   notification. Blank lines are ignored, malformed lines logged and skipped.
//! - Out: one JSON action request per line.

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use discoverystream_app::ports::ActionDispatcher;
use discoverystream_app::state_feed::StateFeed;
use discoverystream_domain::action::ActionRequest;
use discoverystream_domain::entity::StateSnapshot;
use discoverystream_domain::error::BridgeError;

/// Longest line prefix written to the log for a rejected line.
const LINE_EXCERPT_CHARS: usize = 128;

/// Feed every snapshot read from `reader` into `feed` until end of input.
/// Returns the number of notifications forwarded.
///
/// # Errors
///
/// Returns the underlying I/O error if reading fails.
pub async fn forward_states<R>(reader: R, feed: &StateFeed) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Option<StateSnapshot>>(line) {
            Ok(notification) => {
                if !feed.push(notification) {
                    tracing::debug!("publisher gone, stopping state source");
                    break;
                }
                forwarded += 1;
            }
            Err(err) => {
                let excerpt: String = line.chars().take(LINE_EXCERPT_CHARS).collect();
                tracing::warn!(%err, line = %excerpt, "skipping malformed state line");
            }
        }
    }
    Ok(forwarded)
}

/// [`ActionDispatcher`] writing each request as one JSON line.
pub struct JsonLinesDispatcher<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesDispatcher<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W> ActionDispatcher for JsonLinesDispatcher<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn invoke(
        &self,
        request: ActionRequest,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        async move {
            let mut line =
                serde_json::to_vec(&request).map_err(|err| BridgeError::Dispatch(Box::new(err)))?;
            line.push(b'\n');

            tracing::info!(
                entity_id = %request.target,
                action = %request.action,
                "forwarding action"
            );
            let mut writer = self.writer.lock().await;
            writer
                .write_all(&line)
                .await
                .map_err(|err| BridgeError::Dispatch(Box::new(err)))?;
            writer
                .flush()
                .await
                .map_err(|err| BridgeError::Dispatch(Box::new(err)))
        }
    }
}
