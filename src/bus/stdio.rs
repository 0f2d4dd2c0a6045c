//! JSON-lines bus over the process's standard streams.
//!
//! When the adapter runs as a supervised child, the parent writes one
//! [`ParentDirective`] per line to our stdin and reads one [`BusMessage`]
//! per line from our stdout. Logs go to stderr.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use super::{BusError, BusMessage, MessageBus, ParentDirective};
use crate::telegram::outbound::OutboundDispatcher;
use crate::types::DeliveryReceipt;

/// Writes each bus message as a single JSON line.
///
/// Writes are serialized so concurrent dispatches never interleave lines.
pub struct JsonLinesBus<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesBus<W> {
    /// Bus writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl JsonLinesBus<tokio::io::Stdout> {
    /// Bus writing to this process's stdout.
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W> MessageBus for JsonLinesBus<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&self, message: BusMessage) -> Result<(), BusError> {
        let mut line = serde_json::to_string(&message)?;
        line.push('\n');
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        debug!(target_name = message.target(), "bus message written");
        Ok(())
    }
}

/// Parse one directive line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns the JSON error for malformed lines.
pub fn parse_directive(line: &str) -> Result<Option<ParentDirective>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

/// Read directives from `reader` until EOF or until `shutdown` resolves,
/// dispatching each on its own task.
///
/// Malformed lines are logged and skipped. Delivered message references are
/// reported back on `bus`. Stopping only ends reading: every dispatch already
/// started runs to completion before this returns.
///
/// # Errors
///
/// Returns an error if reading from `reader` fails. In-flight dispatches are
/// still drained first.
pub async fn serve_directives<R, S>(
    reader: R,
    dispatcher: Arc<OutboundDispatcher>,
    bus: Arc<dyn MessageBus>,
    shutdown: S,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = LinesStream::new(reader.lines());
    let mut in_flight = JoinSet::new();
    let mut read_error = None;
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            biased;
            () = &mut shutdown => {
                info!("directive reader stopping");
                break;
            }
            next = lines.next() => match next {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    read_error = Some(e);
                    break;
                }
                None => {
                    info!("directive input closed");
                    break;
                }
            },
        };

        let directive = match parse_directive(&line) {
            Ok(Some(directive)) => directive,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "skipping malformed directive");
                continue;
            }
        };

        let ParentDirective::Outbound(msg) = directive;
        let dispatcher = Arc::clone(&dispatcher);
        let bus = Arc::clone(&bus);
        in_flight.spawn(async move {
            let report = dispatcher.dispatch(msg).await;
            if let Some(delivered) = report.delivered {
                let receipt = DeliveryReceipt::new(dispatcher.channel().clone(), delivered);
                if let Err(e) = bus.send(BusMessage::Delivered(receipt)).await {
                    warn!(error = %e, "failed to report delivered message");
                }
            }
        });

        while let Some(finished) = in_flight.try_join_next() {
            if let Err(e) = finished {
                warn!(error = %e, "dispatch task failed");
            }
        }
    }

    if !in_flight.is_empty() {
        info!(pending = in_flight.len(), "waiting for in-flight dispatches");
    }
    while let Some(finished) = in_flight.join_next().await {
        if let Err(e) = finished {
            warn!(error = %e, "dispatch task failed");
        }
    }
    read_error.map_or(Ok(()), Err)
}
