//! Destination for terminal instruction records.
//!
//! The runtime never stores instructions itself. Once an instruction
//! reaches `completed` or `failed`, its [`TerminalRecord`] is handed to a
//! [`LifecycleSink`] owned by whoever persists instructions.

use std::future::Future;

use tokio::sync::mpsc;
use tracing::warn;

use questmind_types::TerminalRecord;

/// Receives every terminal record exactly once.
pub trait LifecycleSink: Send + Sync + 'static {
    /// Accept one terminal record.
    fn record(&self, record: TerminalRecord) -> impl Future<Output = ()> + Send;
}

/// Forwards records into a bounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<TerminalRecord>,
}

impl ChannelSink {
    /// A sink and the receiver that drains it.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<TerminalRecord>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl LifecycleSink for ChannelSink {
    async fn record(&self, record: TerminalRecord) {
        let instruction_id = record.instruction_id;
        if self.tx.send(record).await.is_err() {
            warn!(%instruction_id, "lifecycle receiver dropped, terminal record lost");
        }
    }
}
