use async_trait::async_trait;
use bytes::Bytes;
use log::warn;
use tokio::sync::broadcast;

use super::ByteStream;

/// Same-origin broadcast primitive between tabs of one viewer.
///
/// Best-effort only: a dropped message is corrected by the next authoritative
/// reload, never by redelivery.
#[async_trait]
pub trait TabTransport: Send + Sync {
    async fn publish(&self, payload: Bytes) -> anyhow::Result<()>;

    async fn subscribe(&self) -> anyhow::Result<ByteStream>;
}

/// `TabTransport` for tabs hosted in a single process group, backed by a
/// `tokio::sync::broadcast` channel. Every subscriber sees every publish,
/// including the publisher's own.
#[derive(Clone)]
pub struct InProcessBus {
    tx: broadcast::Sender<Bytes>,
}

impl InProcessBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }
}

impl Default for InProcessBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl TabTransport for InProcessBus {
    async fn publish(&self, payload: Bytes) -> anyhow::Result<()> {
        // no receivers means no other tab is open; that is not an error
        let _ = self.tx.send(payload);
        Ok(())
    }

    async fn subscribe(&self) -> anyhow::Result<ByteStream> {
        let mut rx = self.tx.subscribe();

        let stream = async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(payload) => yield payload,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("tab relay receiver lagged, {n} messages dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
