use async_trait::async_trait;
use bytes::Bytes;

use crate::thread;

use super::ByteStream;

/// Server-pushed stream of row-level change notifications for one table.
///
/// Delivery is at-least-once and unordered. Reconnection after a drop is the
/// transport's responsibility; subscribers are stateless and idempotent to it.
#[async_trait]
pub trait ChangeStream: Send + Sync {
    async fn subscribe(&self, table: &str) -> anyhow::Result<ByteStream>;
}

/// Per-conversation fire-and-forget typing signal channel. Nothing published
/// here is ever persisted.
#[async_trait]
pub trait TypingTransport: Send + Sync {
    async fn subscribe(&self, thread_id: &thread::Id) -> anyhow::Result<ByteStream>;

    async fn publish(&self, thread_id: &thread::Id, payload: Bytes) -> anyhow::Result<()>;
}
