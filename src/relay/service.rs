use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use log::error;

use crate::integration::bus::TabTransport;

use super::model::TabMessage;

pub type TabMessageStream = Pin<Box<dyn Stream<Item = TabMessage> + Send>>;

/// Typed view over the cross-tab broadcast primitive.
///
/// Strictly a latency optimization over the change-event path: delivery is
/// best-effort and the reconciliation loop remains the backstop for any
/// message that never arrives.
#[derive(Clone)]
pub struct RelayService {
    transport: Arc<dyn TabTransport>,
}

impl RelayService {
    pub fn new(transport: Arc<dyn TabTransport>) -> Self {
        Self { transport }
    }
}

impl RelayService {
    pub async fn publish(&self, msg: &TabMessage) -> super::Result<()> {
        let payload = serde_json::to_vec(msg)?;
        self.transport
            .publish(payload.into())
            .await
            .map_err(super::Error::Publish)
    }

    /// Stream of decoded messages from every tab, the publisher's own
    /// included. Malformed payloads are dropped with a log line; they can
    /// never reach the merge path.
    pub async fn read(&self) -> super::Result<TabMessageStream> {
        let payloads = self
            .transport
            .subscribe()
            .await
            .map_err(super::Error::Subscribe)?;

        let stream = payloads.filter_map(|payload| async move {
            match serde_json::from_slice::<TabMessage>(&payload) {
                Ok(msg) => Some(msg),
                Err(e) => {
                    error!("failed to deserialize tab message: {e:?}");
                    None
                }
            }
        });

        Ok(Box::pin(stream))
    }
}
