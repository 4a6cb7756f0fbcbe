use std::sync::Arc;

use futures::StreamExt;
use log::{debug, error, warn};

use crate::integration::pubsub::ChangeStream;

use super::model::{self, ChangeNotification};
use super::scheduler::RefreshScheduler;

/// Thin listener on the push stream of message-store changes.
///
/// Holds no state and performs no business logic: every relevant notification
/// becomes a `schedule()` call and nothing else. Payload contents are never
/// trusted, the stream being at-least-once and unordered.
#[derive(Clone)]
pub struct ChangeSubscriber {
    stream: Arc<dyn ChangeStream>,
    scheduler: RefreshScheduler,
}

impl ChangeSubscriber {
    pub fn new(stream: Arc<dyn ChangeStream>, scheduler: RefreshScheduler) -> Self {
        Self { stream, scheduler }
    }
}

impl ChangeSubscriber {
    pub async fn run(self) -> super::Result<()> {
        let mut changes = self
            .stream
            .subscribe(model::MESSAGES_TABLE)
            .await
            .map_err(super::Error::Subscribe)?;

        while let Some(payload) = changes.next().await {
            match serde_json::from_slice::<ChangeNotification>(&payload) {
                Ok(noti) if noti.is_relevant() => self.scheduler.schedule(),
                Ok(noti) => debug!("ignoring change notification: {noti:?}"),
                Err(e) => error!("failed to deserialize change notification: {e:?}"),
            }
        }

        // the transport reconnects on its own; a closed stream only means
        // we fall back to reconciliation until it does
        warn!("change stream ended");
        Ok(())
    }
}
