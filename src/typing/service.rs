use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::StreamExt;
use log::{debug, error};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::integration::ByteStream;
use crate::integration::pubsub::TypingTransport;
use crate::{thread, user};

use super::model::{Presence, Signal};

/// Tracks who is typing, per conversation currently present in the thread
/// list.
///
/// One transport channel is open per tracked conversation; `sync_channels`
/// diffs against the list so channels never outlive their thread. Every
/// indicator expires on its own after `expiry` without a renewal signal.
#[derive(Clone)]
pub struct TypingService {
    transport: Arc<dyn TypingTransport>,
    viewer: user::Sub,
    expiry: Duration,
    tracked: Arc<RwLock<HashMap<thread::Id, Tracked>>>,
}

struct Tracked {
    presence: Presence,
    listener: JoinHandle<()>,
    expiry_timer: Option<JoinHandle<()>>,
}

// a removed conversation takes its listener and any pending timer with it
impl Drop for Tracked {
    fn drop(&mut self) {
        self.listener.abort();
        if let Some(timer) = self.expiry_timer.take() {
            timer.abort();
        }
    }
}

impl TypingService {
    pub fn new(transport: Arc<dyn TypingTransport>, viewer: user::Sub, expiry: Duration) -> Self {
        Self {
            transport,
            viewer,
            expiry,
            tracked: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl TypingService {
    pub async fn is_typing(&self, id: &thread::Id) -> bool {
        self.tracked
            .read()
            .await
            .get(id)
            .is_some_and(|t| t.presence.typing)
    }

    pub async fn presence(&self, id: &thread::Id) -> Option<Presence> {
        self.tracked.read().await.get(id).map(|t| t.presence)
    }

    /// Align open channels with the current thread list: subscribe the new
    /// conversations, drop the removed ones.
    pub async fn sync_channels(&self, ids: &[thread::Id]) -> super::Result<()> {
        let mut tracked = self.tracked.write().await;

        tracked.retain(|id, _| ids.contains(id));

        for id in ids {
            if tracked.contains_key(id) {
                continue;
            }

            let signals = self
                .transport
                .subscribe(id)
                .await
                .map_err(super::Error::Subscribe)?;
            let listener = tokio::spawn(self.clone().listen(id.clone(), signals));

            tracked.insert(
                id.clone(),
                Tracked {
                    presence: Presence {
                        typing: false,
                        updated_at: Utc::now(),
                    },
                    listener,
                    expiry_timer: None,
                },
            );
        }

        Ok(())
    }

    /// The viewer's own outgoing signal, fired by the chat view.
    pub async fn publish(&self, thread_id: &thread::Id, typing: bool) -> super::Result<()> {
        let signal = Signal::new(thread_id.clone(), self.viewer.clone(), typing);
        let payload = serde_json::to_vec(&signal)?;

        self.transport
            .publish(thread_id, payload.into())
            .await
            .map_err(super::Error::Publish)
    }

    /// Drop every channel and pending timer.
    pub async fn shutdown(&self) {
        self.tracked.write().await.clear();
    }
}

impl TypingService {
    async fn listen(self, thread_id: thread::Id, mut signals: ByteStream) {
        while let Some(payload) = signals.next().await {
            let signal = match serde_json::from_slice::<Signal>(&payload) {
                Ok(signal) => signal,
                Err(e) => {
                    error!("failed to deserialize typing signal: {e:?}");
                    continue;
                }
            };

            // the viewer never sees their own typing reflected back
            if signal.sender == self.viewer {
                continue;
            }

            self.on_signal(&thread_id, signal.typing).await;
        }

        debug!("typing channel for thread {thread_id} closed");
    }

    async fn on_signal(&self, id: &thread::Id, typing: bool) {
        let mut tracked = self.tracked.write().await;
        let Some(entry) = tracked.get_mut(id) else {
            return;
        };

        entry.presence = Presence {
            typing,
            updated_at: Utc::now(),
        };

        // every signal replaces the previous expiry timer
        if let Some(timer) = entry.expiry_timer.take() {
            timer.abort();
        }
        if typing {
            let service = self.clone();
            let thread_id = id.clone();
            let expiry = self.expiry;
            entry.expiry_timer = Some(tokio::spawn(async move {
                tokio::time::sleep(expiry).await;
                service.expire(&thread_id).await;
            }));
        }
    }

    async fn expire(&self, id: &thread::Id) {
        let mut tracked = self.tracked.write().await;
        if let Some(entry) = tracked.get_mut(id) {
            debug!("typing indicator for thread {id} expired");
            entry.presence.typing = false;
            entry.expiry_timer = None;
        }
    }
}
