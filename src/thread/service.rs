use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;
use tokio::sync::watch;

use crate::event::scheduler::RefreshScheduler;
use crate::relay::model::Delta;
use crate::user;

use super::model::{LastMessage, Thread};
use super::repository::ThreadRepository;

/// Single owner of the canonical, recency-ordered thread set.
///
/// Everything else proposes: the scheduler triggers `reload`, tabs propose
/// deltas through `apply_delta`. Both paths publish through one `watch`
/// channel, so no caller can bypass the ordering and exclusion invariants.
#[derive(Clone)]
pub struct ThreadService {
    repository: Arc<dyn ThreadRepository>,
    viewer: user::Sub,
    scheduler: RefreshScheduler,
    threads: Arc<watch::Sender<Vec<Thread>>>,
}

impl ThreadService {
    pub fn new(
        repository: Arc<dyn ThreadRepository>,
        viewer: user::Sub,
        scheduler: RefreshScheduler,
    ) -> Self {
        let (threads, _) = watch::channel(Vec::new());
        Self {
            repository,
            viewer,
            scheduler,
            threads: Arc::new(threads),
        }
    }
}

impl ThreadService {
    /// Wholesale replace from the authoritative store.
    ///
    /// On failure the previous snapshot stays published; a half-updated set
    /// is never observable.
    pub async fn reload(&self) -> super::Result<()> {
        let rows = self
            .repository
            .find_by_sub(&self.viewer)
            .await
            .map_err(super::Error::Fetch)?;

        let mut visible: Vec<Thread> = rows
            .into_iter()
            .filter(|t| t.last_message.is_some())
            .collect();
        Self::sort(&mut visible);

        debug!("reloaded thread list: {} threads", visible.len());
        self.threads.send_replace(visible);
        Ok(())
    }

    /// Optimistic merge of a cross-tab delta.
    ///
    /// Known thread: splice out, bump preview and counter, reinsert at the
    /// head. Restores recency ordering in O(1) without a re-sort. A delta not
    /// newer than the thread's current last message is a duplicate or a
    /// stale arrival and is dropped, which keeps the merge idempotent.
    ///
    /// Unknown thread: never fabricate a partial row; defer to the next
    /// authoritative reload instead.
    pub fn apply_delta(&self, delta: &Delta) {
        let mut known = false;

        self.threads.send_if_modified(|threads| {
            let Some(idx) = threads.iter().position(|t| t.id == delta.thread_id) else {
                return false;
            };
            known = true;

            if threads[idx].posted_at().is_some_and(|at| at >= delta.posted_at) {
                debug!("duplicate or stale delta for thread {}", delta.thread_id);
                return false;
            }

            let mut thread = threads.remove(idx);
            thread.last_message = Some(LastMessage::new(&delta.preview, delta.posted_at));
            if !delta.own {
                thread.unread += 1;
            }
            threads.insert(0, thread);
            true
        });

        if !known {
            debug!(
                "delta for unknown thread {}, deferring to reload",
                delta.thread_id
            );
            self.scheduler.schedule();
        }
    }

    /// Zero the local counter. The store-level mark-read mutation is the chat
    /// view's collaborator call; this only mirrors its effect.
    pub fn mark_read(&self, id: &super::Id) {
        self.threads.send_if_modified(|threads| {
            threads
                .iter_mut()
                .find(|t| t.id == *id)
                .is_some_and(|thread| {
                    if thread.unread == 0 {
                        return false;
                    }
                    thread.unread = 0;
                    true
                })
        });
    }

    pub fn snapshot(&self) -> Vec<Thread> {
        self.threads.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Thread>> {
        self.threads.subscribe()
    }
}

impl ThreadService {
    // recency descending, ties by id for a deterministic list
    fn sort(threads: &mut [Thread]) {
        threads.sort_by(|a, b| match b.posted_at().cmp(&a.posted_at()) {
            Ordering::Equal => a.id.cmp(&b.id),
            ord => ord,
        });
    }
}
