use std::sync::Arc;

use tokio::sync::watch;

use crate::thread::model::Thread;

/// Derives the badge scalar from the canonical thread set.
///
/// Pure projection with one memoized value: `recompute` republishes only when
/// the total actually changed, so a reload that lands on the same numbers
/// causes no redraw.
#[derive(Clone)]
pub struct UnreadService {
    total: Arc<watch::Sender<u32>>,
    display_cap: u32,
}

impl UnreadService {
    pub fn new(display_cap: u32) -> Self {
        let (total, _) = watch::channel(0);
        Self {
            total: Arc::new(total),
            display_cap,
        }
    }
}

impl UnreadService {
    pub fn recompute(&self, threads: &[Thread]) {
        let total = threads.iter().map(|t| t.unread).sum();

        self.total.send_if_modified(|current| {
            if *current == total {
                return false;
            }
            *current = total;
            true
        });
    }

    /// Exact total, never clamped.
    pub fn total(&self) -> u32 {
        *self.total.borrow()
    }

    /// Display-friendly form: nothing at zero, capped text above the cap.
    pub fn badge(&self) -> Option<String> {
        match self.total() {
            0 => None,
            n if n > self.display_cap => Some(format!("{}+", self.display_cap)),
            n => Some(n.to_string()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.total.subscribe()
    }
}
