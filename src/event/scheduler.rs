use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

/// Coalesces bursts of change notifications into single reload triggers.
///
/// Trailing-edge debounce: the window restarts on every `schedule` call and
/// a trigger fires once the window elapses quietly. A ceiling caps how long
/// consecutive calls can push the trigger back, so a refresh still fires
/// under a notification storm that never goes quiet.
///
/// Triggers land on the `due` channel returned by `spawn`; the consumer runs
/// the actual reload. The timer task stops once every handle is dropped or
/// the consumer goes away, so nothing fires after teardown.
#[derive(Clone)]
pub struct RefreshScheduler {
    commands: mpsc::UnboundedSender<Command>,
}

enum Command {
    Schedule,
    Cancel,
    Flush,
}

impl RefreshScheduler {
    pub fn spawn(debounce: Duration, max_delay: Duration) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (commands, rx) = mpsc::unbounded_channel();
        let (due, due_rx) = mpsc::unbounded_channel();

        tokio::spawn(run(rx, due, debounce, max_delay));

        (Self { commands }, due_rx)
    }

    /// Request a refresh after the debounce window. Safe to call in bursts.
    pub fn schedule(&self) {
        let _ = self.commands.send(Command::Schedule);
    }

    /// Drop any pending refresh.
    pub fn cancel(&self) {
        let _ = self.commands.send(Command::Cancel);
    }

    /// Fire a pending refresh immediately instead of waiting out the window.
    pub fn flush(&self) {
        let _ = self.commands.send(Command::Flush);
    }
}

async fn run(
    mut commands: mpsc::UnboundedReceiver<Command>,
    due: mpsc::UnboundedSender<()>,
    debounce: Duration,
    max_delay: Duration,
) {
    // deadline restarts per call, ceiling is pinned to the first call of a burst
    let mut deadline: Option<Instant> = None;
    let mut ceiling: Option<Instant> = None;

    loop {
        let wake = deadline.map(|d| ceiling.map_or(d, |c| d.min(c)));

        tokio::select! {
            command = commands.recv() => match command {
                None => break,
                Some(Command::Schedule) => {
                    let now = Instant::now();
                    deadline = Some(now + debounce);
                    if ceiling.is_none() {
                        ceiling = Some(now + max_delay);
                    }
                }
                Some(Command::Cancel) => {
                    deadline = None;
                    ceiling = None;
                }
                Some(Command::Flush) => {
                    if deadline.take().is_some() {
                        ceiling = None;
                        if due.send(()).is_err() {
                            break;
                        }
                    }
                }
            },
            _ = sleep_until(wake.unwrap_or_else(far_future)), if wake.is_some() => {
                deadline = None;
                ceiling = None;
                debug!("debounce window elapsed, refresh due");
                if due.send(()).is_err() {
                    break;
                }
            }
        }
    }
}

// select! evaluates every branch future even when its guard is false
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86400 * 30)
}
