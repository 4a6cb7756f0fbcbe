use std::sync::Arc;

use futures::StreamExt;
use log::error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::event::scheduler::RefreshScheduler;
use crate::event::service::ChangeSubscriber;
use crate::integration::bus::TabTransport;
use crate::integration::pubsub::{ChangeStream, TypingTransport};
use crate::relay::model::{Delta, TabMessage};
use crate::relay::service::RelayService;
use crate::settings::Settings;
use crate::thread::model::Thread;
use crate::thread::repository::ThreadRepository;
use crate::thread::service::ThreadService;
use crate::typing::model::Presence;
use crate::typing::service::TypingService;
use crate::unread::service::UnreadService;
use crate::{thread, user};

/// External collaborators the core runs against. All transports reconnect on
/// their own; the core only degrades while they are away.
pub struct Collaborators {
    pub threads: Arc<dyn ThreadRepository>,
    pub changes: Arc<dyn ChangeStream>,
    pub typing: Arc<dyn TypingTransport>,
    pub tabs: Arc<dyn TabTransport>,
}

/// One viewer's synchronization core: wires the services together, runs the
/// background loops and exposes the read/notify surface consumed by the
/// presentation layer.
pub struct SyncCore {
    pub thread_service: ThreadService,
    pub typing_service: TypingService,
    pub unread_service: UnreadService,
    relay_service: RelayService,
    scheduler: RefreshScheduler,
    tasks: Vec<JoinHandle<()>>,
}

impl SyncCore {
    pub async fn init(
        viewer: user::Sub,
        collaborators: Collaborators,
        settings: Settings,
    ) -> crate::Result<Self> {
        let (scheduler, mut due) =
            RefreshScheduler::spawn(settings.debounce_window, settings.max_refresh_delay);

        let thread_service =
            ThreadService::new(collaborators.threads, viewer.clone(), scheduler.clone());
        let typing_service =
            TypingService::new(collaborators.typing, viewer, settings.typing_expiry);
        let unread_service = UnreadService::new(settings.unread_display_cap);
        let relay_service = RelayService::new(collaborators.tabs);

        // initial authoritative load; on failure keep the empty list and let
        // reconciliation catch up once the store answers again
        if let Err(e) = thread_service.reload().await {
            error!("initial thread list load failed: {e}");
            scheduler.schedule();
        }

        let mut tasks = Vec::with_capacity(4);

        // reconciler: one reload per due trigger
        {
            let threads = thread_service.clone();
            let scheduler = scheduler.clone();
            tasks.push(tokio::spawn(async move {
                while due.recv().await.is_some() {
                    if let Err(e) = threads.reload().await {
                        error!("thread list reload failed: {e}");
                        scheduler.schedule();
                    }
                }
            }));
        }

        // push stream -> scheduler
        {
            let subscriber = ChangeSubscriber::new(collaborators.changes, scheduler.clone());
            tasks.push(tokio::spawn(async move {
                if let Err(e) = subscriber.run().await {
                    error!("change subscription failed: {e}");
                }
            }));
        }

        // other tabs -> merge or refresh
        {
            let mut messages = relay_service.read().await?;
            let threads = thread_service.clone();
            let scheduler = scheduler.clone();
            tasks.push(tokio::spawn(async move {
                while let Some(msg) = messages.next().await {
                    match msg {
                        TabMessage::Delta { delta } => threads.apply_delta(&delta),
                        TabMessage::RefreshHint => scheduler.schedule(),
                    }
                }
            }));
        }

        // projector: every published snapshot feeds the badge total and the
        // typing channel lifecycle
        {
            let mut list = thread_service.subscribe();
            let unread = unread_service.clone();
            let typing = typing_service.clone();
            tasks.push(tokio::spawn(async move {
                loop {
                    let snapshot = list.borrow_and_update().clone();
                    unread.recompute(&snapshot);

                    let ids: Vec<thread::Id> = snapshot.iter().map(|t| t.id.clone()).collect();
                    if let Err(e) = typing.sync_channels(&ids).await {
                        error!("failed to sync typing channels: {e}");
                    }

                    if list.changed().await.is_err() {
                        break;
                    }
                }
            }));
        }

        Ok(Self {
            thread_service,
            typing_service,
            unread_service,
            relay_service,
            scheduler,
            tasks,
        })
    }
}

impl SyncCore {
    pub fn thread_list(&self) -> Vec<Thread> {
        self.thread_service.snapshot()
    }

    pub fn subscribe_thread_list(&self) -> watch::Receiver<Vec<Thread>> {
        self.thread_service.subscribe()
    }

    pub async fn typing_state(&self, id: &thread::Id) -> bool {
        self.typing_service.is_typing(id).await
    }

    pub async fn presence(&self, id: &thread::Id) -> Option<Presence> {
        self.typing_service.presence(id).await
    }

    pub fn total_unread(&self) -> u32 {
        self.unread_service.total()
    }

    pub fn unread_badge(&self) -> Option<String> {
        self.unread_service.badge()
    }

    /// Chat view just sent or locally observed a message: patch this tab
    /// immediately, then let every other tab merge the same delta.
    pub async fn notify_local_send(&self, delta: Delta) -> crate::Result<()> {
        self.thread_service.apply_delta(&delta);
        self.relay_service
            .publish(&TabMessage::Delta { delta })
            .await?;
        Ok(())
    }

    /// Chat view marked a conversation read (the store call is its own).
    /// Other tabs converge through a hinted reload rather than a blind local
    /// mutation.
    pub async fn notify_local_read(&self, id: &thread::Id) -> crate::Result<()> {
        self.thread_service.mark_read(id);
        self.relay_service.publish(&TabMessage::RefreshHint).await?;
        Ok(())
    }

    pub async fn notify_typing(&self, id: &thread::Id, typing: bool) -> crate::Result<()> {
        self.typing_service.publish(id, typing).await?;
        Ok(())
    }

    /// Manual reconciliation request, debounced like any other.
    pub fn refresh(&self) {
        self.scheduler.schedule();
    }

    /// Stop every background loop and release every timer and channel.
    pub async fn shutdown(self) {
        self.scheduler.cancel();
        for task in &self.tasks {
            task.abort();
        }
        self.typing_service.shutdown().await;
    }
}
