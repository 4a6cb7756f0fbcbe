#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::{Mutex, broadcast};

use messenger_sync::Collaborators;
use messenger_sync::event::model::{ChangeKind, ChangeNotification};
use messenger_sync::integration::ByteStream;
use messenger_sync::integration::bus::InProcessBus;
use messenger_sync::integration::pubsub::{ChangeStream, TypingTransport};
use messenger_sync::thread::model::Thread;
use messenger_sync::thread::repository::ThreadRepository;
use messenger_sync::typing::model::Signal;
use messenger_sync::user::model::UserInfo;
use messenger_sync::{thread, user};

pub fn init_logger() {
    let _ = simplelog::TermLogger::init(
        log::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
}

/// Let spawned tasks run without crossing any timer threshold.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub fn viewer() -> user::Sub {
    user::Sub::from("auth0|viewer")
}

pub fn counterpart(tag: &str) -> UserInfo {
    UserInfo::new(
        user::Sub(format!("auth0|{tag}")),
        tag,
        tag,
        "https://pics.test/default.png",
    )
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub fn thread_row(id: &str, posted_secs: i64, unread: u32) -> Thread {
    Thread::new(thread::Id::from(id), counterpart(id))
        .with_last_message("hey", at(posted_secs))
        .with_unread(unread)
}

/// A conversation with no messages yet.
pub fn bare_row(id: &str) -> Thread {
    Thread::new(thread::Id::from(id), counterpart(id))
}

pub struct InMemoryThreads {
    rows: Mutex<Vec<Thread>>,
    fetches: AtomicUsize,
    fail: AtomicBool,
}

impl InMemoryThreads {
    pub fn new(rows: Vec<Thread>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            fetches: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        })
    }

    pub async fn put(&self, rows: Vec<Thread>) {
        *self.rows.lock().await = rows;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ThreadRepository for InMemoryThreads {
    async fn find_by_sub(&self, _sub: &user::Sub) -> anyhow::Result<Vec<Thread>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("store unavailable");
        }
        Ok(self.rows.lock().await.clone())
    }
}

pub struct FakeChanges {
    tx: broadcast::Sender<Bytes>,
}

impl FakeChanges {
    pub fn new() -> Arc<Self> {
        let (tx, _) = broadcast::channel(64);
        Arc::new(Self { tx })
    }

    pub fn emit(&self, kind: ChangeKind, table: &str) {
        let payload = serde_json::to_vec(&ChangeNotification::new(kind, table)).unwrap();
        let _ = self.tx.send(payload.into());
    }

    pub fn emit_raw(&self, payload: &[u8]) {
        let _ = self.tx.send(Bytes::copy_from_slice(payload));
    }
}

#[async_trait]
impl ChangeStream for FakeChanges {
    async fn subscribe(&self, _table: &str) -> anyhow::Result<ByteStream> {
        let mut rx = self.tx.subscribe();
        Ok(Box::pin(async_stream::stream! {
            while let Ok(payload) = rx.recv().await {
                yield payload;
            }
        }))
    }
}

pub struct FakeTyping {
    channels: std::sync::Mutex<HashMap<thread::Id, broadcast::Sender<Bytes>>>,
}

impl FakeTyping {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            channels: std::sync::Mutex::new(HashMap::new()),
        })
    }

    fn channel(&self, id: &thread::Id) -> broadcast::Sender<Bytes> {
        self.channels
            .lock()
            .unwrap()
            .entry(id.clone())
            .or_insert_with(|| broadcast::channel(16).0)
            .clone()
    }

    pub fn signal(&self, id: &thread::Id, sender: &user::Sub, typing: bool) {
        let signal = Signal::new(id.clone(), sender.clone(), typing);
        let payload = serde_json::to_vec(&signal).unwrap();
        let _ = self.channel(id).send(payload.into());
    }

    pub fn signal_raw(&self, id: &thread::Id, payload: &[u8]) {
        let _ = self.channel(id).send(Bytes::copy_from_slice(payload));
    }

    pub fn listeners(&self, id: &thread::Id) -> usize {
        self.channel(id).receiver_count()
    }
}

#[async_trait]
impl TypingTransport for FakeTyping {
    async fn subscribe(&self, thread_id: &thread::Id) -> anyhow::Result<ByteStream> {
        let mut rx = self.channel(thread_id).subscribe();
        Ok(Box::pin(async_stream::stream! {
            while let Ok(payload) = rx.recv().await {
                yield payload;
            }
        }))
    }

    async fn publish(&self, thread_id: &thread::Id, payload: Bytes) -> anyhow::Result<()> {
        let _ = self.channel(thread_id).send(payload);
        Ok(())
    }
}

/// One shared backend for any number of "tabs" of the same viewer.
pub struct TestEnv {
    pub threads: Arc<InMemoryThreads>,
    pub changes: Arc<FakeChanges>,
    pub typing: Arc<FakeTyping>,
    pub bus: InProcessBus,
}

impl TestEnv {
    pub fn new(rows: Vec<Thread>) -> Self {
        init_logger();
        Self {
            threads: InMemoryThreads::new(rows),
            changes: FakeChanges::new(),
            typing: FakeTyping::new(),
            bus: InProcessBus::default(),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            threads: self.threads.clone(),
            changes: self.changes.clone(),
            typing: self.typing.clone(),
            tabs: Arc::new(self.bus.clone()),
        }
    }
}
