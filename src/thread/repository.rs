use async_trait::async_trait;

use crate::user;

use super::model::Thread;

/// Authoritative store query for the viewer's conversations.
///
/// Safe to call repeatedly and concurrently. Rows without a last message may
/// be returned; the synchronizer filters them out of the visible list.
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    async fn find_by_sub(&self, sub: &user::Sub) -> anyhow::Result<Vec<Thread>>;
}
