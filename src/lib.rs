pub mod event;
pub mod integration;
pub mod relay;
pub mod settings;
pub mod state;
pub mod thread;
pub mod typing;
pub mod unread;
pub mod user;

pub use settings::Settings;
pub use state::{Collaborators, SyncCore};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    _Event(#[from] event::Error),
    #[error(transparent)]
    _Relay(#[from] relay::Error),
    #[error(transparent)]
    _Thread(#[from] thread::Error),
    #[error(transparent)]
    _Typing(#[from] typing::Error),
}
