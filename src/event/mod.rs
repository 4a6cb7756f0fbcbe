pub mod model;
pub mod scheduler;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to subscribe to change stream")]
    Subscribe(#[source] anyhow::Error),
}
