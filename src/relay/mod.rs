pub mod model;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to subscribe to tab relay")]
    Subscribe(#[source] anyhow::Error),
    #[error("failed to publish to tab relay")]
    Publish(#[source] anyhow::Error),

    #[error(transparent)]
    _ParseJson(#[from] serde_json::Error),
}
