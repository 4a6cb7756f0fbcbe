pub mod model;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to subscribe to typing channel")]
    Subscribe(#[source] anyhow::Error),
    #[error("failed to publish typing signal")]
    Publish(#[source] anyhow::Error),

    #[error(transparent)]
    _ParseJson(#[from] serde_json::Error),
}
