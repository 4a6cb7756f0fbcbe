use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;

pub mod bus;
pub mod pubsub;

/// Raw payload stream handed out by the transport collaborators. Payloads are
/// untrusted hints; every consumer deserializes defensively.
pub type ByteStream = Pin<Box<dyn Stream<Item = Bytes> + Send>>;
