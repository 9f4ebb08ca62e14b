use async_trait::async_trait;

use crate::domains::endpoint::Endpoint;
use crate::error::Result;

/// One synchronous request/reply conduit.
///
/// `call` takes `&mut self`, so a second request cannot be issued before the
/// previous reply has been received.
#[async_trait]
pub trait Channel: Send {
    async fn call(&mut self, request: &[u8]) -> Result<Vec<u8>>;

    /// Releases the channel. Calling it more than once is a no-op.
    async fn close(&mut self) -> Result<()>;
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Channel>>;
}
