use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domains::endpoint::Endpoint;
use crate::error::{ChatwireError, Result};
use crate::interfaces::transport::{Channel, Transport};
use crate::services::zmq::{ReqChannel, DEFAULT_MAX_REPLY_SIZE};

/// TCP to a ZeroMQ REP socket.
pub struct TcpTransport {
    connect_timeout: Option<Duration>,
    max_reply_size: usize,
}

impl TcpTransport {
    pub fn new() -> Self {
        Self {
            connect_timeout: None,
            max_reply_size: DEFAULT_MAX_REPLY_SIZE,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_max_reply_size(mut self, max_reply_size: usize) -> Self {
        self.max_reply_size = max_reply_size;
        self
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn Channel>> {
        debug!(%endpoint, "connecting");
        let open = ReqChannel::open(endpoint, self.max_reply_size);
        let channel = match self.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, open).await.map_err(|_| {
                ChatwireError::Connection(format!(
                    "timed out after {}ms connecting to {endpoint}",
                    timeout.as_millis()
                ))
            })??,
            None => open.await?,
        };
        info!(%endpoint, "channel open");
        Ok(Box::new(channel))
    }
}
