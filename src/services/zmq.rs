use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;
use zeromq::{ReqSocket, Socket, SocketRecv, SocketSend, ZmqError, ZmqMessage};

use crate::domains::endpoint::Endpoint;
use crate::error::{ChatwireError, Result};
use crate::interfaces::transport::Channel;

/// Largest reply body accepted before the call fails.
pub const DEFAULT_MAX_REPLY_SIZE: usize = 16 * 1024 * 1024;

fn connection_error(context: &str, err: ZmqError) -> ChatwireError {
    ChatwireError::Connection(format!("{context}: {err}"))
}

/// Client half of a REQ/REP pair over a `zeromq` REQ socket.
///
/// The socket adds the empty delimiter to each request and strips it from
/// the reply, so `call` only ever sees the payload frames.
pub struct ReqChannel {
    socket: Option<ReqSocket>,
    max_reply_size: usize,
}

impl ReqChannel {
    pub async fn open(endpoint: &Endpoint, max_reply_size: usize) -> Result<Self> {
        let mut socket = ReqSocket::new();
        socket
            .connect(&endpoint.to_string())
            .await
            .map_err(|e| connection_error(&endpoint.to_string(), e))?;
        Ok(Self {
            socket: Some(socket),
            max_reply_size,
        })
    }
}

#[async_trait]
impl Channel for ReqChannel {
    async fn call(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| ChatwireError::Connection("channel is closed".to_string()))?;

        let message = ZmqMessage::from(Bytes::copy_from_slice(request));
        socket
            .send(message)
            .await
            .map_err(|e| connection_error("send", e))?;
        let reply = socket
            .recv()
            .await
            .map_err(|e| connection_error("recv", e))?;

        let frames = reply.into_vecdeque();
        debug!(frames = frames.len(), "reply received");
        let size: usize = frames.iter().map(Bytes::len).sum();
        if frames.iter().all(Bytes::is_empty) {
            return Err(ChatwireError::Decoding("reply has no body".to_string()));
        }
        if size > self.max_reply_size {
            return Err(ChatwireError::Decoding(format!(
                "reply of {size} bytes exceeds limit of {}",
                self.max_reply_size
            )));
        }
        Ok(frames.into_iter().flat_map(|frame| frame.to_vec()).collect())
    }

    async fn close(&mut self) -> Result<()> {
        let Some(socket) = self.socket.take() else {
            return Ok(());
        };
        let errors = socket.close().await;
        if errors.is_empty() {
            Ok(())
        } else {
            let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
            Err(ChatwireError::Connection(format!(
                "closing socket: {}",
                joined.join("; ")
            )))
        }
    }
}
