#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use zeromq::{RepSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

use chatwire::codec;
use chatwire::domains::endpoint::Endpoint;
use chatwire::error::{ChatwireError, Result};
use chatwire::interfaces::transport::Channel;

pub enum Scripted {
    Reply(Value),
    Bytes(Vec<u8>),
    Fail(ChatwireError),
}

/// Everything a [`ScriptedChannel`] saw, shared with the test body.
#[derive(Default)]
pub struct CallLog {
    pub requests: Vec<Value>,
    pub closes: usize,
}

/// In-memory channel answering from a queue and recording every request.
pub struct ScriptedChannel {
    queue: VecDeque<Scripted>,
    close_error: Option<ChatwireError>,
    log: Arc<Mutex<CallLog>>,
}

impl ScriptedChannel {
    pub fn new(queue: Vec<Scripted>) -> (Self, Arc<Mutex<CallLog>>) {
        let log = Arc::new(Mutex::new(CallLog::default()));
        (
            Self {
                queue: VecDeque::from(queue),
                close_error: None,
                log: log.clone(),
            },
            log,
        )
    }

    pub fn replies(replies: Vec<Value>) -> (Self, Arc<Mutex<CallLog>>) {
        Self::new(replies.into_iter().map(Scripted::Reply).collect())
    }

    /// The first `close` fails with `err`; later ones succeed.
    pub fn failing_close(mut self, err: ChatwireError) -> Self {
        self.close_error = Some(err);
        self
    }
}

#[async_trait]
impl Channel for ScriptedChannel {
    async fn call(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        let parsed: Value = serde_json::from_slice(request).unwrap();
        self.log.lock().unwrap().requests.push(parsed);
        match self.queue.pop_front() {
            Some(Scripted::Reply(value)) => Ok(serde_json::to_vec(&value).unwrap()),
            Some(Scripted::Bytes(bytes)) => Ok(bytes),
            Some(Scripted::Fail(err)) => Err(err),
            None => Err(ChatwireError::Connection("script exhausted".to_string())),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.log.lock().unwrap().closes += 1;
        match self.close_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// In-memory stand-in for the chat service: duplicate logins and channels
/// are refused with `erro`, anything unknown gets `service: "erro"`.
#[derive(Default)]
pub struct ChatState {
    pub users: Vec<String>,
    pub channels: Vec<String>,
}

impl ChatState {
    pub fn handle(&mut self, request: &Value) -> Value {
        let service = request["service"].as_str().unwrap_or_default();
        let data = &request["data"];
        let timestamp = "2024-01-01T00:00:00";
        match service {
            "login" => {
                let user = data["user"].as_str().unwrap_or_default().to_string();
                if self.users.contains(&user) {
                    json!({"service": "login", "data": {"status": "erro", "timestamp": timestamp, "description": "Usuário já logado"}})
                } else {
                    self.users.push(user);
                    json!({"service": "login", "data": {"status": "sucesso", "timestamp": timestamp}})
                }
            }
            "users" => {
                json!({"service": "users", "data": {"timestamp": timestamp, "users": self.users}})
            }
            "channel" => {
                let channel = data["channel"].as_str().unwrap_or_default().to_string();
                if self.channels.contains(&channel) {
                    json!({"service": "channel", "data": {"status": "erro", "timestamp": timestamp, "description": "Canal já existe"}})
                } else {
                    self.channels.push(channel);
                    json!({"service": "channel", "data": {"status": "sucesso", "timestamp": timestamp}})
                }
            }
            "channels" => {
                json!({"service": "channels", "data": {"timestamp": timestamp, "channels": self.channels}})
            }
            _ => json!({"service": "erro", "data": {"timestamp": timestamp, "description": "Serviço inválido"}}),
        }
    }
}

/// A `zeromq` REP socket bound on a loopback port, answering until dropped.
pub struct RepPeer {
    pub endpoint: Endpoint,
    seen: Arc<Mutex<Vec<Vec<u8>>>>,
    task: JoinHandle<()>,
}

impl RepPeer {
    /// Answers each request body with whatever `handler` returns.
    pub async fn spawn<F>(mut handler: F) -> Self
    where
        F: FnMut(&[u8]) -> Vec<u8> + Send + 'static,
    {
        let mut socket = RepSocket::new();
        let bound = socket.bind("tcp://127.0.0.1:0").await.unwrap();
        let endpoint = Endpoint::parse(&bound.to_string()).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let task = tokio::spawn(async move {
            while let Ok(request) = socket.recv().await {
                let body: Vec<u8> = request
                    .into_vecdeque()
                    .into_iter()
                    .flat_map(|frame| frame.to_vec())
                    .collect();
                let reply = handler(&body);
                log.lock().unwrap().push(body);
                if socket.send(ZmqMessage::from(Bytes::from(reply))).await.is_err() {
                    break;
                }
            }
        });
        Self {
            endpoint,
            seen,
            task,
        }
    }

    /// Serves the chat service modelled by `state`.
    pub async fn chat(mut state: ChatState) -> Self {
        Self::spawn(move |body| {
            let request = codec::decode(body).unwrap();
            let raw: Value = serde_json::from_slice(body).unwrap();
            assert_eq!(raw["service"], request.service.as_str());
            serde_json::to_vec(&state.handle(&raw)).unwrap()
        })
        .await
    }

    /// Every request body received so far, parsed as JSON.
    pub fn seen(&self) -> Vec<Value> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|body| serde_json::from_slice(body).unwrap())
            .collect()
    }
}

impl Drop for RepPeer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
