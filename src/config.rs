use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::client::TimestampFormat;
use crate::domains::endpoint::Endpoint;
use crate::error::{ChatwireError, Result};
use crate::services::interpreter::StatusPolicy;
use crate::services::zmq::DEFAULT_MAX_REPLY_SIZE;

pub const DEFAULT_ENDPOINT: &str = "tcp://127.0.0.1:5556";

pub const DEFAULT_USERS: [&str; 13] = [
    "Alice", "Bob", "Charlie", "David", "Eve", "Frank", "Mateus", "Felipe", "Thiago", "Vanessa",
    "Maura", "Nilza", "Laura",
];

pub const DEFAULT_CHANNELS: [&str; 10] = [
    "Geral",
    "DevOps",
    "Python",
    "ZeroMQ",
    "SD-Projeto",
    "Doramas",
    "Aventuras",
    "Trilhas",
    "Viagens",
    "Jogos",
];

pub const DEFAULT_SUCCESS_STATUSES: [&str; 2] = ["success", "sucesso"];

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub timestamp: TimestampFormat,
    pub success_statuses: Vec<String>,
    pub users: Vec<String>,
    pub channels: Vec<String>,
    /// Fixed number of logins per run; `None` picks `1..=max_logins` at random.
    pub logins: Option<usize>,
    pub max_logins: usize,
    pub seed: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub max_reply_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timestamp: TimestampFormat::default(),
            success_statuses: DEFAULT_SUCCESS_STATUSES.iter().map(|s| s.to_string()).collect(),
            users: DEFAULT_USERS.iter().map(|s| s.to_string()).collect(),
            channels: DEFAULT_CHANNELS.iter().map(|s| s.to_string()).collect(),
            logins: None,
            max_logins: 3,
            seed: None,
            connect_timeout_ms: None,
            max_reply_size: DEFAULT_MAX_REPLY_SIZE,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ChatwireError::Config(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| ChatwireError::Config(e.to_string()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.endpoint()?;
        if self
            .success_statuses
            .iter()
            .all(|status| status.trim().is_empty())
        {
            return Err(ChatwireError::Config(
                "success_statuses must name at least one status".to_string(),
            ));
        }
        if self.max_logins == 0 {
            return Err(ChatwireError::Config(
                "max_logins must be at least 1".to_string(),
            ));
        }
        if self.max_reply_size == 0 {
            return Err(ChatwireError::Config(
                "max_reply_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn endpoint(&self) -> Result<Endpoint> {
        Endpoint::parse(&self.endpoint)
    }

    pub fn status_policy(&self) -> StatusPolicy {
        StatusPolicy::new(&self.success_statuses)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}
