use std::fmt;
use std::str::FromStr;

use crate::error::{ChatwireError, Result};

/// Address of the remote REP socket, written `tcp://host:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let without_scheme = match trimmed.split_once("://") {
            Some(("tcp", rest)) => rest,
            Some((scheme, _)) => {
                return Err(ChatwireError::Config(format!(
                    "unsupported endpoint scheme '{scheme}' in '{trimmed}'"
                )))
            }
            None => trimmed,
        };
        let (host, port) = without_scheme
            .rsplit_once(':')
            .ok_or_else(|| ChatwireError::Config(format!("endpoint '{trimmed}' has no port")))?;
        if host.is_empty() || host == "*" {
            return Err(ChatwireError::Config(format!(
                "endpoint '{trimmed}' needs a concrete host"
            )));
        }
        let port = port
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| ChatwireError::Config(format!("invalid port in '{trimmed}'")))?;
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// `host:port`, suitable for a socket connect.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = ChatwireError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tcp://{}:{}", self.host, self.port)
    }
}
