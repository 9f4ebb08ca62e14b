use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatwireError {
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("decoding error: {0}")]
    Decoding(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{phase} call {target} failed: {source}")]
    Call {
        phase: String,
        target: String,
        #[source]
        source: Box<ChatwireError>,
    },
}

impl ChatwireError {
    /// Encoding, decoding and connection failures are fatal to a run.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Encoding(_) | Self::Decoding(_) | Self::Connection(_) => true,
            Self::Call { source, .. } => source.is_transport(),
            Self::Config(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatwireError>;
