use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectKind {
    User,
    Channel,
}

impl SubjectKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Channel => "channel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Users,
    Channels,
}

impl ListKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Channels => "channels",
        }
    }
}

/// Human-oriented summary of one reply.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayRecord {
    Accepted {
        kind: SubjectKind,
        subject: Option<String>,
    },
    /// `reply` is the complete reply data, kept unparsed for diagnosis.
    Rejected {
        kind: SubjectKind,
        subject: Option<String>,
        reply: Value,
    },
    /// `joined` is `None` when the reply carried no list.
    Listing {
        kind: ListKind,
        joined: Option<String>,
    },
    Raw {
        service: String,
        reply: Value,
    },
}

impl DisplayRecord {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Accepted { subject, .. } | Self::Rejected { subject, .. } => subject.as_deref(),
            _ => None,
        }
    }

    pub fn joined(&self) -> Option<&str> {
        match self {
            Self::Listing { joined, .. } => joined.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { kind, subject } => write!(
                f,
                "{} '{}' accepted",
                kind.label(),
                subject.as_deref().unwrap_or("unknown")
            ),
            Self::Rejected {
                kind,
                subject,
                reply,
            } => write!(
                f,
                "{} '{}' rejected: {reply}",
                kind.label(),
                subject.as_deref().unwrap_or("unknown")
            ),
            Self::Listing { kind, joined } => write!(
                f,
                "{}: {}",
                kind.label(),
                joined.as_deref().unwrap_or("unknown")
            ),
            Self::Raw { service, reply } => write!(f, "reply to '{service}': {reply}"),
        }
    }
}
