use crate::client::Exchange;
use crate::domains::envelope::{fields_to_json, FieldValue, Fields, ServiceTag};
use crate::domains::record::{DisplayRecord, ListKind, SubjectKind};

/// Which `status` values count as success.
///
/// Comparison ignores case and surrounding whitespace. A missing or
/// non-string status never counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPolicy {
    success: Vec<String>,
}

impl StatusPolicy {
    pub fn new<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let success = statuses
            .into_iter()
            .map(|status| status.as_ref().trim().to_lowercase())
            .filter(|status| !status.is_empty())
            .collect();
        Self { success }
    }

    pub fn is_success(&self, status: Option<&FieldValue>) -> bool {
        let Some(status) = status.and_then(FieldValue::as_text) else {
            return false;
        };
        let status = status.trim().to_lowercase();
        self.success.iter().any(|candidate| *candidate == status)
    }
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SUCCESS_STATUSES)
    }
}

pub fn interpret(
    request_service: &ServiceTag,
    request_data: &Fields,
    reply_data: &Fields,
    policy: &StatusPolicy,
) -> DisplayRecord {
    match request_service {
        ServiceTag::Login => {
            subject_record(SubjectKind::User, "user", request_data, reply_data, policy)
        }
        ServiceTag::Channel => {
            subject_record(SubjectKind::Channel, "channel", request_data, reply_data, policy)
        }
        ServiceTag::Users => listing_record(ListKind::Users, "users", reply_data),
        ServiceTag::Channels => listing_record(ListKind::Channels, "channels", reply_data),
        ServiceTag::Other(service) => DisplayRecord::Raw {
            service: service.clone(),
            reply: fields_to_json(reply_data),
        },
    }
}

pub fn interpret_exchange(exchange: &Exchange, policy: &StatusPolicy) -> DisplayRecord {
    interpret(
        &exchange.request.service,
        &exchange.request.data,
        &exchange.reply.data,
        policy,
    )
}

fn subject_record(
    kind: SubjectKind,
    key: &str,
    request_data: &Fields,
    reply_data: &Fields,
    policy: &StatusPolicy,
) -> DisplayRecord {
    // The subject always comes from the request; replies do not echo it.
    let subject = request_data
        .get(key)
        .and_then(FieldValue::as_text)
        .map(str::to_string);
    if policy.is_success(reply_data.get("status")) {
        DisplayRecord::Accepted { kind, subject }
    } else {
        DisplayRecord::Rejected {
            kind,
            subject,
            reply: fields_to_json(reply_data),
        }
    }
}

fn listing_record(kind: ListKind, key: &str, reply_data: &Fields) -> DisplayRecord {
    let joined = reply_data
        .get(key)
        .and_then(FieldValue::text_items)
        .map(|items| items.join(", "));
    DisplayRecord::Listing { kind, joined }
}
