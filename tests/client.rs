mod common;

use serde_json::{json, Value};

use chatwire::client::{RequestClient, TimestampFormat};
use chatwire::domains::envelope::{FieldValue, Fields, ServiceTag};
use chatwire::domains::record::{DisplayRecord, ListKind, SubjectKind};
use chatwire::error::ChatwireError;
use chatwire::services::interpreter::{interpret_exchange, StatusPolicy};

use common::{Scripted, ScriptedChannel};

#[tokio::test]
async fn login_roundtrip_interprets_request_subject() {
    let (channel, log) =
        ScriptedChannel::replies(vec![json!({"service": "login", "data": {"status": "sucesso"}})]);
    let mut client = RequestClient::new(Box::new(channel), TimestampFormat::Iso8601);

    let mut data = Fields::new();
    data.insert("user".to_string(), FieldValue::from("Ana"));
    data.insert(
        "timestamp".to_string(),
        FieldValue::from("2024-01-01T00:00:00Z"),
    );
    let exchange = client.exchange(ServiceTag::Login, data).await.unwrap();

    let record = interpret_exchange(&exchange, &StatusPolicy::default());
    assert_eq!(
        record,
        DisplayRecord::Accepted {
            kind: SubjectKind::User,
            subject: Some("Ana".to_string()),
        }
    );

    let log = log.lock().unwrap();
    assert_eq!(
        log.requests,
        vec![json!({"service": "login", "data": {"user": "Ana", "timestamp": "2024-01-01T00:00:00Z"}})]
    );
}

#[tokio::test]
async fn users_listing_roundtrip() {
    let (channel, log) = ScriptedChannel::replies(vec![json!({
        "service": "users",
        "data": {"users": ["Ana", "Bruno", "Carlos"]}
    })]);
    let mut client = RequestClient::new(Box::new(channel), TimestampFormat::EpochMillis);

    let exchange = client.users().await.unwrap();
    let record = interpret_exchange(&exchange, &StatusPolicy::default());
    assert_eq!(
        record,
        DisplayRecord::Listing {
            kind: ListKind::Users,
            joined: Some("Ana, Bruno, Carlos".to_string()),
        }
    );

    let log = log.lock().unwrap();
    let request = &log.requests[0];
    assert_eq!(request["service"], "users");
    let data = request["data"].as_object().unwrap();
    assert_eq!(data.len(), 1);
    assert!(data["timestamp"].as_i64().unwrap() > 1_600_000_000_000);
}

#[tokio::test]
async fn injects_iso_timestamps_by_default() {
    let (channel, log) =
        ScriptedChannel::replies(vec![json!({"service": "channel", "data": {"status": "success"}})]);
    let mut client = RequestClient::new(Box::new(channel), TimestampFormat::default());

    let reply = client
        .invoke("channel", {
            let mut data = Fields::new();
            data.insert("channel".to_string(), FieldValue::from("Geral"));
            data
        })
        .await
        .unwrap();
    assert_eq!(reply.service, ServiceTag::Channel);

    let log = log.lock().unwrap();
    let request = &log.requests[0];
    let stamp = request["data"]["timestamp"].as_str().unwrap();
    assert!(time::OffsetDateTime::parse(
        stamp,
        &time::format_description::well_known::Rfc3339
    )
    .is_ok());
}

#[tokio::test]
async fn transport_errors_pass_through_unchanged() {
    let (channel, log) = ScriptedChannel::new(vec![
        Scripted::Fail(ChatwireError::Connection("broken pipe".to_string())),
        Scripted::Bytes(b"{not json".to_vec()),
        Scripted::Reply(json!({"data": {"status": "sucesso"}})),
    ]);
    let mut client = RequestClient::new(Box::new(channel), TimestampFormat::Iso8601);

    let err = client.login("Ana").await.unwrap_err();
    assert!(matches!(err, ChatwireError::Connection(ref msg) if msg == "broken pipe"));

    let err = client.login("Bruno").await.unwrap_err();
    assert!(matches!(err, ChatwireError::Decoding(_)));

    let err = client.login("Carlos").await.unwrap_err();
    assert!(matches!(err, ChatwireError::Decoding(_)));

    assert_eq!(log.lock().unwrap().requests.len(), 3);
}

#[tokio::test]
async fn encoding_errors_send_nothing() {
    let (channel, log) = ScriptedChannel::replies(vec![]);
    let mut client = RequestClient::new(Box::new(channel), TimestampFormat::Iso8601);

    let mut data = Fields::new();
    data.insert("user".to_string(), FieldValue::Opaque(json!({"id": 1})));
    let err = client.invoke(ServiceTag::Login, data).await.unwrap_err();
    assert!(matches!(err, ChatwireError::Encoding(_)));
    assert!(log.lock().unwrap().requests.is_empty());
}

#[tokio::test]
async fn mismatched_reply_service_is_still_returned() {
    let (channel, _log) = ScriptedChannel::replies(vec![json!({
        "service": "erro",
        "data": {"description": "Serviço inválido"}
    })]);
    let mut client = RequestClient::new(Box::new(channel), TimestampFormat::Iso8601);

    let exchange = client.exchange("history", Fields::new()).await.unwrap();
    assert_eq!(exchange.request.service, ServiceTag::Other("history".to_string()));
    assert_eq!(exchange.reply.service, ServiceTag::Other("erro".to_string()));
    let record = interpret_exchange(&exchange, &StatusPolicy::default());
    assert!(matches!(
        record,
        DisplayRecord::Raw { ref reply, .. } if reply["description"] == Value::from("Serviço inválido")
    ));
}
