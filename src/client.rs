use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::codec;
use crate::domains::endpoint::Endpoint;
use crate::domains::envelope::{Envelope, FieldValue, Fields, ServiceTag};
use crate::error::{ChatwireError, Result};
use crate::interfaces::transport::{Channel, Transport};

/// Wire form of the `timestamp` field injected into every request.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    #[default]
    Iso8601,
    EpochMillis,
}

impl TimestampFormat {
    pub fn now(self) -> Result<FieldValue> {
        let now = OffsetDateTime::now_utc();
        match self {
            Self::Iso8601 => now
                .format(&Rfc3339)
                .map(FieldValue::Text)
                .map_err(|e| ChatwireError::Encoding(e.to_string())),
            Self::EpochMillis => Ok(FieldValue::from(
                (now.unix_timestamp_nanos() / 1_000_000) as i64,
            )),
        }
    }
}

/// One completed round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub request: Envelope,
    pub reply: Envelope,
}

/// Sends one envelope per call over a single channel and decodes the reply.
pub struct RequestClient {
    channel: Box<dyn Channel>,
    timestamps: TimestampFormat,
}

impl RequestClient {
    pub fn new(channel: Box<dyn Channel>, timestamps: TimestampFormat) -> Self {
        Self {
            channel,
            timestamps,
        }
    }

    pub async fn connect(
        transport: &dyn Transport,
        endpoint: &Endpoint,
        timestamps: TimestampFormat,
    ) -> Result<Self> {
        let channel = transport.connect(endpoint).await?;
        Ok(Self::new(channel, timestamps))
    }

    pub async fn invoke(
        &mut self,
        service: impl Into<ServiceTag>,
        data: Fields,
    ) -> Result<Envelope> {
        Ok(self.exchange(service, data).await?.reply)
    }

    /// Like [`invoke`](Self::invoke) but keeps the request alongside the reply.
    /// A `timestamp` already present in `data` is sent as given.
    pub async fn exchange(
        &mut self,
        service: impl Into<ServiceTag>,
        mut data: Fields,
    ) -> Result<Exchange> {
        if !data.contains_key("timestamp") {
            data.insert("timestamp".to_string(), self.timestamps.now()?);
        }
        let request = Envelope::new(service, data);
        let payload = codec::encode(&request)?;
        debug!(service = %request.service, bytes = payload.len(), "request");

        let raw = self.channel.call(&payload).await?;
        let reply = codec::decode(&raw)?;
        debug!(service = %reply.service, bytes = raw.len(), "reply");
        if reply.service != request.service {
            warn!(
                request = %request.service,
                reply = %reply.service,
                "reply names a different service"
            );
        }
        Ok(Exchange { request, reply })
    }

    pub async fn login(&mut self, user: &str) -> Result<Exchange> {
        self.exchange(ServiceTag::Login, single("user", user)).await
    }

    pub async fn users(&mut self) -> Result<Exchange> {
        self.exchange(ServiceTag::Users, Fields::new()).await
    }

    pub async fn create_channel(&mut self, channel: &str) -> Result<Exchange> {
        self.exchange(ServiceTag::Channel, single("channel", channel))
            .await
    }

    pub async fn channels(&mut self) -> Result<Exchange> {
        self.exchange(ServiceTag::Channels, Fields::new()).await
    }

    pub async fn close(&mut self) -> Result<()> {
        self.channel.close().await
    }
}

fn single(key: &str, value: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert(key.to_string(), FieldValue::from(value));
    fields
}
