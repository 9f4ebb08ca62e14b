pub mod client;
pub mod codec;
pub mod config;
pub mod domains;
pub mod error;
pub mod interfaces;
pub mod services;

pub use crate::client::{Exchange, RequestClient, TimestampFormat};
pub use crate::config::Config;
pub use crate::domains::envelope::{Envelope, FieldValue, Fields, ServiceTag};
pub use crate::domains::record::DisplayRecord;
pub use crate::error::{ChatwireError, Result};
pub use crate::services::interpreter::{interpret, StatusPolicy};
pub use crate::services::sampling::Sampler;
pub use crate::services::scenario::{Phase, Plan, Preset, RunReport, Scenario};
