pub mod endpoint;
pub mod envelope;
pub mod record;
