//! JSON wire form of the `{service, data}` envelope.

use serde_json::{Map, Value};

use crate::domains::envelope::{Envelope, FieldValue, Fields};
use crate::error::{ChatwireError, Result};

pub fn encode(envelope: &Envelope) -> Result<Vec<u8>> {
    let mut data = Map::new();
    for (key, value) in &envelope.data {
        let wire = value
            .to_wire()
            .map_err(|e| ChatwireError::Encoding(format!("field '{key}': {e}")))?;
        data.insert(key.clone(), wire);
    }

    let mut root = Map::new();
    root.insert(
        "service".to_string(),
        Value::String(envelope.service.as_str().to_string()),
    );
    root.insert("data".to_string(), Value::Object(data));

    serde_json::to_vec(&Value::Object(root)).map_err(|e| ChatwireError::Encoding(e.to_string()))
}

/// Unknown keys are kept, missing `data` decodes as empty.
pub fn decode(bytes: &[u8]) -> Result<Envelope> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ChatwireError::Decoding(e.to_string()))?;
    let Value::Object(mut root) = value else {
        return Err(ChatwireError::Decoding(
            "envelope is not a JSON object".to_string(),
        ));
    };

    let service = match root.remove("service") {
        Some(Value::String(service)) => service,
        Some(other) => {
            return Err(ChatwireError::Decoding(format!(
                "service must be a string, found {other}"
            )))
        }
        None => return Err(ChatwireError::Decoding("missing service".to_string())),
    };

    let data = match root.remove("data") {
        None | Some(Value::Null) => Fields::new(),
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(key, value)| (key, FieldValue::from(value)))
            .collect(),
        Some(other) => {
            return Err(ChatwireError::Decoding(format!(
                "data must be an object, found {other}"
            )))
        }
    };

    Ok(Envelope::new(service, data))
}
