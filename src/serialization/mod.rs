//! CBOR serialization for exported event logs.
//!
//! - CBOR via `ciborium`
//! - Field order follows declaration order, which the event contract fixes
//! - Decoding rejects truncated or foreign input

use crate::ledger::EventRecord;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Serialization errors.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// CBOR encoding failed.
    #[error("CBOR encoding failed: {0}")]
    Encode(String),

    /// CBOR decoding failed.
    #[error("CBOR decoding failed: {0}")]
    Decode(String),
}

/// Serialize to CBOR bytes.
pub fn to_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes)
        .map_err(|e| SerializationError::Encode(format!("{:?}", e)))?;
    Ok(bytes)
}

/// Deserialize from CBOR bytes.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    ciborium::from_reader(bytes).map_err(|e| SerializationError::Decode(format!("{:?}", e)))
}

/// Encode an event log for export.
pub fn encode_event_log(records: &[EventRecord]) -> Result<Vec<u8>, SerializationError> {
    to_cbor(&records)
}

/// Decode an exported event log.
pub fn decode_event_log(bytes: &[u8]) -> Result<Vec<EventRecord>, SerializationError> {
    from_cbor(bytes)
}
