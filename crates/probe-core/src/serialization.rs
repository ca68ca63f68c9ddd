//! JSON serialization for probe report data
//!
//! Reports travel between probes and the app as JSON. Fields that are empty
//! are omitted by the individual types' serde attributes, so decoding a
//! sparse document yields the empty/unset form of each field.

use crate::errors::ProbeError;
use serde::{Deserialize, Serialize};

/// Unified error type for serialization operations
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input was not valid UTF-8
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl From<SerializationError> for ProbeError {
    fn from(err: SerializationError) -> Self {
        ProbeError::serialization(err.to_string())
    }
}

/// Standard Result type for serialization operations
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serialize any serde-compatible type to JSON bytes
pub fn to_vec<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Deserialize JSON bytes to any serde-compatible type
pub fn from_slice<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| SerializationError::InvalidFormat(e.to_string()))?;
    from_str(text)
}

/// Serialize to a JSON string
pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Deserialize from a JSON string
pub fn from_str<T: for<'de> Deserialize<'de>>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StringSet;

    #[test]
    fn test_roundtrip_bytes() {
        let set: StringSet = ["a", "b"].into_iter().collect();
        let bytes = to_vec(&set).unwrap();
        let decoded: StringSet = from_slice(&bytes).unwrap();
        assert_eq!(decoded, set);
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = from_slice::<StringSet>(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, SerializationError::InvalidFormat(_)));
    }

    #[test]
    fn test_malformed_json_maps_to_probe_error() {
        let err = from_str::<StringSet>("{not json").unwrap_err();
        let probe: ProbeError = err.into();
        assert!(matches!(probe, ProbeError::Serialization { .. }));
    }
}
