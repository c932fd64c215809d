use serde::{de::DeserializeOwned, Serialize};

use crate::error::DomainError;

/// Pretty JSON encoding shared by session records and settings files.
pub fn encode_json<T: Serialize>(value: &T) -> Result<Vec<u8>, DomainError> {
    Ok(serde_json::to_vec_pretty(value)?)
}

pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DomainError> {
    serde_json::from_slice(bytes).map_err(|err| DomainError::Serialization(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Clef, NoteTarget};

    #[test]
    fn encodes_pretty_json() {
        let target = NoteTarget::natural(50, Clef::Bass).unwrap();
        let bytes = encode_json(&target).unwrap();
        let output = String::from_utf8(bytes.clone()).unwrap();
        assert!(output.contains("\"clef\": \"Bass\""));
        let back: NoteTarget = decode_json(&bytes).unwrap();
        assert_eq!(back, target);
    }

    #[test]
    fn decode_reports_serialization_error() {
        let result: Result<NoteTarget, _> = decode_json(b"{not json");
        assert!(matches!(result, Err(DomainError::Serialization(_))));
    }
}
