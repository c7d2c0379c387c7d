// SPDX-License-Identifier: MIT
//! JSON codec: the record list serialized directly as a JSON array

use super::{Codec, CodecError};
use crate::record::Dataset;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn name(&self) -> &str {
        "JSON"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn encode(&self, dataset: &Dataset) -> Result<Vec<u8>, CodecError> {
        // serde_json writes non-finite floats as `null`, which would not decode
        if let Some((index, record)) = dataset
            .iter()
            .enumerate()
            .find(|(_, r)| !r.salary().is_finite())
        {
            return Err(CodecError::encode(
                self.name(),
                format!(
                    "record {} salary {} has no JSON representation",
                    index,
                    record.salary()
                ),
            ));
        }

        serde_json::to_vec(dataset).map_err(|e| CodecError::encode(self.name(), e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Dataset, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::decode(self.name(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn test_round_trip() {
        let dataset = Dataset::sample();
        let bytes = JsonCodec.encode(&dataset).unwrap();
        assert_eq!(JsonCodec.decode(&bytes).unwrap(), dataset);
    }

    #[test]
    fn test_encoded_shape() {
        let dataset = Dataset::new(vec![Record::new(1, "Ali", 9000.0)]);
        let bytes = JsonCodec.encode(&dataset).unwrap();
        assert_eq!(bytes, br#"[{"id":1,"name":"Ali","salary":9000.0}]"#.to_vec());
    }

    #[test]
    fn test_empty_dataset() {
        let bytes = JsonCodec.encode(&Dataset::empty()).unwrap();
        assert_eq!(bytes, b"[]".to_vec());
        assert!(JsonCodec.decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_finite_salary() {
        let dataset = Dataset::new(vec![Record::new(1, "Ali", f64::NAN)]);
        let err = JsonCodec.encode(&dataset).unwrap_err();
        assert!(matches!(err, CodecError::Encode { .. }));
    }

    #[test]
    fn test_decode_malformed() {
        let err = JsonCodec.decode(br#"[{"id":1,"name":"Ali""#).unwrap_err();
        assert!(matches!(err, CodecError::Decode { ref codec, .. } if codec == "JSON"));
    }

    #[test]
    fn test_decode_wrong_field_type() {
        let err = JsonCodec
            .decode(br#"[{"id":1,"name":"Ali","salary":"lots"}]"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
    }
}
