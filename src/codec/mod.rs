// SPDX-License-Identifier: MIT
//! Codecs under comparison
//!
//! Every format implements [`Codec`]; the harness only ever sees the trait,
//! so adding a format means adding an implementation and registering it.

pub mod json;
pub mod protobuf;
pub mod xml;

pub use json::JsonCodec;
pub use protobuf::ProtobufCodec;
pub use xml::XmlCodec;

use crate::record::Dataset;
use crate::schema::{Schema, SchemaError};

/// Errors raised by a codec during encode or decode
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("{codec} encode failed: {reason}")]
    Encode { codec: String, reason: String },

    #[error("{codec} decode failed: {reason}")]
    Decode { codec: String, reason: String },
}

impl CodecError {
    pub fn encode(codec: &str, reason: impl ToString) -> Self {
        CodecError::Encode {
            codec: codec.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(codec: &str, reason: impl ToString) -> Self {
        CodecError::Decode {
            codec: codec.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Name of the codec that failed
    pub fn codec(&self) -> &str {
        match self {
            CodecError::Encode { codec, .. } | CodecError::Decode { codec, .. } => codec,
        }
    }
}

/// A paired encode/decode transformation between a dataset and bytes
pub trait Codec {
    /// Display name used in logs and in the report
    fn name(&self) -> &str;

    /// File extension of this codec's artifact, without the leading dot
    fn extension(&self) -> &str;

    /// Serialize the dataset
    ///
    /// Must be deterministic: the same dataset always yields the same bytes.
    fn encode(&self, dataset: &Dataset) -> Result<Vec<u8>, CodecError>;

    /// Parse bytes produced by [`Codec::encode`]
    fn decode(&self, bytes: &[u8]) -> Result<Dataset, CodecError>;
}

/// JSON, XML and Protobuf, in that order
///
/// The Protobuf codec is bound to `schema` and fails here if the schema does
/// not describe the compiled wire types.
pub fn default_codecs(schema: &Schema) -> Result<Vec<Box<dyn Codec>>, SchemaError> {
    Ok(vec![
        Box::new(JsonCodec),
        Box::new(XmlCodec),
        Box::new(ProtobufCodec::new(schema)?),
    ])
}
