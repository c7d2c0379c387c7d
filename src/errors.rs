// SPDX-License-Identifier: MIT
//! Top-level error type for a comparison run

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;
use crate::schema::SchemaError;

/// Everything that can abort a comparison run
///
/// None of these are recovered locally; they all end the run.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("schema load error: {0}")]
    SchemaLoad(#[from] SchemaError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("failed to write artifact {}: {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read back artifact {}: {source}", path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact size mismatch for {codec}: wrote {expected} bytes, found {actual} on disk")]
    Consistency {
        codec: String,
        expected: u64,
        actual: u64,
    },

    #[error("codecs {first} and {second} would both write {}", path.display())]
    DuplicateArtifact {
        first: String,
        second: String,
        path: PathBuf,
    },

    #[error("codec {0} is registered more than once")]
    DuplicateCodec(String),

    #[error("no codecs registered")]
    NoCodecs,

    #[error("baseline codec not registered: {0}")]
    UnknownBaseline(String),
}
