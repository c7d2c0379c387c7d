// SPDX-License-Identifier: MIT
//! # Codec Compare
//!
//! Encode/decode timing and output size of three data-interchange formats
//! over the same small employee dataset:
//!
//! - **JSON** (`serde_json`): text, key-value
//! - **XML** (`quick-xml`): text, markup
//! - **Protobuf** (`prost`): binary, driven by `proto/employee.proto`
//!
//! ## How a run works
//!
//! Each [`Codec`] round-trips the dataset (encode, then decode) under a
//! wall-clock timer. Once every codec has succeeded, each output is written
//! to `data.<ext>`, its on-disk size is read back and checked against the
//! encoded length, and a [`ComparisonReport`] ranks the sizes relative to the
//! smallest output (or to a named baseline codec).
//!
//! ## Usage
//!
//! ```no_run
//! use codec_compare::{default_codecs, ArtifactStore, Dataset, Harness, HarnessOptions, Schema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::load("proto/employee.proto")?;
//! let codecs = default_codecs(&schema)?;
//!
//! let harness = Harness::new(ArtifactStore::new(".", "data"), HarnessOptions::default());
//! let report = harness.run_comparison(&Dataset::sample(), &codecs)?;
//!
//! assert_eq!(report.get("Protobuf").unwrap().relative_percent, 100.0);
//! print!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Artifacts
//!
//! | Codec    | File         | Content            |
//! |----------|--------------|--------------------|
//! | JSON     | `data.json`  | UTF-8 JSON array   |
//! | XML      | `data.xml`   | UTF-8 `<root>` doc |
//! | Protobuf | `data.proto` | `Employees` binary |

pub mod artifact;
pub mod codec;
pub mod config;
pub mod errors;
pub mod harness;
pub mod record;
pub mod report;
pub mod schema;
pub mod timing;

// Re-export main types
pub use artifact::{ArtifactStore, StoredArtifact};
pub use codec::{default_codecs, Codec, CodecError, JsonCodec, ProtobufCodec, XmlCodec};
pub use config::{Config, ConfigError, LogFormat};
pub use errors::HarnessError;
pub use harness::{CodecResult, Harness, HarnessOptions};
pub use record::{Dataset, Record};
pub use report::{relative_percent, CodecMeasurement, ComparisonReport, Normalization, ReportEntry};
pub use schema::{Schema, SchemaError};
