// SPDX-License-Identifier: MIT
//! The comparison harness
//!
//! Runs every codec over the same dataset in registration order:
//!
//! 1. time `encode`, then time `decode` of its output
//! 2. once every codec has round-tripped, write each output to its artifact
//! 3. read each artifact's size back from disk and check it against the
//!    in-memory length
//! 4. build the report, normalized per [`Normalization`]
//!
//! Encoding for all codecs happens before the first write, so a codec that
//! rejects the dataset leaves no artifacts from this run behind.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::artifact::ArtifactStore;
use crate::codec::{Codec, CodecError};
use crate::errors::HarnessError;
use crate::record::Dataset;
use crate::report::{CodecMeasurement, ComparisonReport, Normalization};
use crate::timing::measure;

/// Knobs for a comparison run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessOptions {
    pub normalization: Normalization,
    /// Fail the run if a codec's decoded dataset differs from the input
    pub verify_round_trip: bool,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            normalization: Normalization::Minimum,
            verify_round_trip: true,
        }
    }
}

/// Output of one codec invocation, dropped once its bytes are persisted
///
/// `decoded` is what the round-trip check compares against the input.
#[derive(Debug)]
pub struct CodecResult {
    pub name: String,
    pub extension: String,
    pub encoded_bytes: Vec<u8>,
    pub encode_duration: Duration,
    pub decode_duration: Duration,
    pub decoded: Dataset,
}

pub struct Harness {
    store: ArtifactStore,
    options: HarnessOptions,
}

impl Harness {
    pub fn new(store: ArtifactStore, options: HarnessOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn options(&self) -> &HarnessOptions {
        &self.options
    }

    /// Round-trip `dataset` through every codec, persist the outputs and
    /// report sizes relative to the reference
    pub fn run_comparison(
        &self,
        dataset: &Dataset,
        codecs: &[Box<dyn Codec>],
    ) -> Result<ComparisonReport, HarnessError> {
        self.check_codecs(codecs)?;
        info!(
            codecs = codecs.len(),
            records = dataset.len(),
            "Starting codec comparison"
        );

        let mut results = Vec::with_capacity(codecs.len());
        for codec in codecs {
            let result = self.round_trip(codec.as_ref(), dataset)?;
            if self.options.verify_round_trip && &result.decoded != dataset {
                error!(codec = %result.name, "Round-trip produced a different dataset");
                return Err(
                    CodecError::decode(&result.name, "decoded dataset differs from input").into(),
                );
            }
            results.push(result);
        }

        self.store.init()?;
        let mut measurements = Vec::with_capacity(results.len());
        for result in results {
            let stored = self.store.write(&result.extension, &result.encoded_bytes)?;
            measurements.push(CodecMeasurement {
                name: result.name,
                artifact: stored.path,
                byte_size: stored.bytes_written,
                encode_duration: result.encode_duration,
                decode_duration: result.decode_duration,
                digest: stored.digest,
            });
        }

        for measurement in &measurements {
            let on_disk = self.store.size_on_disk(&measurement.artifact)?;
            if on_disk != measurement.byte_size {
                error!(
                    codec = %measurement.name,
                    expected = measurement.byte_size,
                    actual = on_disk,
                    "Artifact size does not match encoded length"
                );
                return Err(HarnessError::Consistency {
                    codec: measurement.name.clone(),
                    expected: measurement.byte_size,
                    actual: on_disk,
                });
            }
            debug!(codec = %measurement.name, bytes = on_disk, "Artifact size confirmed");
        }

        let report = ComparisonReport::build(measurements, &self.options.normalization)?;
        info!(
            reference_size = report.reference_size(),
            "Codec comparison complete"
        );
        Ok(report)
    }

    /// Reject runs that cannot produce a well-formed report before any codec
    /// does work
    fn check_codecs(&self, codecs: &[Box<dyn Codec>]) -> Result<(), HarnessError> {
        if codecs.is_empty() {
            return Err(HarnessError::NoCodecs);
        }

        for (i, codec) in codecs.iter().enumerate() {
            if codecs[..i].iter().any(|c| c.name() == codec.name()) {
                return Err(HarnessError::DuplicateCodec(codec.name().to_string()));
            }
            if let Some(earlier) = codecs[..i]
                .iter()
                .find(|c| c.extension() == codec.extension())
            {
                return Err(HarnessError::DuplicateArtifact {
                    first: earlier.name().to_string(),
                    second: codec.name().to_string(),
                    path: self.store.path_for(codec.extension()),
                });
            }
        }

        if let Normalization::Baseline(name) = &self.options.normalization {
            if !codecs.iter().any(|c| c.name() == name) {
                return Err(HarnessError::UnknownBaseline(name.clone()));
            }
        }

        Ok(())
    }

    fn round_trip(&self, codec: &dyn Codec, dataset: &Dataset) -> Result<CodecResult, HarnessError> {
        let name = codec.name();

        let (encoded, encode_duration) = measure(|| codec.encode(dataset));
        let encoded_bytes = encoded.map_err(|e| {
            error!(codec = name, error = %e, "Encode failed");
            e
        })?;
        info!(
            codec = name,
            bytes = encoded_bytes.len(),
            elapsed_us = encode_duration.as_micros() as u64,
            "Encoded"
        );

        let (decoded, decode_duration) = measure(|| codec.decode(&encoded_bytes));
        let decoded = decoded.map_err(|e| {
            error!(codec = name, error = %e, "Decode failed");
            e
        })?;
        info!(
            codec = name,
            records = decoded.len(),
            elapsed_us = decode_duration.as_micros() as u64,
            "Decoded"
        );

        Ok(CodecResult {
            name: name.to_string(),
            extension: codec.extension().to_string(),
            encoded_bytes,
            encode_duration,
            decode_duration,
            decoded,
        })
    }
}
