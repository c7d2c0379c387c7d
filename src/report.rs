// SPDX-License-Identifier: MIT
//! Comparison report: sizes, timings and relative sizes per codec

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::HarnessError;
use crate::timing::as_millis_f64;

/// What relative sizes are measured against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Normalization {
    /// The smallest output (every codec tied for smallest reports 100.0)
    #[default]
    Minimum,
    /// A named codec's output
    Baseline(String),
}

/// Raw numbers collected for one codec
#[derive(Debug, Clone, PartialEq)]
pub struct CodecMeasurement {
    pub name: String,
    pub artifact: PathBuf,
    pub byte_size: u64,
    pub encode_duration: Duration,
    pub decode_duration: Duration,
    pub digest: String,
}

/// One row of the report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub name: String,
    pub artifact: PathBuf,
    pub byte_size: u64,
    /// `100 * byte_size / reference size`, one decimal place
    pub relative_percent: f64,
    pub encode_duration: Duration,
    pub decode_duration: Duration,
    pub digest: String,
}

/// Per-codec results in registration order
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    entries: Vec<ReportEntry>,
    normalization: Normalization,
    reference_size: u64,
}

/// Relative size in percent, rounded to one decimal place
///
/// A zero-byte reference only happens for an empty dataset: zero-byte outputs
/// then match it exactly and anything larger is infinitely larger.
pub fn relative_percent(size: u64, reference: u64) -> f64 {
    if reference == 0 {
        return if size == 0 { 100.0 } else { f64::INFINITY };
    }
    let percent = 100.0 * size as f64 / reference as f64;
    (percent * 10.0).round() / 10.0
}

impl ComparisonReport {
    pub fn build(
        measurements: Vec<CodecMeasurement>,
        normalization: &Normalization,
    ) -> Result<Self, HarnessError> {
        let reference_size = match normalization {
            Normalization::Minimum => measurements
                .iter()
                .map(|m| m.byte_size)
                .min()
                .ok_or(HarnessError::NoCodecs)?,
            Normalization::Baseline(name) => measurements
                .iter()
                .find(|m| &m.name == name)
                .map(|m| m.byte_size)
                .ok_or_else(|| HarnessError::UnknownBaseline(name.clone()))?,
        };

        let entries = measurements
            .into_iter()
            .map(|m| ReportEntry {
                relative_percent: relative_percent(m.byte_size, reference_size),
                name: m.name,
                artifact: m.artifact,
                byte_size: m.byte_size,
                encode_duration: m.encode_duration,
                decode_duration: m.decode_duration,
                digest: m.digest,
            })
            .collect();

        Ok(Self {
            entries,
            normalization: normalization.clone(),
            reference_size,
        })
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn normalization(&self) -> &Normalization {
        &self.normalization
    }

    pub fn reference_size(&self) -> u64 {
        self.reference_size
    }

    /// Name shown as "the reference" in the analysis section
    fn reference_name(&self) -> &str {
        match &self.normalization {
            Normalization::Baseline(name) => name,
            Normalization::Minimum => self
                .entries
                .iter()
                .find(|e| e.byte_size == self.reference_size)
                .map_or("", |e| e.name.as_str()),
        }
    }

    fn is_reference(&self, entry: &ReportEntry) -> bool {
        match &self.normalization {
            Normalization::Baseline(name) => &entry.name == name,
            Normalization::Minimum => entry.byte_size == self.reference_size,
        }
    }
}

fn file_name(entry: &ReportEntry) -> String {
    entry
        .artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.artifact.display().to_string())
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "--- {} ---", entry.name)?;
            writeln!(
                f,
                "{} encode: {:.3}ms",
                entry.name,
                as_millis_f64(entry.encode_duration)
            )?;
            writeln!(
                f,
                "{} decode: {:.3}ms",
                entry.name,
                as_millis_f64(entry.decode_duration)
            )?;
            writeln!(f)?;
        }

        writeln!(f, "--- Artifacts ---")?;
        for entry in &self.entries {
            writeln!(f, "✓ {} written (sha256 {})", file_name(entry), entry.digest)?;
        }
        writeln!(f)?;

        let name_width = self.entries.iter().map(|e| file_name(e).len()).max().unwrap_or(0);
        writeln!(f, "--- Sizes ---")?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:<width$} : {} bytes",
                format!("'{}'", file_name(entry)),
                entry.byte_size,
                width = name_width + 2
            )?;
        }
        writeln!(f)?;

        let label_width = self.entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
        let reference = self.reference_name();
        writeln!(f, "--- Comparative analysis ---")?;
        for entry in &self.entries {
            if self.is_reference(entry) {
                writeln!(
                    f,
                    "{:<width$} : {:.1}% (reference)",
                    entry.name,
                    entry.relative_percent,
                    width = label_width
                )?;
            } else {
                writeln!(
                    f,
                    "{:<width$} : {:.1}% of the size of {}",
                    entry.name,
                    entry.relative_percent,
                    reference,
                    width = label_width
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(name: &str, byte_size: u64) -> CodecMeasurement {
        CodecMeasurement {
            name: name.to_string(),
            artifact: PathBuf::from(format!("data.{}", name.to_lowercase())),
            byte_size,
            encode_duration: Duration::from_micros(10),
            decode_duration: Duration::from_micros(20),
            digest: "00".to_string(),
        }
    }

    fn percents(report: &ComparisonReport) -> Vec<f64> {
        report.entries().iter().map(|e| e.relative_percent).collect()
    }

    #[test]
    fn test_relative_to_minimum() {
        let report = ComparisonReport::build(
            vec![measurement("A", 120), measurement("B", 100), measurement("C", 150)],
            &Normalization::Minimum,
        )
        .unwrap();

        assert_eq!(report.reference_size(), 100);
        assert_eq!(percents(&report), vec![120.0, 100.0, 150.0]);
    }

    #[test]
    fn test_order_follows_input() {
        let report = ComparisonReport::build(
            vec![measurement("C", 3), measurement("A", 1), measurement("B", 2)],
            &Normalization::Minimum,
        )
        .unwrap();

        let names: Vec<&str> = report.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_tied_minimum() {
        let report = ComparisonReport::build(
            vec![measurement("A", 57), measurement("B", 57), measurement("C", 60)],
            &Normalization::Minimum,
        )
        .unwrap();
        assert_eq!(percents(&report), vec![100.0, 100.0, 105.3]);
    }

    #[test]
    fn test_relative_to_baseline() {
        let report = ComparisonReport::build(
            vec![measurement("A", 50), measurement("B", 100), measurement("C", 150)],
            &Normalization::Baseline("B".to_string()),
        )
        .unwrap();
        assert_eq!(percents(&report), vec![50.0, 100.0, 150.0]);
    }

    #[test]
    fn test_unknown_baseline() {
        let err = ComparisonReport::build(
            vec![measurement("A", 50)],
            &Normalization::Baseline("Z".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, HarnessError::UnknownBaseline(name) if name == "Z"));
    }

    #[test]
    fn test_no_measurements() {
        let err = ComparisonReport::build(Vec::new(), &Normalization::Minimum).unwrap_err();
        assert!(matches!(err, HarnessError::NoCodecs));
    }

    #[test]
    fn test_relative_percent_rounding() {
        assert_eq!(relative_percent(130, 57), 228.1);
        assert_eq!(relative_percent(2, 3), 66.7);
        assert_eq!(relative_percent(57, 57), 100.0);
    }

    #[test]
    fn test_zero_reference() {
        assert_eq!(relative_percent(0, 0), 100.0);
        assert!(relative_percent(2, 0).is_infinite());
    }

    #[test]
    fn test_display() {
        let report = ComparisonReport::build(
            vec![measurement("JSON", 120), measurement("Protobuf", 60)],
            &Normalization::Minimum,
        )
        .unwrap();
        let text = report.to_string();

        assert!(text.contains("--- JSON ---"));
        assert!(text.contains("JSON encode: 0.010ms"));
        assert!(text.contains("'data.protobuf' : 60 bytes"));
        assert!(text.contains("JSON     : 200.0% of the size of Protobuf"));
        assert!(text.contains("Protobuf : 100.0% (reference)"));
    }
}
