// SPDX-License-Identifier: MIT
//! Record and dataset types shared by every codec

use serde::{Deserialize, Serialize};

/// A single employee record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: i64,
    name: String,
    salary: f64,
}

impl Record {
    pub fn new(id: i64, name: impl Into<String>, salary: f64) -> Self {
        Self {
            id,
            name: name.into(),
            salary,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn salary(&self) -> f64 {
        self.salary
    }
}

/// Ordered, read-only sequence of records
///
/// Order is part of the value: two datasets holding the same records in a
/// different order are not equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(Vec<Record>);

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self(records)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The three-employee dataset the comparison runs on by default
    pub fn sample() -> Self {
        Self(vec![
            Record::new(1, "Ali", 9000.0),
            Record::new(2, "Kamal", 22000.0),
            Record::new(3, "Amal", 23000.0),
        ])
    }

    pub fn records(&self) -> &[Record] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.0.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.0
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self(records)
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_dataset() {
        let dataset = Dataset::sample();
        assert_eq!(dataset.len(), 3);

        let names: Vec<&str> = dataset.iter().map(Record::name).collect();
        assert_eq!(names, vec!["Ali", "Kamal", "Amal"]);
        assert_eq!(dataset.records()[2].salary(), 23000.0);
    }

    #[test]
    fn test_order_is_significant() {
        let forward = Dataset::sample();
        let reversed: Dataset = forward.records().iter().rev().cloned().collect();
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::empty();
        assert!(dataset.is_empty());
        assert_eq!(dataset, Dataset::new(Vec::new()));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let dataset = Dataset::new(vec![Record::new(7, "Nour", 1500.5)]);
        let json = serde_json::to_string(&dataset).unwrap();
        assert_eq!(json, r#"[{"id":7,"name":"Nour","salary":1500.5}]"#);
    }
}
