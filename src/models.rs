//! Data models for marginal-probability traces.
//!
//! This module contains the core data structures shared by the reader
//! and both renderers: the per-line record schema, the aggregated
//! series map, and the trace error taxonomy.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// One line of an NDJSON trace file, i.e. one timepoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    /// Probability readings recorded at this timepoint, as
    /// `(condition, probability)` pairs.
    pub entries: Vec<(String, f64)>,
}

/// Errors raised while reading or validating a trace.
///
/// Every variant is fatal: the run aborts on the first one and no
/// partial output is written.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A line failed to decode as a JSON record.
    #[error("line {line}: malformed trace record: {source}")]
    Parse {
        /// 1-based line number of the offending line.
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Aggregation produced no series (empty or fully filtered input).
    #[error("trace contains no series (empty or fully filtered input)")]
    Empty,

    /// Two series ended up with different lengths.
    #[error("series \"{condition}\" has {actual} values, expected {expected}")]
    LengthMismatch {
        condition: String,
        expected: usize,
        actual: usize,
    },

    /// A condition in the curve order never appeared in the trace.
    #[error("condition \"{condition}\" is in the curve order but absent from the trace")]
    MissingSeries { condition: String },

    /// A condition in the curve order has no legend entry.
    #[error("condition \"{condition}\" has no legend entry")]
    MissingLegend { condition: String },
}

/// Aggregated probability series, one per condition.
///
/// Iteration follows first-sight order of the conditions in the trace,
/// so repeated runs over the same file produce identical output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesMap {
    series: HashMap<String, Vec<f64>>,
    order: Vec<String>,
}

impl SeriesMap {
    /// Creates an empty series map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a probability to the series for `condition`, creating the
    /// series on first sight.
    pub fn append(&mut self, condition: &str, probability: f64) {
        match self.series.get_mut(condition) {
            Some(values) => values.push(probability),
            None => {
                self.order.push(condition.to_string());
                self.series.insert(condition.to_string(), vec![probability]);
            }
        }
    }

    /// Returns the series for `condition`, if present.
    pub fn get(&self, condition: &str) -> Option<&[f64]> {
        self.series.get(condition).map(Vec::as_slice)
    }

    /// Number of distinct conditions tracked.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if no series has been recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over `(condition, values)` pairs in first-sight order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.order
            .iter()
            .map(|c| (c.as_str(), self.series[c].as_slice()))
    }

    /// Number of timepoints, taken from the first series.
    ///
    /// Fails on an empty map; there is no length to inspect.
    pub fn timepoints(&self) -> Result<usize, TraceError> {
        match self.order.first() {
            Some(first) => Ok(self.series[first].len()),
            None => Err(TraceError::Empty),
        }
    }

    /// Checks that every series has the same length and returns it.
    ///
    /// On divergence, reports which series differs from the first one
    /// and by how much, so callers can decide whether to abort or log.
    pub fn check_consistent(&self) -> Result<usize, TraceError> {
        let expected = self.timepoints()?;
        for (condition, values) in self.iter() {
            if values.len() != expected {
                return Err(TraceError::LengthMismatch {
                    condition: condition.to_string(),
                    expected,
                    actual: values.len(),
                });
            }
        }
        Ok(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserialization() {
        let line = r#"{"entries":[["lonely[sub=test_Jack0]",0.9],["exciting[sub=test_Jill0]",0.1]]}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert_eq!(record.entries.len(), 2);
        assert_eq!(record.entries[0].0, "lonely[sub=test_Jack0]");
        assert_eq!(record.entries[0].1, 0.9);
    }

    #[test]
    fn test_record_missing_entries_field_fails() {
        let result: Result<Record, _> = serde_json::from_str(r#"{"other":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_record_ignores_extra_fields() {
        let line = r#"{"entries":[["a",0.5]],"iteration":3}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert_eq!(record.entries.len(), 1);
    }

    #[test]
    fn test_append_creates_and_extends() {
        let mut map = SeriesMap::new();
        map.append("a", 0.9);
        map.append("b", 0.1);
        map.append("a", 0.8);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some([0.9, 0.8].as_slice()));
        assert_eq!(map.get("b"), Some([0.1].as_slice()));
        assert_eq!(map.get("c"), None);
    }

    #[test]
    fn test_iteration_preserves_first_sight_order() {
        let mut map = SeriesMap::new();
        map.append("z", 0.1);
        map.append("a", 0.2);
        map.append("m", 0.3);

        let order: Vec<&str> = map.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_check_consistent_ok() {
        let mut map = SeriesMap::new();
        for _ in 0..3 {
            map.append("a", 0.5);
            map.append("b", 0.5);
        }
        assert_eq!(map.check_consistent().unwrap(), 3);
    }

    #[test]
    fn test_check_consistent_reports_diverging_series() {
        let mut map = SeriesMap::new();
        map.append("a", 0.5);
        map.append("b", 0.5);
        map.append("a", 0.6);

        match map.check_consistent() {
            Err(TraceError::LengthMismatch {
                condition,
                expected,
                actual,
            }) => {
                assert_eq!(condition, "b");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected LengthMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_timepoints_on_empty_map_fails() {
        let map = SeriesMap::new();
        assert!(matches!(map.timepoints(), Err(TraceError::Empty)));
        assert!(matches!(map.check_consistent(), Err(TraceError::Empty)));
    }
}
