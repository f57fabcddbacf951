//! Trace file reading and aggregation.
//!
//! Streams an NDJSON trace file line by line and builds one ordered
//! probability series per condition. Any malformed line is fatal; there
//! is no skip-and-continue.

use crate::models::{Record, SeriesMap, TraceError};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Which entries to keep during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryFilter {
    /// Keep every entry.
    #[default]
    All,
    /// Skip auxiliary predicates: conditions containing `exist` or `{`.
    SkipAuxiliary,
}

impl EntryFilter {
    /// Whether an entry for `condition` should be aggregated.
    fn keeps(self, condition: &str) -> bool {
        match self {
            EntryFilter::All => true,
            EntryFilter::SkipAuxiliary => {
                !condition.contains("exist") && !condition.contains('{')
            }
        }
    }
}

/// Reads a trace file into per-condition probability series.
///
/// Each line decodes to a [`Record`]; each kept entry appends its
/// probability to the series keyed by its condition. An empty file
/// yields an empty map.
pub fn read_trace(path: &Path, filter: EntryFilter) -> Result<SeriesMap> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open trace file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut series = SeriesMap::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line
            .with_context(|| format!("Failed to read line {} of {}", i + 1, path.display()))?;
        debug!("timepoint {}", i);

        let record: Record = serde_json::from_str(&line).map_err(|source| TraceError::Parse {
            line: i + 1,
            source,
        })?;

        for (condition, probability) in record.entries {
            debug!("entry: {} = {}", condition, probability);
            if filter.keeps(&condition) {
                series.append(&condition, probability);
            }
        }
    }

    Ok(series)
}
