//! Parser for `llvm-cov export -format=text`
//!
//! ```text
//! { "type": "llvm.coverage.json.export", "version": "2.0.1",
//!   "data": [ { "files": [ { "filename": "/src/a.c",
//!                            "segments": [[line, col, count, hasCount,
//!                                          isRegionEntry, isGapRegion], ...] } ] } ] }
//! ```
//!
//! Exporters before LLVM 11 emit five-element segments without the gap flag.

use super::CoverageSource;
use crate::annotate::CoverageEvent;
use crate::result::{LinecovError, LinecovResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ExportDocument {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    version: Option<String>,
    data: Vec<ExportUnit>,
}

#[derive(Debug, Deserialize)]
struct ExportUnit {
    #[serde(default)]
    files: Vec<ExportFile>,
}

#[derive(Debug, Deserialize)]
struct ExportFile {
    filename: String,
    #[serde(default)]
    segments: Vec<Vec<Value>>,
}

/// Parsed coverage export, keyed by source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlvmExport {
    files: Vec<String>,
    events: BTreeMap<String, Vec<CoverageEvent>>,
}

impl LlvmExport {
    /// Parse an export document from a string
    ///
    /// # Errors
    ///
    /// Returns error if the document is not valid JSON, has no `data`
    /// entries, or contains a malformed segment
    pub fn from_json(json: &str) -> LinecovResult<Self> {
        let document: ExportDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Parse an export document from a reader
    ///
    /// # Errors
    ///
    /// Same as [`LlvmExport::from_json`], plus read errors
    pub fn from_reader(reader: impl Read) -> LinecovResult<Self> {
        let document: ExportDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    /// Parse an export document stored in a file
    ///
    /// # Errors
    ///
    /// Same as [`LlvmExport::from_reader`], plus open errors
    pub fn from_path(path: &Path) -> LinecovResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    fn from_document(document: ExportDocument) -> LinecovResult<Self> {
        if document.data.is_empty() {
            return Err(LinecovError::invalid_export("export contains no data"));
        }
        debug!(
            kind = document.kind.as_deref().unwrap_or("unknown"),
            version = document.version.as_deref().unwrap_or("unknown"),
            units = document.data.len(),
            "parsing coverage export"
        );

        let mut events: BTreeMap<String, Vec<CoverageEvent>> = BTreeMap::new();
        for file in document.data.into_iter().flat_map(|unit| unit.files) {
            if events.contains_key(&file.filename) {
                debug!(file = %file.filename, "duplicate file entry ignored");
                continue;
            }
            let mut parsed = file
                .segments
                .iter()
                .enumerate()
                .map(|(index, segment)| parse_segment(&file.filename, index, segment))
                .collect::<LinecovResult<Vec<_>>>()?;
            parsed.sort_by_key(|e| (e.line, e.column));
            events.insert(file.filename, parsed);
        }

        Ok(Self {
            files: events.keys().cloned().collect(),
            events,
        })
    }

    /// Number of files in the export
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the export covers no files at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl CoverageSource for LlvmExport {
    fn files(&self) -> &[String] {
        &self.files
    }

    fn events(&self, file: &str) -> Vec<CoverageEvent> {
        self.events.get(file).cloned().unwrap_or_default()
    }
}

fn parse_segment(file: &str, index: usize, segment: &[Value]) -> LinecovResult<CoverageEvent> {
    let invalid = |message: String| LinecovError::InvalidSegment {
        file: file.to_string(),
        index,
        message,
    };
    if !(5..=6).contains(&segment.len()) {
        return Err(invalid(format!(
            "expected 5 or 6 elements, found {}",
            segment.len()
        )));
    }

    let number = |pos: usize, name: &str| -> LinecovResult<u64> {
        segment[pos]
            .as_u64()
            .ok_or_else(|| invalid(format!("{name} is not an unsigned integer")))
    };
    let position = |pos: usize, name: &str| -> LinecovResult<u32> {
        u32::try_from(number(pos, name)?).map_err(|_| invalid(format!("{name} out of range")))
    };
    let flag = |pos: usize, name: &str| -> LinecovResult<bool> {
        segment
            .get(pos)
            .map_or(Some(false), Value::as_bool)
            .ok_or_else(|| invalid(format!("{name} is not a boolean")))
    };

    Ok(CoverageEvent {
        line: position(0, "line")?,
        column: position(1, "column")?,
        count: number(2, "count")?,
        has_code: flag(3, "hasCount")?,
        is_region_entry: flag(4, "isRegionEntry")?,
        is_gap_region: flag(5, "isGapRegion")?,
    })
}
