//! Provenance and schema descriptors attached to run summaries.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information recorded for every statistics run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Schema of the run summary this provenance is attached to.
    pub schema: SchemaVersion,
    /// Directory the report files were read from.
    pub data_dir: String,
    /// Directory the statistics artifacts were written to.
    pub stat_dir: String,
    /// ISO-8601 timestamp recording when the run started.
    pub created_at: String,
    /// Version map for all tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Captures provenance for a run over `data_dir` writing into `stat_dir`.
    pub fn capture(data_dir: impl Into<String>, stat_dir: impl Into<String>) -> Self {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(
            "s2m-core".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        Self {
            schema: SchemaVersion::default(),
            data_dir: data_dir.into(),
            stat_dir: stat_dir.into(),
            created_at: Utc::now().to_rfc3339(),
            tool_versions,
        }
    }

    /// Records the version of an additional tool taking part in the run.
    pub fn with_tool(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.tool_versions.insert(name.into(), version.into());
        self
    }
}
