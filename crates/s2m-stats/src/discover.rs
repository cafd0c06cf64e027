use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::naming::PatternTable;

/// Report-file candidates found in a data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    /// Candidate filenames sorted by name.
    pub names: Vec<String>,
    /// Number of listing errors that were skipped.
    pub listing_errors: usize,
}

/// Lists `dir` and keeps the regular files carrying the report marker.
///
/// Listing errors are logged and skipped so that a partial listing is still
/// processed. A missing directory therefore yields an empty discovery with
/// one recorded error.
pub fn discover_reports(dir: &Path, patterns: &PatternTable) -> Discovery {
    let mut discovery = Discovery::default();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "error while listing data directory");
                discovery.listing_errors += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping non UTF-8 filename");
            continue;
        };
        if patterns.is_report(name) {
            debug!(file = name, "report file candidate");
            discovery.names.push(name.to_string());
        }
    }
    info!(
        dir = %dir.display(),
        candidates = discovery.names.len(),
        listing_errors = discovery.listing_errors,
        "listed data directory"
    );
    discovery
}
