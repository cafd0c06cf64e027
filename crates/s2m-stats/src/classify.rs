use std::fmt;
use std::path::{Path, PathBuf};

use s2m_core::errors::{ErrorInfo, S2mError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::naming::PatternTable;

/// Parameter value shared by every file of a baseline family.
pub const BASELINE_VALUE: &str = "default";

/// Control knob varied across one sweep, or the baseline fitness grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParameterFamily {
    /// Default parameters on fitness grid 1 (no DIPs).
    #[serde(rename = "fitness1")]
    BaselineFitness1,
    /// Default parameters on fitness grid 2 (with DIPs).
    #[serde(rename = "fitness2")]
    BaselineFitness2,
    /// Varying the rate of recombination.
    #[serde(rename = "recombination")]
    Recombination,
    /// Varying Mahoney synergy.
    #[serde(rename = "synergy")]
    Synergy,
    /// Varying the replication error rate.
    #[serde(rename = "error")]
    ErrorRate,
    /// Varying the fitness accelerator.
    #[serde(rename = "accelerator")]
    Accelerator,
}

impl ParameterFamily {
    /// Every family in processing order.
    pub const ALL: [ParameterFamily; 6] = [
        ParameterFamily::BaselineFitness1,
        ParameterFamily::BaselineFitness2,
        ParameterFamily::Recombination,
        ParameterFamily::Synergy,
        ParameterFamily::ErrorRate,
        ParameterFamily::Accelerator,
    ];

    /// Varied families in the order their markers are tested.
    pub const VARIED: [ParameterFamily; 4] = [
        ParameterFamily::Recombination,
        ParameterFamily::Synergy,
        ParameterFamily::ErrorRate,
        ParameterFamily::Accelerator,
    ];

    /// Stable slug used in logs and artifact names.
    pub fn slug(self) -> &'static str {
        match self {
            ParameterFamily::BaselineFitness1 => "fitness1",
            ParameterFamily::BaselineFitness2 => "fitness2",
            ParameterFamily::Recombination => "recombination",
            ParameterFamily::Synergy => "synergy",
            ParameterFamily::ErrorRate => "error",
            ParameterFamily::Accelerator => "accelerator",
        }
    }

    /// Whether the family is a default-configuration baseline.
    pub fn is_baseline(self) -> bool {
        matches!(
            self,
            ParameterFamily::BaselineFitness1 | ParameterFamily::BaselineFitness2
        )
    }

    fn baseline_for_grid(digit: &str) -> Option<Self> {
        match digit {
            "1" => Some(ParameterFamily::BaselineFitness1),
            "2" => Some(ParameterFamily::BaselineFitness2),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Successful classification of a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Family the file belongs to.
    pub family: ParameterFamily,
    /// Captured parameter value (`default` for baselines).
    pub parameter: String,
}

/// Why a report filename could not be assigned to a family.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unclassified {
    /// No varied-parameter marker and no default marker.
    #[error("no parameter family marker")]
    NoFamilyMarker,
    /// Default marker present but no fitness-grid digit.
    #[error("default configuration without a fitness grid identifier")]
    DefaultWithoutFitness,
    /// Fitness-grid digit other than 1 or 2.
    #[error("unknown fitness grid `{0}`")]
    UnknownFitnessGrid(String),
}

impl Unclassified {
    /// Structured form of the rejection for `filename`.
    pub fn into_error(self, filename: &str) -> S2mError {
        let code = match &self {
            Unclassified::NoFamilyMarker => "no_family_marker",
            Unclassified::DefaultWithoutFitness => "default_without_fitness",
            Unclassified::UnknownFitnessGrid(_) => "unknown_fitness_grid",
        };
        S2mError::Classification(
            ErrorInfo::new(code, self.to_string()).with_context("file", filename),
        )
    }
}

/// Maps `filename` to its parameter family and value.
///
/// Varied families are tested in [`ParameterFamily::VARIED`] order and the
/// first match wins. Only names matching none of them are considered for the
/// default-configuration baselines.
pub fn classify(patterns: &PatternTable, filename: &str) -> Result<Classification, Unclassified> {
    for family in ParameterFamily::VARIED {
        if let Some(value) = patterns.capture_value(family, filename) {
            return Ok(Classification {
                family,
                parameter: value.to_string(),
            });
        }
    }
    if !patterns.is_default(filename) {
        return Err(Unclassified::NoFamilyMarker);
    }
    let digit = patterns
        .fitness_grid(filename)
        .ok_or(Unclassified::DefaultWithoutFitness)?;
    let family = ParameterFamily::baseline_for_grid(digit)
        .ok_or_else(|| Unclassified::UnknownFitnessGrid(digit.to_string()))?;
    Ok(Classification {
        family,
        parameter: BASELINE_VALUE.to_string(),
    })
}

/// Re-extracts the parameter value of `filename` for a known `family`.
pub fn parameter_value(
    patterns: &PatternTable,
    family: ParameterFamily,
    filename: &str,
) -> Option<String> {
    if family.is_baseline() {
        return Some(BASELINE_VALUE.to_string());
    }
    patterns
        .capture_value(family, filename)
        .map(str::to_string)
}

/// A classified simulation report file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFile {
    /// Bare filename as listed in the data directory.
    pub name: String,
    /// Full path used for measuring and reading the file.
    pub path: PathBuf,
    /// Family assigned by the classifier.
    pub family: ParameterFamily,
    /// Parameter value assigned by the classifier.
    pub parameter: String,
    /// Replicate index parsed from the name, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicate: Option<u32>,
}

/// Report file the classifier rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationFailure {
    /// Bare filename.
    pub name: String,
    /// Rendered [`Unclassified`] reason.
    pub reason: String,
}

/// Result of classifying every discovered report file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedFiles {
    /// Classified files in discovery order.
    pub files: Vec<ReportFile>,
    /// Files excluded from every family.
    pub failures: Vec<ClassificationFailure>,
}

impl ClassifiedFiles {
    /// Files assigned to `family`, in discovery order.
    pub fn in_family(&self, family: ParameterFamily) -> impl Iterator<Item = &ReportFile> {
        self.files.iter().filter(move |file| file.family == family)
    }
}

/// Classifies every name under `data_dir`, logging each decision.
pub fn classify_all(patterns: &PatternTable, data_dir: &Path, names: &[String]) -> ClassifiedFiles {
    let mut classified = ClassifiedFiles::default();
    for name in names {
        match classify(patterns, name) {
            Ok(Classification { family, parameter }) => {
                debug!(file = %name, %family, %parameter, "classified report file");
                classified.files.push(ReportFile {
                    name: name.clone(),
                    path: data_dir.join(name),
                    family,
                    parameter,
                    replicate: patterns.replicate_index(name),
                });
            }
            Err(reason) => {
                let failure = ClassificationFailure {
                    name: name.clone(),
                    reason: reason.to_string(),
                };
                let err = reason.into_error(name);
                warn!(error = %err, "excluding unclassifiable report file");
                classified.failures.push(failure);
            }
        }
    }
    classified
}
