use std::fmt;
use std::str::FromStr;

use regex::Regex;
use s2m_core::errors::{ErrorInfo, S2mError};
use serde::{Deserialize, Serialize};

use crate::classify::ParameterFamily;

/// Filename grammar used by a batch of simulation report files.
///
/// * `Hyphenated`: `fitness2-a2_rep5.report` (5th replicate)
/// * `Underscored`: `fit2_a2.report5` (5th replicate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NamingConvention {
    /// Markers introduced by `-`, replicate index as `_repN`.
    #[default]
    Hyphenated,
    /// Markers introduced by `_`, replicate index as a `.reportN` suffix.
    Underscored,
}

impl NamingConvention {
    /// Stable label used in logs and run summaries.
    pub fn label(self) -> &'static str {
        match self {
            NamingConvention::Hyphenated => "hyphenated",
            NamingConvention::Underscored => "underscored",
        }
    }

    fn sources(self) -> PatternSources {
        match self {
            NamingConvention::Hyphenated => PatternSources {
                report: r"(?i)report",
                fitness: r"[Ff]itness(\d)",
                recombination: r"-r(\d)",
                synergy: r"-s(\d)",
                error_rate: r"-e(\d*\.\d+)",
                accelerator: r"-a(\d)",
                replicate: r"[Rr]ep(\d+)",
                default_marker: r"[Dd]efault",
            },
            NamingConvention::Underscored => PatternSources {
                report: r"(?i)report",
                fitness: r"[Ff]it(\d)",
                recombination: r"_r(\d)",
                synergy: r"_s(\d)",
                error_rate: r"_e(\d\.\d+)",
                accelerator: r"_a(\d)",
                replicate: r"[Rr]eport(\d+)",
                default_marker: r"[Dd]efault",
            },
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NamingConvention {
    type Err = S2mError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "hyphenated" => Ok(NamingConvention::Hyphenated),
            "underscored" => Ok(NamingConvention::Underscored),
            other => Err(S2mError::Config(
                ErrorInfo::new("naming_unknown", "unknown naming convention")
                    .with_context("value", other)
                    .with_hint("expected `hyphenated` or `underscored`"),
            )),
        }
    }
}

struct PatternSources {
    report: &'static str,
    fitness: &'static str,
    recombination: &'static str,
    synergy: &'static str,
    error_rate: &'static str,
    accelerator: &'static str,
    replicate: &'static str,
    default_marker: &'static str,
}

/// Compiled pattern table for one [`NamingConvention`].
///
/// Built once at startup and shared by discovery, classification and
/// grouping so that every stage reads filenames the same way.
#[derive(Debug, Clone)]
pub struct PatternTable {
    convention: NamingConvention,
    report: Regex,
    fitness: Regex,
    recombination: Regex,
    synergy: Regex,
    error_rate: Regex,
    accelerator: Regex,
    replicate: Regex,
    default_marker: Regex,
}

impl PatternTable {
    /// Compiles the pattern table for `convention`.
    pub fn compile(convention: NamingConvention) -> Result<Self, S2mError> {
        let sources = convention.sources();
        Ok(Self {
            convention,
            report: compile(sources.report)?,
            fitness: compile(sources.fitness)?,
            recombination: compile(sources.recombination)?,
            synergy: compile(sources.synergy)?,
            error_rate: compile(sources.error_rate)?,
            accelerator: compile(sources.accelerator)?,
            replicate: compile(sources.replicate)?,
            default_marker: compile(sources.default_marker)?,
        })
    }

    /// Convention this table was compiled for.
    pub fn convention(&self) -> NamingConvention {
        self.convention
    }

    /// Whether `name` carries the report-file marker.
    pub fn is_report(&self, name: &str) -> bool {
        self.report.is_match(name)
    }

    /// Whether `name` carries the default-configuration marker.
    pub fn is_default(&self, name: &str) -> bool {
        self.default_marker.is_match(name)
    }

    /// Fitness-grid digit captured from `name`, if any.
    pub fn fitness_grid<'a>(&self, name: &'a str) -> Option<&'a str> {
        capture(&self.fitness, name)
    }

    /// Extraction pattern for a varied family; baseline families have none.
    pub fn family_pattern(&self, family: ParameterFamily) -> Option<&Regex> {
        match family {
            ParameterFamily::Recombination => Some(&self.recombination),
            ParameterFamily::Synergy => Some(&self.synergy),
            ParameterFamily::ErrorRate => Some(&self.error_rate),
            ParameterFamily::Accelerator => Some(&self.accelerator),
            ParameterFamily::BaselineFitness1 | ParameterFamily::BaselineFitness2 => None,
        }
    }

    /// Parameter value captured by the pattern of `family`.
    pub fn capture_value<'a>(&self, family: ParameterFamily, name: &'a str) -> Option<&'a str> {
        self.family_pattern(family)
            .and_then(|pattern| capture(pattern, name))
    }

    /// Replicate index encoded in `name`, if the convention's marker is present.
    pub fn replicate_index(&self, name: &str) -> Option<u32> {
        capture(&self.replicate, name).and_then(|digits| digits.parse().ok())
    }
}

fn capture<'a>(pattern: &Regex, name: &'a str) -> Option<&'a str> {
    pattern
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn compile(source: &str) -> Result<Regex, S2mError> {
    Regex::new(source).map_err(|err| {
        S2mError::Config(
            ErrorInfo::new("pattern_compile", err.to_string()).with_context("pattern", source),
        )
    })
}
