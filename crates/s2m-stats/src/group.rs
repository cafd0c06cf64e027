use s2m_core::errors::{ErrorInfo, S2mError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::{parameter_value, ClassifiedFiles, ParameterFamily, ReportFile};
use crate::naming::PatternTable;

/// Files of one family sharing one parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicateSet {
    /// Family of every member.
    pub family: ParameterFamily,
    /// Parameter value of every member.
    pub parameter: String,
    /// Member files in discovery order; never empty.
    pub files: Vec<ReportFile>,
}

impl ReplicateSet {
    /// Number of replicates in the set.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Always false for sets built by [`group_family`].
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Partitions the files of `family` into replicate sets.
///
/// The first pass collects distinct parameter values in first-seen order,
/// the second assigns each file to the set with its value.
pub fn group_family<'a, I>(
    patterns: &PatternTable,
    family: ParameterFamily,
    files: I,
) -> Result<Vec<ReplicateSet>, S2mError>
where
    I: IntoIterator<Item = &'a ReportFile>,
    I::IntoIter: Clone,
{
    let files = files.into_iter().filter(|file| file.family == family);

    let mut parameters: Vec<String> = Vec::new();
    for file in files.clone() {
        let parameter = extract(patterns, family, file)?;
        if !parameters.contains(&parameter) {
            parameters.push(parameter);
        }
    }
    debug!(%family, ?parameters, "distinct parameter values");

    let mut sets: Vec<ReplicateSet> = parameters
        .into_iter()
        .map(|parameter| ReplicateSet {
            family,
            parameter,
            files: Vec::new(),
        })
        .collect();
    for file in files {
        let parameter = extract(patterns, family, file)?;
        let set = sets
            .iter_mut()
            .find(|set| set.parameter == parameter)
            .ok_or_else(|| {
                S2mError::Grouping(
                    ErrorInfo::new("parameter_vanished", "no replicate set for parameter value")
                        .with_context("file", file.name.clone())
                        .with_context("parameter", parameter.clone()),
                )
            })?;
        set.files.push(file.clone());
    }
    for set in &sets {
        let members: Vec<&str> = set.files.iter().map(|file| file.name.as_str()).collect();
        info!(%family, parameter = %set.parameter, ?members, "replicate set");
    }
    Ok(sets)
}

/// Groups every family in [`ParameterFamily::ALL`] order.
pub fn group_all(
    patterns: &PatternTable,
    classified: &ClassifiedFiles,
) -> Result<Vec<ReplicateSet>, S2mError> {
    let mut sets = Vec::new();
    for family in ParameterFamily::ALL {
        sets.extend(group_family(patterns, family, &classified.files)?);
    }
    Ok(sets)
}

fn extract(
    patterns: &PatternTable,
    family: ParameterFamily,
    file: &ReportFile,
) -> Result<String, S2mError> {
    parameter_value(patterns, family, &file.name).ok_or_else(|| {
        S2mError::Grouping(
            ErrorInfo::new("parameter_missing", "cannot extract parameter value")
                .with_context("file", file.name.clone())
                .with_context("family", family.slug()),
        )
    })
}
