//! Derived tables for pre-declared parameters (Treatment group only)
//!
//! - subject-level rows for the primary parameters: baseline, intervention,
//!   delta and percent change per subject
//! - locomotion control comparisons, which always use the paired t-test and
//!   bypass the normality-driven selection

use crate::column::Group;
use crate::error::Result;
use crate::paired::PairedSampleSet;
use crate::statistics::{cohens_dz, paired_t_test};
use serde::Serialize;

/// Group the derived tables are computed for
pub const DERIVED_GROUP: Group = Group::Treatment;

/// One subject's change under stimulation for one parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRow {
    pub parameter: String,
    pub subject: String,
    pub baseline: f64,
    pub intervention: f64,
    /// intervention − baseline
    pub delta: f64,
    /// delta / baseline × 100; ±∞ or NaN when baseline is 0
    pub percent_change: f64,
}

impl DerivedRow {
    pub fn new(
        parameter: impl Into<String>,
        subject: impl Into<String>,
        baseline: f64,
        intervention: f64,
    ) -> Self {
        let delta = intervention - baseline;
        Self {
            parameter: parameter.into(),
            subject: subject.into(),
            baseline,
            intervention,
            delta,
            percent_change: delta / baseline * 100.0,
        }
    }
}

/// Fixed paired t-test result for a locomotion control parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocomotionResult {
    pub parameter: String,
    pub statistic: f64,
    pub pvalue: f64,
    pub effect_size: f64,
    pub n: usize,
}

/// Subject-level rows for each primary parameter
///
/// Parameters are emitted in the given order, subjects sorted by key within
/// a parameter. Parameters without Treatment pairs contribute no rows.
pub fn subject_table(samples: &PairedSampleSet, primary: &[String]) -> Vec<DerivedRow> {
    let mut rows = Vec::new();

    for parameter in primary {
        let Some(sample) = samples.get(parameter, DERIVED_GROUP) else {
            tracing::warn!(%parameter, "primary parameter has no Treatment data");
            continue;
        };

        let mut block: Vec<DerivedRow> = sample
            .subjects
            .iter()
            .zip(sample.baseline.iter().zip(&sample.intervention))
            .map(|(subject, (&off, &on))| DerivedRow::new(parameter.as_str(), subject.as_str(), off, on))
            .collect();
        block.sort_by(|a, b| a.subject.cmp(&b.subject));
        rows.extend(block);
    }

    rows
}

/// Paired t-test for each locomotion control parameter, regardless of normality
///
/// Parameters without any Treatment measurements are omitted.
pub fn locomotion_comparison(
    samples: &PairedSampleSet,
    locomotion: &[String],
) -> Result<Vec<LocomotionResult>> {
    let mut results = Vec::new();

    for parameter in locomotion {
        let Some(sample) = samples.get(parameter, DERIVED_GROUP) else {
            tracing::warn!(%parameter, "locomotion parameter has no Treatment data");
            continue;
        };

        let outcome = paired_t_test(&sample.intervention, &sample.baseline)?;
        results.push(LocomotionResult {
            parameter: parameter.clone(),
            statistic: outcome.statistic,
            pvalue: outcome.pvalue,
            effect_size: cohens_dz(&sample.differences()),
            n: sample.len(),
        });
    }

    Ok(results)
}
