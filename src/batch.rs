//! Multi-comparison batch runner
//!
//! Tests every (Parameter, Group) cell and Holm-corrects each group's family
//! on its own. Correction only runs once a group's family is complete, and
//! never pools p-values across groups.

use crate::column::Group;
use crate::paired::PairedSampleSet;
use crate::selector::{select_paired_test, TestResult};
use crate::statistics::holm_correction;
use serde::Serialize;

/// Corrected test results of one group, in parameter iteration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupFamily {
    pub group: Group,
    pub results: Vec<TestResult>,
}

impl GroupFamily {
    /// Number of tests with Holm-adjusted p below `alpha`
    pub fn significant_count(&self, alpha: f64) -> usize {
        self.results
            .iter()
            .filter(|r| r.corrected_p.is_some_and(|p| p < alpha))
            .count()
    }
}

/// All group families of a run, in configured group order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResults {
    pub families: Vec<GroupFamily>,
}

impl BatchResults {
    /// Results for one group (empty if the group was not run)
    pub fn group(&self, group: Group) -> &[TestResult] {
        self.families
            .iter()
            .find(|f| f.group == group)
            .map(|f| f.results.as_slice())
            .unwrap_or(&[])
    }
}

/// Fill in Holm-adjusted p-values for one complete family
///
/// An empty family is left untouched.
pub fn apply_holm(results: &mut [TestResult]) {
    if results.is_empty() {
        return;
    }

    let raw: Vec<f64> = results.iter().map(|r| r.raw_p).collect();
    for (result, adjusted) in results.iter_mut().zip(holm_correction(&raw)) {
        result.corrected_p = Some(adjusted);
    }
}

/// Test all cells of every group in `group_order` and correct per group
///
/// A cell that fails to test is logged and left out; it never aborts the
/// remaining cells.
pub fn run_batch(samples: &PairedSampleSet, group_order: &[Group]) -> BatchResults {
    let families = group_order
        .iter()
        .map(|&group| {
            let mut results = Vec::new();

            for parameter in samples.parameters() {
                let Some(sample) = samples.get(parameter, group) else {
                    continue;
                };

                match select_paired_test(sample) {
                    Ok(Some(result)) => results.push(result),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(%parameter, %group, "cell could not be tested: {}", e);
                    }
                }
            }

            apply_holm(&mut results);

            tracing::info!(%group, tests = results.len(), "group family corrected");
            GroupFamily { group, results }
        })
        .collect();

    BatchResults { families }
}
