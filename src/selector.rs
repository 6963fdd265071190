//! Paired hypothesis test selection for one (Parameter, Group) cell
//!
//! The normality of the within-subject differences decides, once per cell,
//! between the paired t-test and the Wilcoxon signed-rank test. The mapping
//! from verdict to test lives in [`TEST_SELECTION`].

use crate::column::Group;
use crate::error::{AnalysisError, Result};
use crate::paired::PairedSample;
use crate::statistics::{
    cohens_dz, paired_t_test, shapiro_wilk, wilcoxon_signed_rank, PairedTestOutcome,
};
use serde::Serialize;
use std::fmt;

/// Normality p-value threshold; `p > NORMALITY_ALPHA` counts as normal
pub const NORMALITY_ALPHA: f64 = 0.05;

/// Cells with fewer pairs than this are not tested
pub const MIN_PAIRED_SAMPLES: usize = 3;

/// Outcome of the normality diagnostic on the paired differences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NormalityVerdict {
    Normal,
    NonNormal,
}

impl NormalityVerdict {
    /// Classify a Shapiro-Wilk p-value (NaN counts as non-normal)
    pub fn from_pvalue(pvalue: f64) -> Self {
        if pvalue > NORMALITY_ALPHA {
            NormalityVerdict::Normal
        } else {
            NormalityVerdict::NonNormal
        }
    }
}

/// Paired test family member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TestName {
    /// Paired Student's t-test
    ParametricPaired,
    /// Wilcoxon signed-rank test
    NonparametricPaired,
}

impl TestName {
    pub fn label(self) -> &'static str {
        match self {
            TestName::ParametricPaired => "Paired t-test",
            TestName::NonparametricPaired => "Wilcoxon signed-rank",
        }
    }
}

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verdict → test mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestSelection {
    pub normal: TestName,
    pub non_normal: TestName,
}

impl TestSelection {
    pub fn select(&self, verdict: NormalityVerdict) -> TestName {
        match verdict {
            NormalityVerdict::Normal => self.normal,
            NormalityVerdict::NonNormal => self.non_normal,
        }
    }
}

/// Parametric when the differences look normal, rank-based otherwise
pub const TEST_SELECTION: TestSelection = TestSelection {
    normal: TestName::ParametricPaired,
    non_normal: TestName::NonparametricPaired,
};

/// Result of testing one (Parameter, Group) cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub parameter: String,
    pub group: Group,
    pub test: TestName,
    pub statistic: f64,
    pub raw_p: f64,
    /// Cohen's dz of intervention − baseline
    pub effect_size: f64,
    /// Holm-adjusted p; set by the batch runner once the group family is complete
    pub corrected_p: Option<f64>,
    /// Number of complete pairs
    pub n: usize,
    /// Shapiro-Wilk p of the differences (NaN when the test was forced)
    pub normality_p: f64,
}

/// Run the named paired test on (intervention, baseline)
pub fn run_paired_test(test: TestName, sample: &PairedSample) -> Result<PairedTestOutcome> {
    match test {
        TestName::ParametricPaired => paired_t_test(&sample.intervention, &sample.baseline),
        TestName::NonparametricPaired => {
            wilcoxon_signed_rank(&sample.intervention, &sample.baseline)
        }
    }
}

/// Choose and run the paired test for one cell
///
/// Returns `Ok(None)` when either arm has fewer than
/// [`MIN_PAIRED_SAMPLES`] values: such cells are excluded, not reported
/// with a NaN p-value.
pub fn select_paired_test(sample: &PairedSample) -> Result<Option<TestResult>> {
    if sample.baseline.len() < MIN_PAIRED_SAMPLES
        || sample.intervention.len() < MIN_PAIRED_SAMPLES
    {
        tracing::debug!(
            parameter = %sample.parameter,
            group = %sample.group,
            n = sample.len(),
            "too few pairs, cell not tested"
        );
        return Ok(None);
    }

    if sample.baseline.len() != sample.intervention.len() {
        return Err(AnalysisError::LengthMismatch {
            left: sample.intervention.len(),
            right: sample.baseline.len(),
        });
    }

    let differences = sample.differences();
    let normality = shapiro_wilk(&differences)?;
    let verdict = NormalityVerdict::from_pvalue(normality.pvalue);
    let test = TEST_SELECTION.select(verdict);
    let outcome = run_paired_test(test, sample)?;

    tracing::debug!(
        parameter = %sample.parameter,
        group = %sample.group,
        n = sample.len(),
        normality_p = normality.pvalue,
        test = %test,
        p = outcome.pvalue,
        "tested cell"
    );

    Ok(Some(TestResult {
        parameter: sample.parameter.clone(),
        group: sample.group,
        test,
        statistic: outcome.statistic,
        raw_p: outcome.pvalue,
        effect_size: cohens_dz(&differences),
        corrected_p: None,
        n: sample.len(),
        normality_p: normality.pvalue,
    }))
}
