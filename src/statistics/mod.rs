// Paired-design hypothesis testing primitives
//
// Building blocks for the within-subject comparison of No-Stim vs Stim:
// - Shapiro-Wilk normality diagnostic on the paired differences
// - Paired Student's t-test (parametric)
// - Wilcoxon signed-rank test (non-parametric)
// - Cohen's dz effect size
// - Holm step-down family-wise correction
//
// Scientific Foundation:
// [1] Royston, P. (1995). Remark AS R94: A remark on algorithm AS 181: The
//     W-test for normality. Applied Statistics, 44(4), 547-551.
// [2] Wilcoxon, F. (1945). Individual comparisons by ranking methods.
//     Biometrics Bulletin, 1(6), 80-83.
// [3] Holm, S. (1979). A simple sequentially rejective multiple test
//     procedure. Scandinavian Journal of Statistics, 6(2), 65-70.
// [4] Lakens, D. (2013). Calculating and reporting effect sizes to
//     facilitate cumulative science. Frontiers in Psychology, 4, 863.
//
// Implementation:
// - Uses statrs (crates.io) for the Normal and Student's t distributions
// - All arithmetic in f64; degenerate inputs yield NaN/Inf, never panics

mod correction;
mod effect_size;
mod normality;

pub use correction::holm_correction;
pub use effect_size::{cohens_dz, mean, sample_std_dev};
pub use normality::{shapiro_wilk, ShapiroWilk};
pub use paired_tests::{paired_t_test, wilcoxon_signed_rank, PairedTestOutcome, WilcoxonMethod};
