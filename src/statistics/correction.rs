// Holm step-down correction for one family of tests
//
// The family is whatever slice the caller passes in; groups are corrected
// separately by calling this once per group.

/// Holm-adjusted p-values, in the same order as `pvalues`
///
/// The k-th smallest finite p (0-based) is multiplied by (m − k), a running
/// maximum enforces monotonicity, and results are clipped to 1. Equal
/// p-values keep their input order. NaN p-values are not part of the family:
/// they do not count towards m and their adjusted value is NaN. An empty
/// slice yields an empty vector.
///
/// # Example
/// ```
/// use plusmaze::statistics::holm_correction;
///
/// let adjusted = holm_correction(&[0.01, 0.04, 0.03]);
/// assert_eq!(adjusted.len(), 3);
/// assert!((adjusted[0] - 0.03).abs() < 1e-12);
/// assert!((adjusted[2] - 0.06).abs() < 1e-12);
/// assert!((adjusted[1] - 0.06).abs() < 1e-12);
/// ```
pub fn holm_correction(pvalues: &[f64]) -> Vec<f64> {
    let mut adjusted = vec![f64::NAN; pvalues.len()];

    let mut order: Vec<usize> = (0..pvalues.len())
        .filter(|&i| !pvalues[i].is_nan())
        .collect();
    // Stable sort: ties stay in caller order
    order.sort_by(|&a, &b| pvalues[a].total_cmp(&pvalues[b]));

    let m = order.len();
    let mut running_max = 0.0f64;
    for (k, &idx) in order.iter().enumerate() {
        let scaled = pvalues[idx] * (m - k) as f64;
        running_max = running_max.max(scaled);
        adjusted[idx] = running_max.min(1.0);
    }

    adjusted
}
