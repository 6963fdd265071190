// Shapiro-Wilk W test for normality
//
// Royston's (1995) AS R94 approximations: polynomial corrections for the two
// most extreme coefficients, normal-score coefficients elsewhere, and a
// log-normal approximation of the null distribution of W. n = 3 has an
// exact closed form.

use crate::error::{AnalysisError, Result};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Below this range the sample is treated as constant
const SMALL: f64 = 1e-19;

// AS R94 polynomial coefficients (lowest order first)
const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Result of a Shapiro-Wilk test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapiroWilk {
    /// W statistic in (0, 1]
    pub statistic: f64,

    /// Upper-tail p-value; small values reject normality
    pub pvalue: f64,
}

/// Evaluate a polynomial with coefficients in ascending order
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * x + c)
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| AnalysisError::Distribution(e.to_string()))
}

/// Positive half of the W coefficients, `a[i]` weighting `x[n-1-i] - x[i]`
fn coefficients(n: usize) -> Result<Vec<f64>> {
    if n == 3 {
        return Ok(vec![FRAC_1_SQRT_2]);
    }

    let normal = standard_normal()?;
    let half = n / 2;
    let an = n as f64;

    // Expected normal order statistics for the lower half (all negative)
    let m: Vec<f64> = (1..=half)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25)))
        .collect();

    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();
    let a1 = poly(&C1, rsn) - m[0] / ssumm2;

    let mut a = vec![0.0; half];
    a[0] = a1;

    let (first, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a[1] = a2;
        let fac = ((summ2 - 2.0 * m[0].powi(2) - 2.0 * m[1].powi(2))
            / (1.0 - 2.0 * a1.powi(2) - 2.0 * a2.powi(2)))
        .sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0].powi(2)) / (1.0 - 2.0 * a1.powi(2))).sqrt();
        (1, fac)
    };

    for i in first..half {
        a[i] = -m[i] / fac;
    }

    Ok(a)
}

/// Upper-tail p-value of W for sample size n
fn w_pvalue(w: f64, n: usize) -> Result<f64> {
    if n == 3 {
        let p = 6.0 / PI * (w.sqrt().asin() - (0.75f64).sqrt().asin());
        return Ok(p.clamp(0.0, 1.0));
    }

    let an = n as f64;
    let w1 = (1.0 - w).ln();

    let (y, mu, sigma) = if n <= 11 {
        let gamma = poly(&G, an);
        if w1 >= gamma {
            return Ok(1e-99);
        }
        (-(gamma - w1).ln(), poly(&C3, an), poly(&C4, an).exp())
    } else {
        let xx = an.ln();
        (w1, poly(&C5, xx), poly(&C6, xx).exp())
    };

    let z = (y - mu) / sigma;
    Ok(standard_normal()?.sf(z))
}

/// Shapiro-Wilk test of the hypothesis that `sample` is normally distributed
///
/// Requires at least 3 finite values. A sample with zero range is reported
/// as W = 1, p = 1.
///
/// # Example
/// ```
/// use plusmaze::statistics::shapiro_wilk;
///
/// let result = shapiro_wilk(&[1.0, 1.0, 1.0, 1.0, 2.0]).unwrap();
/// assert!(result.pvalue < 0.05); // one outlier over a constant block
/// ```
pub fn shapiro_wilk(sample: &[f64]) -> Result<ShapiroWilk> {
    let n = sample.len();
    if n < 3 {
        return Err(AnalysisError::InsufficientData {
            test: "Shapiro-Wilk",
            needed: 3,
            got: n,
        });
    }

    if sample.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::Distribution(
            "Shapiro-Wilk requires finite values".to_string(),
        ));
    }

    if n > 5000 {
        tracing::debug!(n, "Shapiro-Wilk p-value may be inaccurate for n > 5000");
    }

    let mut x = sample.to_vec();
    x.sort_by(|a, b| a.total_cmp(b));

    if x[n - 1] - x[0] < SMALL {
        return Ok(ShapiroWilk {
            statistic: 1.0,
            pvalue: 1.0,
        });
    }

    let a = coefficients(n)?;
    let norm_a: f64 = 2.0 * a.iter().map(|v| v * v).sum::<f64>();

    let mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    let sax: f64 = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (x[n - 1 - i] - x[i]))
        .sum();

    let w = (sax * sax / (norm_a * ss)).min(1.0);
    let pvalue = w_pvalue(w, n)?;

    Ok(ShapiroWilk {
        statistic: w,
        pvalue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poly_ascending_order() {
        // 1 + 2x + 3x^2 at x = 2
        assert_eq!(poly(&[1.0, 2.0, 3.0], 2.0), 17.0);
    }

    #[test]
    fn test_coefficients_are_unit_norm() {
        for n in [4, 5, 6, 10, 11, 12, 25, 50] {
            let a = coefficients(n).unwrap();
            assert_eq!(a.len(), n / 2);
            let norm: f64 = 2.0 * a.iter().map(|v| v * v).sum::<f64>();
            assert!((norm - 1.0).abs() < 1e-9, "n={} norm={}", n, norm);
            // Extreme order statistics carry the largest weight
            assert!(a.windows(2).all(|w| w[0] >= w[1]), "n={} {:?}", n, a);
        }
    }

    #[test]
    fn test_n3_exact_coefficient() {
        assert_eq!(coefficients(3).unwrap(), vec![FRAC_1_SQRT_2]);
    }

    #[test]
    fn test_n3_equally_spaced_is_maximal() {
        // Equally spaced triple attains W = 1 and the exact p-value is 1
        let result = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
        assert!((result.statistic - 1.0).abs() < 1e-12);
        assert!((result.pvalue - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_n3_lower_bound_p_is_zero() {
        // Two equal values and one apart: W = 0.75, the minimum for n = 3
        let result = shapiro_wilk(&[0.0, 0.0, 1.0]).unwrap();
        assert!((result.statistic - 0.75).abs() < 1e-12);
        assert!(result.pvalue.abs() < 1e-9);
    }

    #[test]
    fn test_outlier_over_constant_block_rejects_normality() {
        let result = shapiro_wilk(&[1.0, 1.0, 1.0, 1.0, 2.0]).unwrap();
        assert!((result.statistic - 0.5522).abs() < 1e-3, "W={}", result.statistic);
        assert!(result.pvalue < 0.001, "p={}", result.pvalue);
    }

    #[test]
    fn test_symmetric_sample_is_normal() {
        let result = shapiro_wilk(&[-2.0, -1.0, 0.0, 1.0, 2.0]).unwrap();
        assert!(result.statistic > 0.95, "W={}", result.statistic);
        assert!(result.pvalue > 0.05, "p={}", result.pvalue);
    }

    #[test]
    fn test_large_normal_scores_are_normal() {
        // Expected normal order statistics are the most "normal" sample possible
        let normal = standard_normal().unwrap();
        let n = 30;
        let sample: Vec<f64> = (1..=n)
            .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (n as f64 + 0.25)))
            .collect();

        let result = shapiro_wilk(&sample).unwrap();
        assert!(result.statistic > 0.98, "W={}", result.statistic);
        assert!(result.pvalue > 0.5, "p={}", result.pvalue);
    }

    #[test]
    fn test_large_skewed_sample_rejects_normality() {
        let sample: Vec<f64> = (0..40).map(|i| (i as f64 / 4.0).exp()).collect();
        let result = shapiro_wilk(&sample).unwrap();
        assert!(result.pvalue < 0.05, "p={}", result.pvalue);
    }

    #[test]
    fn test_constant_sample_is_reported_normal() {
        let result = shapiro_wilk(&[3.0, 3.0, 3.0, 3.0]).unwrap();
        assert_eq!(result.statistic, 1.0);
        assert_eq!(result.pvalue, 1.0);
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = shapiro_wilk(&[4.0, 1.0, 3.0, 9.0, 2.0, 5.0]).unwrap();
        let b = shapiro_wilk(&[9.0, 5.0, 4.0, 3.0, 2.0, 1.0]).unwrap();
        assert!((a.statistic - b.statistic).abs() < 1e-12);
        assert!((a.pvalue - b.pvalue).abs() < 1e-12);
    }

    #[test]
    fn test_too_few_values() {
        assert!(matches!(
            shapiro_wilk(&[1.0, 2.0]),
            Err(AnalysisError::InsufficientData { needed: 3, got: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        assert!(shapiro_wilk(&[1.0, f64::NAN, 2.0]).is_err());
    }
}
