// Descriptive helpers and Cohen's dz for paired designs

/// Arithmetic mean; NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1); NaN for fewer than two values
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Cohen's dz = mean(d) / sd(d), d = intervention − baseline
///
/// Zero spread is not an error: constant non-zero differences give ±∞,
/// all-zero differences give NaN.
pub fn cohens_dz(differences: &[f64]) -> f64 {
    mean(differences) / sample_std_dev(differences)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_sample_std_dev_uses_n_minus_one() {
        // Population variance would be 5.0; sample variance is 20/3
        let sd = sample_std_dev(&[2.0, 4.0, 6.0, 8.0]);
        assert!((sd - (20.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!(sample_std_dev(&[1.0]).is_nan());
    }

    #[test]
    fn test_cohens_dz_reference_value() {
        let dz = cohens_dz(&[1.0, 1.0, 1.0, 1.0, 2.0]);
        // mean 1.2, sd sqrt(0.2)
        assert!((dz - 1.2 / 0.2f64.sqrt()).abs() < 1e-12);
        assert!((dz - 2.683).abs() < 1e-3);
    }

    #[test]
    fn test_cohens_dz_sign_follows_mean_difference() {
        assert!(cohens_dz(&[-1.0, -2.0, -0.5]) < 0.0);
        assert!(cohens_dz(&[1.0, 2.0, 0.5]) > 0.0);
    }

    #[test]
    fn test_cohens_dz_constant_differences_is_infinite() {
        assert_eq!(cohens_dz(&[2.0, 2.0, 2.0]), f64::INFINITY);
        assert_eq!(cohens_dz(&[-2.0, -2.0, -2.0]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_cohens_dz_zero_differences_is_nan() {
        assert!(cohens_dz(&[0.0, 0.0, 0.0]).is_nan());
    }
}
