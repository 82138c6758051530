//! Noise-addition mechanisms
//!
//! Laplace and Gaussian (Box–Muller) sampling plus the standard calibration
//! formulas for the differential-privacy mechanisms. Feature values are
//! always clamped back to the normalized `[0, 1]` range after noising.

use rand::Rng;

/// Draw one sample of Laplace noise with the given scale
///
/// Uses inverse-transform sampling: `u ~ U(-0.5, 0.5)`,
/// `noise = -scale * sign(u) * ln(1 - 2|u|)`.
pub fn laplace_noise(rng: &mut impl Rng, scale: f64) -> f64 {
    let u: f64 = rng.gen_range(-0.5..0.5);
    -scale * u.signum() * (1.0 - 2.0 * u.abs()).ln()
}

/// Draw one sample of Gaussian noise via the Box–Muller transform
///
/// `z0 = sqrt(-2 ln u1) * cos(2π u2)`; `u1` is kept away from zero so the
/// log stays finite.
pub fn gaussian_noise(rng: &mut impl Rng, mean: f64, stddev: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    let z0 = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + stddev * z0
}

/// Laplace-mechanism scale for an `(epsilon, sensitivity)` budget
pub fn laplace_scale(sensitivity: f64, epsilon: f64) -> f64 {
    sensitivity / epsilon
}

/// Gaussian-mechanism standard deviation for an `(epsilon, delta,
/// sensitivity)` budget: `sqrt(2 ln(1.25/delta)) * sensitivity / epsilon`
pub fn gaussian_stddev(sensitivity: f64, epsilon: f64, delta: f64) -> f64 {
    (2.0 * (1.25 / delta).ln()).sqrt() * sensitivity / epsilon
}

/// Clamp a noised feature value back into the normalized range
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_laplace_noise_is_finite_and_centered() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples: Vec<f64> = (0..10_000).map(|_| laplace_noise(&mut rng, 0.1)).collect();

        assert!(samples.iter().all(|n| n.is_finite()));
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.01, "laplace mean drifted: {mean}");
    }

    #[test]
    fn test_gaussian_noise_matches_parameters() {
        let mut rng = StdRng::seed_from_u64(11);
        let samples: Vec<f64> = (0..10_000)
            .map(|_| gaussian_noise(&mut rng, 0.5, 0.2))
            .collect();

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / samples.len() as f64;

        assert!((mean - 0.5).abs() < 0.02, "gaussian mean drifted: {mean}");
        assert!((var.sqrt() - 0.2).abs() < 0.02, "gaussian stddev drifted");
    }

    #[test]
    fn test_calibration_formulas() {
        assert!((laplace_scale(1.0, 2.0) - 0.5).abs() < 1e-12);

        let stddev = gaussian_stddev(1.0, 1.0, 1e-5);
        let expected = (2.0f64 * (1.25f64 / 1e-5).ln()).sqrt();
        assert!((stddev - expected).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_unit(1.7), 1.0);
        assert_eq!(clamp_unit(0.42), 0.42);
    }
}
