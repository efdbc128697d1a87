//! Reproducible random point clouds.
//!
//! All generators draw from a caller-owned [`fastrand::Rng`]. Two generators created with the same
//! seed produce the same clouds, and generators on different threads do not affect each other.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector, SMatrix, SVector, Vector2};

/// Draws a sample from the standard normal distribution (Box–Muller transform).
pub fn standard_normal(rng: &mut fastrand::Rng) -> f64 {
    // `1 - f64()` is in (0, 1], keeping the logarithm finite.
    let u1 = 1.0 - rng.f64();
    let u2 = rng.f64();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Scatters `n` points inside an elliptical ring.
///
/// Each point has a uniformly random polar angle and a radius uniformly drawn from `[0.35, 0.95)`,
/// scaled by half of `width` along X and half of `height` along Y.
pub fn ring_cloud(rng: &mut fastrand::Rng, width: f64, height: f64, n: usize) -> Vec<Vector2<f64>> {
    (0..n)
        .map(|_| {
            let theta = 2.0 * PI * rng.f64();
            let radius = 0.35 + 0.6 * rng.f64();
            Vector2::new(
                0.5 * width * radius * theta.cos(),
                0.5 * height * radius * theta.sin(),
            )
        })
        .collect()
}

/// Draws `n` points from a zero-mean multivariate normal distribution with covariance `cov`.
///
/// `cov` must be symmetric positive-semi-definite. Singular covariances are fine (the points then
/// lie in a subspace); small negative eigenvalues caused by rounding are treated as zero.
pub fn gaussian_cloud<const D: usize>(
    rng: &mut fastrand::Rng,
    cov: &SMatrix<f64, D, D>,
    n: usize,
) -> Vec<SVector<f64, D>> {
    let factor = covariance_factor(cov);
    (0..n)
        .map(|_| {
            let z = DVector::from_fn(D, |_, _| standard_normal(rng));
            let x = &factor * z;
            SVector::<f64, D>::from_fn(|i, _| x[i])
        })
        .collect()
}

/// Computes `L = V·√Λ`, so that `L·Lᵀ = cov` and `L·z` has covariance `cov` for standard
/// normal `z`.
///
/// Unlike a Cholesky factor this exists for every positive-semi-definite matrix.
fn covariance_factor<const D: usize>(cov: &SMatrix<f64, D, D>) -> DMatrix<f64> {
    let sym = DMatrix::from_fn(D, D, |row, col| cov[(row, col)]);
    let eigen = sym.symmetric_eigen();
    let mut factor = eigen.eigenvectors;
    for (mut column, &lambda) in factor.column_iter_mut().zip(eigen.eigenvalues.iter()) {
        column *= lambda.max(0.0).sqrt();
    }
    log::trace!("covariance factor: {factor}");
    factor
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::{Matrix2, Matrix3, Vector3};

    use crate::covariance::empirical_covariance;

    use super::*;

    #[test]
    fn same_seed_same_cloud() {
        let cov = Matrix2::new(2.5, 2.0, 2.0, 2.5);
        let a = gaussian_cloud(&mut fastrand::Rng::with_seed(42), &cov, 50);
        let b = gaussian_cloud(&mut fastrand::Rng::with_seed(42), &cov, 50);
        let c = gaussian_cloud(&mut fastrand::Rng::with_seed(43), &cov, 50);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn standard_normal_moments() {
        let mut rng = fastrand::Rng::with_seed(7);
        let samples = (0..20_000)
            .map(|_| standard_normal(&mut rng))
            .collect::<Vec<_>>();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(samples.iter().all(|s| s.is_finite()));
        assert_abs_diff_eq!(mean, 0.0, epsilon = 0.05);
        assert_abs_diff_eq!(var, 1.0, epsilon = 0.05);
    }

    #[test]
    fn ring_stays_in_annulus() {
        let mut rng = fastrand::Rng::with_seed(8);
        let points = ring_cloud(&mut rng, 8.0, 4.2, 160);
        assert_eq!(points.len(), 160);
        for p in points {
            // normalized elliptical radius
            let r = ((p.x / 4.0).powi(2) + (p.y / 2.1).powi(2)).sqrt();
            assert!((0.35 - 1e-12..0.95 + 1e-12).contains(&r), "radius {r}");
        }
    }

    #[test]
    fn gaussian_cloud_matches_covariance() {
        #[rustfmt::skip]
        let cov = Matrix3::new(
            3.0, 2.5, 0.5,
            2.5, 3.0, 0.5,
            0.5, 0.5, 1.0,
        );
        let points = gaussian_cloud(&mut fastrand::Rng::with_seed(123), &cov, 20_000);
        assert_abs_diff_eq!(empirical_covariance(&points), cov, epsilon = 0.15);
    }

    #[test]
    fn singular_covariance() {
        // all mass on the line y = x
        let cov = Matrix2::new(1.0, 1.0, 1.0, 1.0);
        let points = gaussian_cloud(&mut fastrand::Rng::with_seed(1), &cov, 100);
        for p in points {
            assert!(p.iter().all(|c| c.is_finite()));
            assert_abs_diff_eq!(p.x, p.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn zero_covariance_yields_origin() {
        let points = gaussian_cloud(&mut fastrand::Rng::with_seed(5), &Matrix3::zeros(), 10);
        assert!(points.iter().all(|p| *p == Vector3::zeros()));
    }
}
