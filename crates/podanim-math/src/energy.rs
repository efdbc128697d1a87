//! Energy captured by projecting a point set onto a direction.
//!
//! For a point set `P` and a direction angle `θ`, the *projected energy* is
//!
//! ```text
//! E(θ) = Σ_i (P_i · [cos θ, sin θ])²
//! ```
//!
//! POD looks for the `θ` maximizing `E`. That direction is the principal eigenvector of the scatter
//! matrix `S = Σ_i P_i P_iᵀ`, since `E(θ) = uᵀ S u` for the unit vector `u` at angle `θ`.

use std::f64::consts::PI;

use nalgebra::{Matrix2, Vector2};

use crate::{iter, num::unsigned_angle};

/// Added to the total energy before dividing by it, so that empty point sets yield a ratio of 0.
pub const RATIO_EPSILON: f64 = 1e-6;

/// Returns the unit vector pointing at angle `theta`.
#[inline]
pub fn direction(theta: f64) -> Vector2<f64> {
    Vector2::new(theta.cos(), theta.sin())
}

/// Computes the energy `E(θ)` of `points` projected onto the direction at angle `theta`.
///
/// Returns 0.0 for an empty point set.
pub fn projected_energy(points: &[Vector2<f64>], theta: f64) -> f64 {
    let dir = direction(theta);
    points.iter().map(|p| p.dot(&dir).powi(2)).sum()
}

/// Computes the total energy `Σ_i ‖P_i‖²` of `points`.
///
/// This is the sum of [`projected_energy`] over any two orthogonal directions.
pub fn total_energy(points: &[Vector2<f64>]) -> f64 {
    points.iter().map(|p| p.norm_squared()).sum()
}

/// Computes the fraction of the total energy captured by the direction at angle `theta`.
///
/// See [`EnergyMeter::ratio`]. Use an [`EnergyMeter`] when evaluating many angles for the same
/// point set.
pub fn energy_ratio(points: &[Vector2<f64>], theta: f64) -> f64 {
    EnergyMeter::new(points).ratio(theta)
}

/// Answers energy queries for a fixed point set.
///
/// The total energy of the point set is computed once on construction.
#[derive(Debug, Clone, Copy)]
pub struct EnergyMeter<'a> {
    points: &'a [Vector2<f64>],
    total: f64,
}

impl<'a> EnergyMeter<'a> {
    pub fn new(points: &'a [Vector2<f64>]) -> Self {
        Self {
            points,
            total: total_energy(points),
        }
    }

    /// Returns the point set this meter measures.
    #[inline]
    pub fn points(&self) -> &'a [Vector2<f64>] {
        self.points
    }

    /// Returns the total energy of the point set (without [`RATIO_EPSILON`]).
    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Returns the projected energy `E(θ)`.
    pub fn energy(&self, theta: f64) -> f64 {
        projected_energy(self.points, theta)
    }

    /// Returns `E(θ) / (Σ_i ‖P_i‖² + ε)`, clamped to `[0, 1]`.
    ///
    /// This never fails: an empty or all-zero point set yields 0.0, and rounding overshoot at the
    /// maximum-energy angle is clamped away. Point sets whose energies overflow (or contain
    /// non-finite coordinates) also yield 0.0.
    pub fn ratio(&self, theta: f64) -> f64 {
        let ratio = self.energy(theta) / (self.total + RATIO_EPSILON);
        if ratio.is_nan() {
            return 0.0;
        }
        ratio.clamp(0.0, 1.0)
    }
}

/// Evaluates `E(θ)` on `samples` evenly spaced angles in `[0, π)`.
///
/// Returns `(angle, energy)` pairs in increasing angle order. Because `E(θ) = E(θ + π)`, this
/// covers every direction.
pub fn scan(points: &[Vector2<f64>], samples: usize) -> Vec<(f64, f64)> {
    iter::half_turn(samples)
        .map(|theta| (theta, projected_energy(points, theta)))
        .collect()
}

/// Returns the scanned angle in `[0, π)` with the largest projected energy.
///
/// The result is accurate to `π / samples`. [`principal_angle`] computes the exact maximizer.
/// Of several equal maxima the smallest angle wins, so point sets without a preferred direction
/// yield 0.0, like [`principal_angle`].
///
/// # Panics
///
/// Panics if `samples` is 0.
pub fn max_energy_angle(points: &[Vector2<f64>], samples: usize) -> f64 {
    assert!(samples > 0, "energy scan needs at least one sample");
    let (theta, energy) = scan(points, samples)
        .into_iter()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
        .unwrap_or((0.0, 0.0));
    log::trace!("max energy {energy} at {theta} ({samples} samples)");
    theta
}

/// Computes the scatter matrix `S = Σ_i P_i P_iᵀ` of `points`.
pub fn scatter_matrix(points: &[Vector2<f64>]) -> Matrix2<f64> {
    points
        .iter()
        .fold(Matrix2::zeros(), |acc, p| acc + p * p.transpose())
}

/// Computes the direction in `[0, π)` that maximizes `E(θ)`, in closed form.
///
/// Expanding `E(θ) = uᵀ S u` gives `(Sxx + Syy)/2 + (Sxx − Syy)/2 · cos 2θ + Sxy · sin 2θ`, which
/// peaks at `2θ = atan2(2 Sxy, Sxx − Syy)`.
///
/// Isotropic and empty point sets have no preferred direction; 0.0 is returned for them.
pub fn principal_angle(points: &[Vector2<f64>]) -> f64 {
    let s = scatter_matrix(points);
    let theta = 0.5 * (2.0 * s[(0, 1)]).atan2(s[(0, 0)] - s[(1, 1)]);
    unsigned_angle(theta)
}

/// Returns the angle in `[0, π)` of the direction *minimizing* `E(θ)`.
///
/// This is always perpendicular to [`principal_angle`].
pub fn trough_angle(points: &[Vector2<f64>]) -> f64 {
    unsigned_angle(principal_angle(points) + PI / 2.0)
}
