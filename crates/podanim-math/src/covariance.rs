//! Covariance matrices and their decomposition into POD modes.

use std::cmp::Reverse;

use nalgebra::{
    storage::RawStorage, DMatrix, DVector, Dim, Matrix, Matrix2, SMatrix, SVector, Vector2,
    Vector3,
};

use crate::num::TotalF64;

/// Returns the 2D rotation matrix `R(θ)` rotating counterclockwise by `theta`.
#[rustfmt::skip]
pub fn rotation(theta: f64) -> Matrix2<f64> {
    let (sin, cos) = theta.sin_cos();
    Matrix2::new(
        cos, -sin,
        sin, cos,
    )
}

/// Builds the covariance matrix `C = R(θ) · diag(λ1, λ2) · R(θ)ᵀ`.
///
/// The result has eigenvalues `lambda1` and `lambda2`, with the eigenvector of `lambda1` pointing
/// at angle `theta`. It is symmetric, and positive-semi-definite whenever both eigenvalues are
/// non-negative.
pub fn pod_covariance(theta: f64, lambda1: f64, lambda2: f64) -> Matrix2<f64> {
    let r = rotation(theta);
    r * Matrix2::from_diagonal(&Vector2::new(lambda1, lambda2)) * r.transpose()
}

/// Computes the unbiased sample covariance of `points`.
///
/// The mean is removed and the sum of outer products is divided by `N − 1`. Point sets with fewer
/// than 2 points have no defined covariance; the zero matrix is returned for them.
pub fn empirical_covariance<const D: usize>(points: &[SVector<f64, D>]) -> SMatrix<f64, D, D> {
    let mut cov = SMatrix::<f64, D, D>::zeros();
    let n = points.len();
    if n < 2 {
        return cov;
    }

    let mut mean = SVector::<f64, D>::zeros();
    for point in points {
        for i in 0..D {
            mean[i] += point[i];
        }
    }
    for i in 0..D {
        mean[i] /= n as f64;
    }

    for point in points {
        for row in 0..D {
            for col in 0..D {
                cov[(row, col)] += (point[row] - mean[row]) * (point[col] - mean[col]);
            }
        }
    }
    for value in cov.iter_mut() {
        *value /= (n - 1) as f64;
    }

    cov
}

/// A single POD mode: an eigenvalue ("energy") and its unit eigenvector.
#[derive(Debug, Clone, PartialEq)]
pub struct Mode {
    energy: f64,
    direction: DVector<f64>,
}

impl Mode {
    /// Returns the eigenvalue of this mode, which is the variance captured along its direction.
    #[inline]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Returns the unit eigenvector of this mode.
    ///
    /// Eigenvectors are only defined up to sign. The returned vector is oriented so that its
    /// largest-magnitude component is positive.
    #[inline]
    pub fn direction(&self) -> &DVector<f64> {
        &self.direction
    }

    /// Returns the first 3 components of the direction, padding with zeros.
    ///
    /// This is how 2D modes are placed in the drawing plane.
    pub fn direction_xyz(&self) -> Vector3<f64> {
        Vector3::from_fn(|i, _| self.direction.get(i).copied().unwrap_or(0.0))
    }
}

/// The eigen-decomposition of a covariance matrix, ordered by decreasing energy.
///
/// Created by [`decompose`].
#[derive(Debug, Clone, PartialEq)]
pub struct Modes {
    modes: Vec<Mode>,
}

impl Modes {
    /// Returns the number of modes (the dimension of the decomposed matrix).
    #[inline]
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Returns mode `index`, where index 0 is "Mode 1", the mode capturing the most energy.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Mode> {
        self.modes.get(index)
    }

    /// Returns the mode capturing the most energy.
    #[inline]
    pub fn principal(&self) -> Option<&Mode> {
        self.modes.first()
    }

    /// Returns an iterator over all modes, in order of decreasing energy.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Mode> + '_ {
        self.modes.iter()
    }

    /// Returns the sum of all eigenvalues (the trace of the decomposed matrix).
    pub fn total_energy(&self) -> f64 {
        self.modes.iter().map(|mode| mode.energy).sum()
    }

    /// Returns `λ_i / Σλ` for mode `index`.
    ///
    /// If the total energy is zero, every mode captures a ratio of 0.0.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn energy_ratio(&self, index: usize) -> f64 {
        let total = self.total_energy();
        if total == 0.0 {
            0.0
        } else {
            self.modes[index].energy / total
        }
    }

    /// Returns the energy ratio of every mode, in mode order.
    pub fn energy_ratios(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.energy_ratio(i)).collect()
    }
}

/// Decomposes a real symmetric matrix into its eigenpairs, sorted by decreasing eigenvalue.
///
/// Only the lower triangle of `cov` is read, so slightly asymmetric input (from accumulated
/// rounding) is tolerated. Exactly equal eigenvalues keep the order produced by the underlying
/// decomposition.
///
/// # Panics
///
/// Panics if `cov` is not square.
pub fn decompose<R, C, S>(cov: &Matrix<f64, R, C, S>) -> Modes
where
    R: Dim,
    C: Dim,
    S: RawStorage<f64, R, C>,
{
    assert_eq!(
        cov.nrows(),
        cov.ncols(),
        "only square matrices can be decomposed"
    );

    let dim = cov.nrows();
    let sym = DMatrix::from_fn(dim, dim, |row, col| cov[(row.max(col), row.min(col))]);
    let eigen = sym.symmetric_eigen();

    let mut order = (0..dim).collect::<Vec<_>>();
    order.sort_by_key(|&i| Reverse(TotalF64(eigen.eigenvalues[i])));

    let modes = order
        .into_iter()
        .map(|i| Mode {
            energy: eigen.eigenvalues[i],
            direction: orient(eigen.eigenvectors.column(i).into_owned()),
        })
        .collect::<Vec<_>>();

    log::trace!(
        "decomposed {dim}x{dim} matrix, eigenvalues: {:?}",
        modes.iter().map(|m| m.energy).collect::<Vec<_>>()
    );

    Modes { modes }
}

/// Flips `v` so that its largest-magnitude component is positive.
fn orient(v: DVector<f64>) -> DVector<f64> {
    let dominant = v
        .iter()
        .copied()
        .max_by_key(|c| TotalF64(c.abs()))
        .unwrap_or(0.0);
    if dominant < 0.0 {
        -v
    } else {
        v
    }
}
