//! Interpolation between paths and matrices, and easing curves.

use nalgebra::{
    allocator::Allocator, storage::RawStorage, DefaultAllocator, Dim, Matrix, OMatrix, Vector3,
};

/// Blends two parametric paths: `t ↦ (1 − α)·A(t) + α·B(t)`.
///
/// The returned path evaluates `path_a` and `path_b` every time it is called; nothing is cached.
/// `alpha` is conventionally in `[0, 1]`, but other values extrapolate and are accepted.
///
/// At `alpha == 0.0` the result is exactly `path_a`, and at `alpha == 1.0` it is exactly `path_b`
/// (for finite path values).
pub fn lerp_path<A, B>(path_a: A, path_b: B, alpha: f64) -> impl Fn(f64) -> Vector3<f64>
where
    A: Fn(f64) -> Vector3<f64>,
    B: Fn(f64) -> Vector3<f64>,
{
    move |t| {
        let a = path_a(t);
        let b = path_b(t);
        a.zip_map(&b, |a, b| lerp(a, b, alpha))
    }
}

/// Blends two matrices of the same shape elementwise: `(1 − α)·Q_a + α·Q_b`.
///
/// Symmetric inputs yield a symmetric result. Positive-definiteness is *not* preserved in general
/// (eg. when extrapolating, or when either input is indefinite), so callers must check it
/// themselves if they depend on it.
///
/// Like [`lerp_path`], the endpoints are reproduced exactly.
pub fn lerp_matrix<R, C, SA, SB>(
    mat_a: &Matrix<f64, R, C, SA>,
    mat_b: &Matrix<f64, R, C, SB>,
    alpha: f64,
) -> OMatrix<f64, R, C>
where
    R: Dim,
    C: Dim,
    SA: RawStorage<f64, R, C>,
    SB: RawStorage<f64, R, C>,
    DefaultAllocator: Allocator<f64, R, C>,
{
    mat_a.zip_map(mat_b, |a, b| lerp(a, b, alpha))
}

#[inline]
fn lerp(a: f64, b: f64, alpha: f64) -> f64 {
    (1.0 - alpha) * a + alpha * b
}

/// Hermite smooth step between `edge0` and `edge1`.
///
/// `t` is clamped to `[edge0, edge1]` and normalized to `[0, 1]`, then mapped through `3t² − 2t³`.
/// The result is 0.0 at and below `edge0`, 1.0 at and above `edge1`, and monotonic with a
/// continuous first derivative in between.
pub fn smooth_step(t: f64, edge0: f64, edge1: f64) -> f64 {
    let t = ((t - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Easing curves mapping animation progress in `[0, 1]` to an interpolation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rate {
    /// Progress is passed through unchanged.
    Linear,
    /// [`smooth_step`] on `[0, 1]`.
    #[default]
    Smooth,
    /// Goes from 0 to 1 in the first half and back to 0 in the second, easing both ways.
    ThereAndBack,
}

impl Rate {
    /// Applies this rate curve to `t`.
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Rate::Linear => t,
            Rate::Smooth => smooth_step(t, 0.0, 1.0),
            Rate::ThereAndBack => {
                let t = if t < 0.5 { 2.0 * t } else { 2.0 - 2.0 * t };
                smooth_step(t, 0.0, 1.0)
            }
        }
    }
}
