//! Constraint paths, surface projection and level sets.
//!
//! Paths are plain closures `t ↦ [x, y, z]`. They hold no state and can be evaluated at any
//! parameter any number of times.

use std::f64::consts::PI;

use nalgebra::{Matrix2, Vector2, Vector3};

use crate::{
    covariance::decompose,
    gradient::{GaussianPeak, ScalarField},
    iter,
};

/// Vectors shorter than this are returned unchanged by [`normalize`].
pub const NORMALIZE_THRESHOLD: f64 = 1e-8;

/// Scales `v` to unit length.
///
/// If the norm of `v` is below [`NORMALIZE_THRESHOLD`], `v` is returned unchanged instead of
/// dividing by (almost) zero.
pub fn normalize(v: Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm < NORMALIZE_THRESHOLD {
        v
    } else {
        v / norm
    }
}

/// Returns the normal of a 2D path with the given tangent, by rotating it 90° counterclockwise.
///
/// The Z component of `tangent` is ignored.
pub fn path_normal_2d(tangent: Vector3<f64>) -> Vector3<f64> {
    Vector3::new(-tangent.y, tangent.x, 0.0)
}

/// Approximates the tangent `dP/dt` of `path` at `t` with a central difference of step `h`.
pub fn path_tangent(path: impl Fn(f64) -> Vector3<f64>, t: f64, h: f64) -> Vector3<f64> {
    (path(t + h) - path(t - h)) / (2.0 * h)
}

/// The wavy ellipse used as the Lagrange constraint path.
///
/// `[3s·cos t + w·sin 3t, 1.8s·sin t + w·cos 2t, 0]` with `s = scale` and `w = wave_amplitude`. The
/// path is closed with period `2π`.
pub fn wavy_ellipse_path(scale: f64, wave_amplitude: f64) -> impl Fn(f64) -> Vector3<f64> + Clone {
    move |t| {
        Vector3::new(
            scale * 3.0 * t.cos() + wave_amplitude * (3.0 * t).sin(),
            scale * 1.8 * t.sin() + wave_amplitude * (2.0 * t).cos(),
            0.0,
        )
    }
}

/// A circle of the given radius around the origin, with period `2π`.
pub fn circle_path(radius: f64) -> impl Fn(f64) -> Vector3<f64> + Clone {
    move |t| Vector3::new(radius * t.cos(), radius * t.sin(), 0.0)
}

/// Lifts a path in the XY plane onto the surface `z = f(x, y)`.
pub fn project_to_surface<P, F>(path: P, surface: F) -> impl Fn(f64) -> Vector3<f64>
where
    P: Fn(f64) -> Vector3<f64>,
    F: ScalarField,
{
    move |t| {
        let p = path(t);
        Vector3::new(p.x, p.y, surface.value(p.x, p.y))
    }
}

/// Samples `path` at `n` evenly spaced parameters in `[t0, t1]` (inclusive).
pub fn sample_path(
    path: impl Fn(f64) -> Vector3<f64>,
    t0: f64,
    t1: f64,
    n: usize,
) -> Vec<Vector3<f64>> {
    iter::linspace(t0, t1, n).map(path).collect()
}

/// Returns the implicit function `f(x, y) − level` whose zero set is a contour of `peak`.
pub fn gaussian_level_set(peak: GaussianPeak, level: f64) -> impl Fn(f64, f64) -> f64 {
    move |x, y| peak.value(x, y) - level
}

/// Returns the contour of `peak` at height `level` as a closed path with period `2π`.
///
/// The contour is an axis-aligned ellipse around the peak's center. There is no contour when
/// `level` is not strictly between 0 and the peak's amplitude; `None` is returned then.
pub fn gaussian_level_curve(
    peak: GaussianPeak,
    level: f64,
) -> Option<impl Fn(f64) -> Vector3<f64>> {
    if !(level > 0.0 && level < peak.amplitude()) {
        return None;
    }
    // A·exp(−r) = level  ⇔  r = ln(A / level), and r = x²/2σx² + y²/2σy²
    let r = (peak.amplitude() / level).ln();
    let radii = peak.sigma() * (2.0 * r).sqrt();
    let center = peak.center();
    Some(move |t: f64| {
        Vector3::new(
            center.x + radii.x * t.cos(),
            center.y + radii.y * t.sin(),
            0.0,
        )
    })
}

/// Returns the implicit function `[x y]·Q·[x y]ᵀ − level` whose zero set is a level set of the
/// quadratic form `Q`.
pub fn quadratic_form_level_set(matrix: Matrix2<f64>, level: f64) -> impl Fn(f64, f64) -> f64 {
    move |x, y| {
        let v = Vector2::new(x, y);
        v.dot(&(matrix * v)) - level
    }
}

/// Returns the level set `xᵀQx = level` of a symmetric matrix as a closed path with period `2π`.
///
/// The level set is an ellipse only if `Q` is positive-definite and `level` is positive. Otherwise
/// it is empty, a hyperbola or a pair of lines, and `None` is returned.
pub fn quadratic_level_curve(
    matrix: Matrix2<f64>,
    level: f64,
) -> Option<impl Fn(f64) -> Vector3<f64>> {
    if level <= 0.0 {
        return None;
    }
    let modes = decompose(&matrix);
    let (major, minor) = (modes.get(1)?, modes.get(0)?);
    if minor.energy() <= 0.0 || major.energy() <= 0.0 {
        return None;
    }
    // The smallest eigenvalue has the longest semi-axis.
    let a = major.direction_xyz() * (level / major.energy()).sqrt();
    let b = minor.direction_xyz() * (level / minor.energy()).sqrt();
    Some(move |t: f64| a * t.cos() + b * t.sin())
}

/// Returns `n` evenly spaced contour heights from `z_min` to `z_max` (inclusive).
pub fn contour_levels(z_min: f64, z_max: f64, n: usize) -> Vec<f64> {
    iter::linspace(z_min, z_max, n).collect()
}

/// Returns the parameter in `[0, 2π)` at which `field` is largest along the closed `path`.
///
/// The path is sampled at `samples` points; the result is accurate to `2π / samples`.
///
/// # Panics
///
/// Panics if `samples` is 0.
pub fn max_along_path(
    path: impl Fn(f64) -> Vector3<f64>,
    field: &impl ScalarField,
    samples: usize,
) -> f64 {
    assert!(samples > 0, "path search needs at least one sample");
    let mut best = (0.0, f64::NEG_INFINITY);
    for i in 0..samples {
        let t = 2.0 * PI * i as f64 / samples as f64;
        let p = path(t);
        let value = field.value(p.x, p.y);
        if value > best.1 {
            best = (t, value);
        }
    }
    log::trace!("path maximum {} at t = {}", best.1, best.0);
    best.0
}
