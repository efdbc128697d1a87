//! Step-by-step singular value decomposition of a 3×2 matrix.
//!
//! `A = U·Σ·Vᵀ` is applied to the unit circle one factor at a time: `Vᵀ` rotates (or reflects) it,
//! `Σ` stretches it into an axis-aligned ellipse, and `U` places that ellipse into 3D space. The
//! final stage must match applying `A` directly.

use std::f64::consts::PI;

use nalgebra::{Matrix2, Matrix3x2, Vector2, Vector3};

/// The thin SVD of a 3×2 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvdStages {
    a: Matrix3x2<f64>,
    u: Matrix3x2<f64>,
    singular_values: Vector2<f64>,
    v_t: Matrix2<f64>,
}

/// Points of the unit circle after each factor of the decomposition has been applied.
///
/// All vectors hold the same number of points, in the same order. 2D stages lie in the `z = 0`
/// plane.
#[derive(Debug, Clone, PartialEq)]
pub struct StagePoints {
    /// The unit circle.
    pub input: Vec<Vector3<f64>>,
    /// `Vᵀ·x`
    pub rotated: Vec<Vector3<f64>>,
    /// `Σ·Vᵀ·x`
    pub scaled: Vec<Vector3<f64>>,
    /// `U·Σ·Vᵀ·x`
    pub output: Vec<Vector3<f64>>,
    /// `A·x`
    pub direct: Vec<Vector3<f64>>,
}

impl SvdStages {
    /// Decomposes `a`.
    ///
    /// Returns `None` if the decomposition fails to converge or produces non-finite factors.
    pub fn new(a: Matrix3x2<f64>) -> Option<Self> {
        let svd = a.svd(true, true);
        let this = Self {
            a,
            u: svd.u?,
            singular_values: svd.singular_values,
            v_t: svd.v_t?,
        };
        let finite = this.u.iter().all(|v| v.is_finite())
            && this.v_t.iter().all(|v| v.is_finite())
            && this.singular_values.iter().all(|v| v.is_finite());
        if !finite {
            return None;
        }
        log::trace!("singular values of {a}: {}", this.singular_values);
        Some(this)
    }

    /// The matrix that was decomposed.
    #[inline]
    pub fn matrix(&self) -> &Matrix3x2<f64> {
        &self.a
    }

    #[inline]
    pub fn u(&self) -> &Matrix3x2<f64> {
        &self.u
    }

    #[inline]
    pub fn v_t(&self) -> &Matrix2<f64> {
        &self.v_t
    }

    #[inline]
    pub fn singular_values(&self) -> &Vector2<f64> {
        &self.singular_values
    }

    /// Returns `Σ` as a diagonal matrix.
    pub fn sigma(&self) -> Matrix2<f64> {
        Matrix2::from_diagonal(&self.singular_values)
    }

    /// Multiplies the factors back together.
    pub fn reconstruct(&self) -> Matrix3x2<f64> {
        self.u * self.sigma() * self.v_t
    }

    /// Returns whether `U·Σ·Vᵀ` matches the input matrix to within `tolerance` in every entry.
    pub fn reconstructs(&self, tolerance: f64) -> bool {
        (self.reconstruct() - self.a).amax() <= tolerance
    }

    /// Samples the unit circle at `samples` points and pushes it through every stage.
    pub fn stages(&self, samples: usize) -> StagePoints {
        let circle = (0..samples)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / samples as f64;
                Vector2::new(t.cos(), t.sin())
            })
            .collect::<Vec<_>>();

        let rotated = circle.iter().map(|x| self.v_t * x).collect::<Vec<_>>();
        let scaled = rotated
            .iter()
            .map(|x| self.singular_values.component_mul(x))
            .collect::<Vec<_>>();

        StagePoints {
            input: circle.iter().map(|p| p.push(0.0)).collect(),
            rotated: rotated.iter().map(|p| p.push(0.0)).collect(),
            output: scaled.iter().map(|p| self.u * p).collect(),
            scaled: scaled.iter().map(|p| p.push(0.0)).collect(),
            direct: circle.iter().map(|p| self.a * p).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn example() -> Matrix3x2<f64> {
        #[rustfmt::skip]
        let a = Matrix3x2::new(
            1.0, 2.0,
            3.0, 4.0,
            5.0, 6.0,
        );
        a
    }

    #[test]
    fn factors_reconstruct_input() {
        let svd = SvdStages::new(example()).unwrap();
        assert!(svd.reconstructs(1e-9));
        assert_relative_eq!(svd.reconstruct(), example(), epsilon = 1e-9);
    }

    #[test]
    fn factors_are_orthonormal() {
        let svd = SvdStages::new(example()).unwrap();
        assert_relative_eq!(
            svd.u().transpose() * svd.u(),
            Matrix2::identity(),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            svd.v_t() * svd.v_t().transpose(),
            Matrix2::identity(),
            epsilon = 1e-9
        );
        assert!(svd.singular_values().iter().all(|&s| s >= 0.0));
    }

    #[test]
    fn singular_values_match_gram_matrix() {
        // σ² are the eigenvalues of AᵀA
        let svd = SvdStages::new(example()).unwrap();
        let gram = example().transpose() * example();
        let s = svd.singular_values();
        assert_relative_eq!(s.norm_squared(), gram.trace(), epsilon = 1e-9);
        assert_relative_eq!(
            (s[0] * s[1]).powi(2),
            gram.determinant(),
            epsilon = 1e-9,
            max_relative = 1e-9
        );
    }

    #[test]
    fn staged_circle_matches_direct_map() {
        let svd = SvdStages::new(example()).unwrap();
        let stages = svd.stages(64);
        assert_eq!(stages.input.len(), 64);
        for (out, direct) in stages.output.iter().zip(&stages.direct) {
            assert_abs_diff_eq!(*out, *direct, epsilon = 1e-9);
        }
        // Vᵀ is orthogonal, so the rotated circle is still a unit circle
        for p in &stages.rotated {
            assert_relative_eq!(p.norm(), 1.0, epsilon = 1e-9);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn rank_deficient_input() {
        #[rustfmt::skip]
        let a = Matrix3x2::new(
            1.0, 2.0,
            2.0, 4.0,
            3.0, 6.0,
        );
        let svd = SvdStages::new(a).unwrap();
        assert!(svd.reconstructs(1e-9));
        let smallest = svd.singular_values().min();
        assert_abs_diff_eq!(smallest, 0.0, epsilon = 1e-9);
    }
}
