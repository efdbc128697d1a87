//! Scalar fields over the plane and their gradients.
//!
//! Gradients are returned as `[∂f/∂x, ∂f/∂y, 0]` so they can be drawn as arrows in the `z = 0`
//! plane, and always point toward increasing `f`.

use nalgebra::{Vector2, Vector3};

/// Default step size of [`numerical_gradient`].
pub const DEFAULT_STEP: f64 = 0.01;

/// A scalar field `f(x, y)`.
///
/// Implementors with a closed-form gradient should override [`ScalarField::gradient`]; the default
/// implementation falls back to [`numerical_gradient`] with [`DEFAULT_STEP`].
///
/// Any `Fn(f64, f64) -> f64` closure is a scalar field.
pub trait ScalarField {
    /// Evaluates the field at `(x, y)`.
    fn value(&self, x: f64, y: f64) -> f64;

    /// Evaluates the gradient of the field at `(x, y)`.
    fn gradient(&self, x: f64, y: f64) -> Vector3<f64> {
        numerical_gradient(|x, y| self.value(x, y), x, y, DEFAULT_STEP)
    }
}

impl<F: Fn(f64, f64) -> f64> ScalarField for F {
    fn value(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Approximates the gradient of an arbitrary scalar function with central differences.
///
/// Each partial derivative is `(f(x+h) − f(x−h)) / 2h`, with an error of `O(h²)` for smooth `f`.
///
/// `h` must be non-zero; this is not checked.
pub fn numerical_gradient(f: impl Fn(f64, f64) -> f64, x: f64, y: f64, h: f64) -> Vector3<f64> {
    let grad_x = (f(x + h, y) - f(x - h, y)) / (2.0 * h);
    let grad_y = (f(x, y + h) - f(x, y - h)) / (2.0 * h);
    Vector3::new(grad_x, grad_y, 0.0)
}

/// An axis-aligned Gaussian peak `A · exp(−(x−cx)²/2σx² − (y−cy)²/2σy²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianPeak {
    amplitude: f64,
    center: Vector2<f64>,
    sigma: Vector2<f64>,
}

impl GaussianPeak {
    /// Creates a Gaussian peak.
    ///
    /// # Panics
    ///
    /// Both standard deviations in `sigma` must be positive.
    pub fn new(amplitude: f64, center: [f64; 2], sigma: [f64; 2]) -> Self {
        assert!(
            sigma[0] > 0.0 && sigma[1] > 0.0,
            "standard deviations must be positive"
        );
        Self {
            amplitude,
            center: center.into(),
            sigma: sigma.into(),
        }
    }

    #[inline]
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    #[inline]
    pub fn center(&self) -> Vector2<f64> {
        self.center
    }

    #[inline]
    pub fn sigma(&self) -> Vector2<f64> {
        self.sigma
    }

    /// Returns the exponent `(x−cx)²/2σx² + (y−cy)²/2σy²` (without the sign).
    pub(crate) fn exponent(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.center.x;
        let dy = y - self.center.y;
        dx * dx / (2.0 * self.sigma.x * self.sigma.x)
            + dy * dy / (2.0 * self.sigma.y * self.sigma.y)
    }
}

/// The main peak of the Lagrange landscape: amplitude 0.8 at the origin, `σ = (3, 2)`.
impl Default for GaussianPeak {
    fn default() -> Self {
        Self::new(0.8, [0.0, 0.0], [3.0, 2.0])
    }
}

impl ScalarField for GaussianPeak {
    fn value(&self, x: f64, y: f64) -> f64 {
        self.amplitude * (-self.exponent(x, y)).exp()
    }

    fn gradient(&self, x: f64, y: f64) -> Vector3<f64> {
        let f = self.value(x, y);
        let dx = x - self.center.x;
        let dy = y - self.center.y;
        Vector3::new(
            -f * dx / (self.sigma.x * self.sigma.x),
            -f * dy / (self.sigma.y * self.sigma.y),
            0.0,
        )
    }
}

/// A sinusoidal ripple `a · sin(kx·x) · cos(ky·y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub amplitude: f64,
    pub kx: f64,
    pub ky: f64,
}

impl Default for Ripple {
    fn default() -> Self {
        Self {
            amplitude: 0.4,
            kx: 0.8,
            ky: 0.6,
        }
    }
}

impl ScalarField for Ripple {
    fn value(&self, x: f64, y: f64) -> f64 {
        self.amplitude * (self.kx * x).sin() * (self.ky * y).cos()
    }

    fn gradient(&self, x: f64, y: f64) -> Vector3<f64> {
        let (sin_x, cos_x) = (self.kx * x).sin_cos();
        let (sin_y, cos_y) = (self.ky * y).sin_cos();
        Vector3::new(
            self.amplitude * self.kx * cos_x * cos_y,
            -self.amplitude * self.ky * sin_x * sin_y,
            0.0,
        )
    }
}

/// The terrain climbed in the Lagrange multiplier scenes: a [`GaussianPeak`] plus a [`Ripple`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landscape {
    pub peak: GaussianPeak,
    pub ripple: Ripple,
}

impl Landscape {
    /// Returns the point `[u, v, f(u, v)]` on the landscape surface.
    pub fn surface_point(&self, u: f64, v: f64) -> Vector3<f64> {
        Vector3::new(u, v, self.value(u, v))
    }
}

impl ScalarField for Landscape {
    fn value(&self, x: f64, y: f64) -> f64 {
        self.peak.value(x, y) + self.ripple.value(x, y)
    }

    fn gradient(&self, x: f64, y: f64) -> Vector3<f64> {
        self.peak.gradient(x, y) + self.ripple.gradient(x, y)
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use crate::iter::linspace;

    use super::*;

    #[test]
    fn numerical_gradient_of_polynomial() {
        // f = x²y + 3y, ∇f = [2xy, x² + 3]
        let f = |x: f64, y: f64| x * x * y + 3.0 * y;
        let grad = numerical_gradient(f, 1.5, -2.0, DEFAULT_STEP);
        assert_relative_eq!(grad, Vector3::new(-6.0, 5.25, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn closures_use_numerical_gradient() {
        let f = |x: f64, y: f64| (x * y).sin();
        let grad = f.gradient(0.3, 0.5);
        let exact = Vector3::new(0.5 * 0.15f64.cos(), 0.3 * 0.15f64.cos(), 0.0);
        assert_abs_diff_eq!(grad, exact, epsilon = 1e-4);
    }

    #[test]
    fn peak_gradient_vanishes_at_center() {
        let peak = GaussianPeak::new(2.0, [1.0, -1.0], [1.0, 0.5]);
        assert_eq!(peak.value(1.0, -1.0), 2.0);
        assert_abs_diff_eq!(peak.gradient(1.0, -1.0), Vector3::zeros(), epsilon = 1e-15);
    }

    #[test]
    fn peak_gradient_points_uphill() {
        let peak = GaussianPeak::default();
        for (x, y) in [(1.0, 0.5), (-2.0, 1.0), (0.3, -2.5)] {
            let grad = peak.gradient(x, y);
            let step = 1e-3 * grad.xy();
            assert!(peak.value(x + step.x, y + step.y) > peak.value(x, y));
        }
    }

    #[test]
    fn analytic_matches_numerical() {
        let landscape = Landscape::default();
        let numerical = |x, y| numerical_gradient(|x, y| landscape.value(x, y), x, y, DEFAULT_STEP);
        for x in linspace(-4.0, 4.0, 9) {
            for y in linspace(-3.0, 3.0, 7) {
                assert_abs_diff_eq!(
                    landscape.gradient(x, y),
                    numerical(x, y),
                    epsilon = 1e-4
                );
            }
        }
    }

    #[test]
    fn ripple_gradient() {
        let ripple = Ripple::default();
        // at the origin only the x derivative survives: a·kx
        assert_relative_eq!(
            ripple.gradient(0.0, 0.0),
            Vector3::new(0.32, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn surface_point_is_on_field() {
        let landscape = Landscape::default();
        let p = landscape.surface_point(1.0, 2.0);
        assert_eq!(p.xy(), Vector2::new(1.0, 2.0));
        assert_eq!(p.z, landscape.value(1.0, 2.0));
    }

    #[test]
    #[should_panic(expected = "standard deviations")]
    fn peak_rejects_zero_sigma() {
        GaussianPeak::new(1.0, [0.0, 0.0], [0.0, 1.0]);
    }
}
