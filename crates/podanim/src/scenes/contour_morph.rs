//! From the mountain path back to POD.
//!
//! The wavy constraint path relaxes into the unit-norm circle while the level set of the energy
//! quadratic form relaxes into a circle as well. The Lagrange condition on the circle is exactly
//! the eigenvalue problem.

use std::f64::consts::{FRAC_PI_4, PI};

use nalgebra::{Matrix2, Vector3};
use podanim_math::{
    covariance::pod_covariance,
    geometry::{self, quadratic_level_curve},
    interp::{lerp_matrix, lerp_path, smooth_step, Rate},
};

use crate::{
    scene::{sweep, Canvas, Effect, Object, ObjectId},
    theme::Theme,
};

use super::header;

const CIRCLE_RADIUS: f64 = 2.5;
const CURVE_SAMPLES: usize = 160;

/// The energy form whose unit level set is an ellipse with semi-axes 3.5 and 1.5, tilted by 45°.
fn energy_form() -> Matrix2<f64> {
    pod_covariance(FRAC_PI_4, 1.0 / 3.5f64.powi(2), 1.0 / 1.5f64.powi(2))
}

/// The form whose unit level set is the circle of radius [`CIRCLE_RADIUS`].
fn circle_form() -> Matrix2<f64> {
    Matrix2::identity() / CIRCLE_RADIUS.powi(2)
}

/// Returns the unit level set of `q` as a closed polyline, or `None` if it isn't an ellipse.
fn level_set(q: Matrix2<f64>) -> Option<Vec<Vector3<f64>>> {
    let curve = quadratic_level_curve(q, 1.0)?;
    Some(geometry::sample_path(curve, 0.0, 2.0 * PI, CURVE_SAMPLES))
}

fn morphed_path(alpha: f64) -> Vec<Vector3<f64>> {
    let morph = lerp_path(
        geometry::wavy_ellipse_path(1.0, 0.3),
        geometry::circle_path(CIRCLE_RADIUS),
        alpha,
    );
    geometry::sample_path(morph, 0.0, 2.0 * PI, CURVE_SAMPLES)
}

pub(super) fn build(canvas: &mut dyn Canvas, theme: &Theme) -> anyhow::Result<()> {
    let palette = &theme.palette;
    let title = header(
        canvas,
        theme,
        "Scene 5 · Connecting to POD",
        Some("the constraint becomes ‖u‖ = 1"),
    );

    let path = canvas.add(
        Object::polyline(morphed_path(0.0), true)
            .color(palette.primary)
            .stroke_width(4.0),
    );
    let mut contour = None;
    if let Some(points) = level_set(energy_form()) {
        contour = Some(canvas.add(
            Object::polyline(points, true).color(palette.contour.with_opacity(0.6)),
        ));
    }
    let shown = [Some(path), contour].into_iter().flatten().collect::<Vec<_>>();
    canvas.transition(Effect::Create, &shown, 2.0);
    canvas.wait(1.0);

    let caption = canvas.write(
        theme
            .text(
                "Straighten the path into the unit circle",
                Vector3::new(0.0, -3.3, 0.0),
                theme.fonts.label,
            )
            .color(palette.text),
        1.0,
    );

    let (from, to) = (energy_form(), circle_form());
    let mut skipped = 0;
    sweep(canvas, 4.0, Rate::Linear, |canvas, t| {
        let alpha = smooth_step(t, 0.0, 1.0);
        canvas.update(
            path,
            Object::polyline(morphed_path(alpha), true)
                .color(palette.primary)
                .stroke_width(4.0),
        );
        if let Some(id) = contour {
            match level_set(lerp_matrix(&from, &to, alpha)) {
                Some(points) => canvas.update(
                    id,
                    Object::polyline(points, true).color(palette.contour.with_opacity(0.6)),
                ),
                None => skipped += 1,
            }
        }
    });
    if skipped > 0 {
        log::warn!("{skipped} frames had no elliptical level set");
    }
    canvas.wait(1.0);
    canvas.fade_out(&[caption], 0.5);

    let derivation = [
        r"\max_u \; u^{\top} C u \quad \text{s.t.} \quad u^{\top} u = 1",
        r"\mathcal{L}(u, \lambda) = u^{\top} C u - \lambda (u^{\top} u - 1)",
        r"\nabla_u \mathcal{L} = 2 C u - 2 \lambda u = 0",
        r"C u = \lambda u",
    ];
    let mut lines: Vec<ObjectId> = Vec::new();
    for (i, tex) in derivation.into_iter().enumerate() {
        let color = if i + 1 == derivation.len() {
            palette.highlight
        } else {
            palette.text
        };
        lines.push(canvas.write(
            Object::formula(tex, Vector3::new(4.0, 1.5 - 0.9 * i as f64, 0.0), theme.fonts.label)
                .color(color),
            1.2,
        ));
        canvas.wait(1.0);
    }
    canvas.wait(2.0);

    canvas.fade_out(&[shown, lines].concat(), 1.0);
    canvas.fade_out(&title, 0.5);
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn morph_ends_on_circle() {
        for p in morphed_path(1.0) {
            assert_relative_eq!(p.norm(), CIRCLE_RADIUS, epsilon = 1e-12);
        }
        let circle = level_set(circle_form()).unwrap();
        for p in circle {
            assert_relative_eq!(p.norm(), CIRCLE_RADIUS, epsilon = 1e-9);
        }
    }

    #[test]
    fn blended_forms_keep_an_ellipse() {
        for alpha in podanim_math::iter::linspace(0.0, 1.0, 11) {
            assert!(level_set(lerp_matrix(&energy_form(), &circle_form(), alpha)).is_some());
        }
    }

    #[test]
    fn energy_form_semi_major_axis() {
        let points = level_set(energy_form()).unwrap();
        let longest = points
            .iter()
            .map(|p| p.norm())
            .fold(0.0, f64::max);
        assert_relative_eq!(longest, 3.5, epsilon = 1e-3);
    }
}
