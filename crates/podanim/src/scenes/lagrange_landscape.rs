//! Climbing a landscape while tied to a constraint path.
//!
//! The climber stops where the path reaches its highest point, and at that point the gradient of
//! the landscape is parallel to the normal of the path: `∇f = λ∇g`.

use std::f64::consts::PI;

use nalgebra::Vector3;
use podanim_math::{
    geometry::{self, normalize, path_normal_2d, path_tangent},
    gradient::{Landscape, ScalarField},
    interp::Rate,
    iter::linspace,
};

use crate::{
    scene::{sweep, Canvas, Effect, Object},
    theme::Theme,
};

use super::header;

/// Number of samples along the constraint path when searching for its summit.
const SEARCH_SAMPLES: usize = 720;
const PATH_SAMPLES: usize = 200;
/// Length of a unit gradient arrow.
const ARROW_SCALE: f64 = 1.2;

/// Returns the `∇f` and `∇g` arrows at parameter `t` of the constraint path.
fn gradient_arrows(
    landscape: &Landscape,
    path: impl Fn(f64) -> Vector3<f64>,
    t: f64,
    theme: &Theme,
) -> [Object; 2] {
    let p = path(t);
    let grad_f = normalize(landscape.gradient(p.x, p.y));
    let grad_g = normalize(path_normal_2d(path_tangent(&path, t, 1e-4)));
    [
        Object::arrow(p, p + grad_f * ARROW_SCALE)
            .color(theme.palette.target_gradient)
            .stroke_width(5.0),
        Object::arrow(p, p + grad_g * ARROW_SCALE)
            .color(theme.palette.constraint_gradient)
            .stroke_width(5.0),
    ]
}

/// Lines of constant `v` and constant `u` across the landscape surface.
fn wireframe(landscape: &Landscape, theme: &Theme) -> Vec<Object> {
    let color = theme.palette.grid;
    let along_u = linspace(-3.0, 3.0, 7).map(|v| {
        linspace(-4.0, 4.0, 40)
            .map(|u| landscape.surface_point(u, v))
            .collect::<Vec<_>>()
    });
    let along_v = linspace(-4.0, 4.0, 9).map(|u| {
        linspace(-3.0, 3.0, 30)
            .map(|v| landscape.surface_point(u, v))
            .collect::<Vec<_>>()
    });
    along_u
        .chain(along_v)
        .map(|points| Object::polyline(points, false).color(color).stroke_width(1.0))
        .collect()
}

pub(super) fn build(canvas: &mut dyn Canvas, theme: &Theme) -> anyhow::Result<()> {
    let palette = &theme.palette;
    let title = header(
        canvas,
        theme,
        "Scene 2 · Mountain path",
        Some("maximize f(x, y) while staying on g(x, y) = 0"),
    );

    let landscape = Landscape::default();
    let surface = canvas.fade_in(wireframe(&landscape, theme), 1.5);

    let contours = geometry::contour_levels(0.1, 0.7, 7)
        .into_iter()
        .filter_map(|level| geometry::gaussian_level_curve(landscape.peak, level))
        .map(|curve| {
            Object::polyline(geometry::sample_path(curve, 0.0, 2.0 * PI, 120), true)
                .color(palette.contour.with_opacity(0.3))
                .stroke_width(1.0)
        })
        .collect::<Vec<_>>();
    let contours = canvas.fade_in(contours, 1.0);
    canvas.wait(1.0);

    let path = geometry::wavy_ellipse_path(1.0, 0.3);
    let lifted = geometry::project_to_surface(path.clone(), landscape);
    let constraint = vec![
        canvas.add(
            Object::polyline(geometry::sample_path(&path, 0.0, 2.0 * PI, PATH_SAMPLES), true)
                .color(palette.primary.with_opacity(0.5))
                .stroke_width(2.0),
        ),
        canvas.add(
            Object::polyline(geometry::sample_path(&lifted, 0.0, 2.0 * PI, PATH_SAMPLES), true)
                .color(palette.primary)
                .stroke_width(4.0),
        ),
    ];
    canvas.transition(Effect::Create, &constraint, 2.0);

    let summit = geometry::max_along_path(&path, &landscape, SEARCH_SAMPLES);
    let summit_point = lifted(summit);
    log::debug!(
        "highest point on the path at t = {summit:.3}: f = {:.3}",
        summit_point.z
    );

    let climber = canvas.add(Object::dot(lifted(0.0), 0.12).color(palette.climber));
    let arrows = gradient_arrows(&landscape, &path, 0.0, theme)
        .into_iter()
        .map(|o| canvas.add(o))
        .collect::<Vec<_>>();
    let legend = vec![
        canvas.add(
            Object::formula(r"\nabla f", Vector3::new(5.2, 2.6, 0.0), theme.fonts.body)
                .color(palette.target_gradient),
        ),
        canvas.add(
            Object::formula(r"\nabla g", Vector3::new(5.2, 2.0, 0.0), theme.fonts.body)
                .color(palette.constraint_gradient),
        ),
    ];
    canvas.transition(
        Effect::FadeIn,
        &[vec![climber], arrows.clone(), legend.clone()].concat(),
        1.0,
    );

    // Walk along the path up to the summit.
    sweep(canvas, 8.0, Rate::Smooth, |canvas, s| {
        let t = summit * s;
        canvas.update(climber, Object::dot(lifted(t), 0.12).color(palette.climber));
        for (id, arrow) in arrows.iter().zip(gradient_arrows(&landscape, &path, t, theme)) {
            canvas.update(*id, arrow);
        }
    });
    canvas.wait(1.5);

    let p = path(summit);
    let grad_f = normalize(landscape.gradient(p.x, p.y));
    let grad_g = normalize(path_normal_2d(path_tangent(&path, summit, 1e-4)));
    log::debug!(
        "at the summit, ∇f and ∇g are {:.2}° apart",
        grad_f.angle(&grad_g).to_degrees()
    );

    let insight = canvas.write(
        Object::formula(
            r"\nabla f = \lambda \nabla g",
            Vector3::new(0.0, -3.3, 0.0),
            theme.fonts.title,
        )
        .color(palette.highlight),
        1.5,
    );
    canvas.wait(3.0);

    canvas.fade_out(
        &[
            surface,
            contours,
            constraint,
            vec![climber],
            arrows,
            legend,
            vec![insight],
        ]
        .concat(),
        1.5,
    );
    canvas.fade_out(&title, 0.5);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::scene::Shape;

    use super::*;

    fn arrow_direction(object: &Object) -> Vector3<f64> {
        match object.shape {
            Shape::Arrow { start, end } => (end - start).normalize(),
            ref other => panic!("expected an arrow, got {other:?}"),
        }
    }

    #[test]
    fn gradients_align_at_the_summit() {
        let theme = Theme::default();
        let landscape = Landscape::default();
        let path = geometry::wavy_ellipse_path(1.0, 0.3);
        let summit = geometry::max_along_path(&path, &landscape, SEARCH_SAMPLES);

        let [grad_f, grad_g] = gradient_arrows(&landscape, &path, summit, &theme);
        let (f, g) = (arrow_direction(&grad_f), arrow_direction(&grad_g));
        // parallel or anti-parallel
        assert!(f.cross(&g).norm() < 0.05, "{f} vs {g}");
    }

    #[test]
    fn wireframe_lies_on_surface() {
        let theme = Theme::default();
        let landscape = Landscape::default();
        for line in wireframe(&landscape, &theme) {
            let Shape::Polyline { points, .. } = line.shape else {
                panic!("wireframe must consist of polylines");
            };
            for p in points {
                assert_eq!(p.z, landscape.value(p.x, p.y));
            }
        }
    }
}
