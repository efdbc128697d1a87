//! The unit circle pushed through the factors of `A = U·Σ·Vᵀ`, one at a time.

use anyhow::{bail, Context};
use nalgebra::{Matrix3x2, Vector3};
use podanim_math::svd::SvdStages;

use crate::{
    scene::{Canvas, Effect, Object, ObjectId},
    theme::Theme,
};

use super::header;

const CIRCLE_SAMPLES: usize = 120;
/// Largest radius a stage may occupy within its panel.
const PANEL_RADIUS: f64 = 1.4;
const PANEL_SPACING: f64 = 3.4;
const PANEL_Y: f64 = 0.2;

#[rustfmt::skip]
fn demo_matrix() -> Matrix3x2<f64> {
    Matrix3x2::new(
        1.0, 2.0,
        3.0, 4.0,
        5.0, 6.0,
    )
}

/// Center of the `index`th of the four panels, left to right.
fn panel_center(index: usize) -> Vector3<f64> {
    let x = (index as f64 - 1.5) * PANEL_SPACING;
    Vector3::new(x, PANEL_Y, 0.0)
}

/// Scales `points` to fit in a panel and moves them to its center.
///
/// `extent` is the largest norm the stage can reach; stages sharing an extent stay comparable.
fn place(points: &[Vector3<f64>], extent: f64, index: usize) -> Vec<Vector3<f64>> {
    let scale = PANEL_RADIUS / extent.max(f64::EPSILON);
    let center = panel_center(index);
    points.iter().map(|p| center + p * scale).collect()
}

pub(super) fn build(canvas: &mut dyn Canvas, theme: &Theme) -> anyhow::Result<()> {
    let palette = &theme.palette;
    let title = header(
        canvas,
        theme,
        "SVD, one factor at a time",
        Some("A = U Σ Vᵀ applied to the unit circle"),
    );

    let svd = SvdStages::new(demo_matrix()).context("SVD of the demo matrix did not converge")?;
    if !svd.reconstructs(1e-9) {
        bail!(
            "U·Σ·Vᵀ does not reproduce the input matrix:\n{}",
            svd.reconstruct()
        );
    }
    let sigma = svd.singular_values();
    log::debug!("singular values: {:.4}, {:.4}", sigma[0], sigma[1]);

    let stages = svd.stages(CIRCLE_SAMPLES);
    let stretched = sigma.amax();
    let panels = [
        (&stages.input, 1.0, "x", palette.point_cloud),
        (&stages.rotated, 1.0, r"V^{\top} x", palette.modes[1]),
        (&stages.scaled, stretched, r"\Sigma V^{\top} x", palette.modes[2]),
        (&stages.output, stretched, r"U \Sigma V^{\top} x", palette.modes[0]),
    ];

    let mut shown: Vec<ObjectId> = Vec::new();
    for (index, (points, extent, tex, color)) in panels.into_iter().enumerate() {
        let curve = canvas.add(
            Object::polyline(place(points, extent, index), true)
                .color(color)
                .stroke_width(3.0),
        );
        let label = canvas.add(
            Object::formula(
                tex,
                panel_center(index) - Vector3::new(0.0, PANEL_RADIUS + 0.6, 0.0),
                theme.fonts.label,
            )
            .color(palette.text),
        );
        canvas.transition(Effect::Create, &[curve, label], 1.2);
        canvas.wait(0.8);
        shown.extend([curve, label]);
    }

    // `A·x` traced over the last stage
    let direct = canvas.add(
        Object::polyline(place(&stages.direct, stretched, 3), true)
            .color(palette.highlight)
            .stroke_width(1.0),
    );
    canvas.transition(Effect::Create, &[direct], 1.5);
    shown.push(direct);

    let error = (svd.reconstruct() - svd.matrix()).amax();
    let check = canvas.write(
        theme
            .text(
                format!("max |UΣVᵀ − A| = {error:.1e}"),
                Vector3::new(0.0, -3.2, 0.0),
                theme.fonts.label,
            )
            .color(palette.highlight),
        1.0,
    );
    shown.push(check);
    canvas.wait(3.0);

    canvas.fade_out(&shown, 1.0);
    canvas.fade_out(&title, 0.5);
    Ok(())
}
