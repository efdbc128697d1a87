//! The same search in three dimensions: three mutually orthogonal modes.

use anyhow::Context;
use nalgebra::{Matrix3, Vector3};
use podanim_math::{
    cloud,
    covariance::{decompose, empirical_covariance, Modes},
};

use crate::{
    scene::{Canvas, Effect, Object, ObjectId},
    theme::Theme,
};

use super::{dots, header};

const SEED: u64 = 123;
const SAMPLES: usize = 150;

#[rustfmt::skip]
fn generating_covariance() -> Matrix3<f64> {
    Matrix3::new(
        3.0, 2.5, 0.5,
        2.5, 3.0, 0.5,
        0.5, 0.5, 1.0,
    )
}

/// Returns the arrow of every mode, scaled by the standard deviation along it.
fn mode_arrows(modes: &Modes, theme: &Theme) -> Vec<Object> {
    modes
        .iter()
        .zip(theme.palette.modes)
        .map(|(mode, color)| {
            let tip = mode.direction_xyz() * mode.energy().max(0.0).sqrt();
            Object::arrow(Vector3::zeros(), tip).color(color).stroke_width(4.0)
        })
        .collect()
}

fn axis_lines(theme: &Theme) -> Vec<Object> {
    [Vector3::x(), Vector3::y(), Vector3::z()]
        .into_iter()
        .map(|axis| Object::line(axis * -3.0, axis * 3.0).color(theme.palette.dim_text))
        .collect()
}

pub(super) fn build(canvas: &mut dyn Canvas, theme: &Theme) -> anyhow::Result<()> {
    let palette = &theme.palette;
    let title = header(canvas, theme, "From 2D to 3D", None);
    canvas.wait(1.0);

    let axes = axis_lines(theme)
        .into_iter()
        .map(|o| canvas.add(o))
        .collect::<Vec<_>>();
    canvas.transition(Effect::Create, &axes, 2.0);
    canvas.wait(1.0);

    let points = cloud::gaussian_cloud(
        &mut fastrand::Rng::with_seed(SEED),
        &generating_covariance(),
        SAMPLES,
    );
    let mut cloud = canvas.fade_in(dots(points.iter().copied(), theme), 2.5);
    cloud.push(canvas.write(
        theme
            .text(
                "3D point cloud",
                Vector3::new(-5.0, 1.5, 0.0),
                theme.fonts.caption,
            )
            .color(palette.point_cloud),
        0.5,
    ));
    canvas.wait(1.0);

    let cov = empirical_covariance(&points);
    let modes = decompose(&cov);
    log::debug!("sample covariance: {cov}");
    let principal = modes
        .principal()
        .context("covariance decomposition produced no modes")?;
    log::debug!(
        "mode 1 carries {:.1}% of the energy along {}",
        100.0 * modes.energy_ratio(0),
        principal.direction_xyz().transpose()
    );

    let computing = canvas.write(
        theme
            .text(
                "Computing the covariance matrix...",
                Vector3::new(4.5, 2.8, 0.0),
                theme.fonts.caption,
            )
            .color(palette.climber),
        1.0,
    );
    canvas.wait(1.5);
    canvas.fade_out(&[computing], 0.5);

    let arrows = mode_arrows(&modes, theme);
    let mut shown: Vec<ObjectId> = Vec::new();
    for (i, arrow) in arrows.into_iter().enumerate() {
        let color = palette.modes[i];
        let label = theme
            .text(
                format!("Mode {}: {:.1}% energy", i + 1, 100.0 * modes.energy_ratio(i)),
                Vector3::new(4.5, 2.8 - 0.6 * i as f64, 0.0),
                theme.fonts.caption,
            )
            .color(color);

        if i == 1 {
            // mode 2 is searched in the plane orthogonal to mode 1
            let (v2, v3) = (mode_direction(&modes, 1), mode_direction(&modes, 2));
            let corners = vec![
                (v2 + v3) * 2.5,
                (-v2 + v3) * 2.5,
                (-v2 - v3) * 2.5,
                (v2 - v3) * 2.5,
            ];
            let plane = canvas.add(
                Object::polyline(corners, true)
                    .color(palette.constraint_gradient.with_opacity(0.3))
                    .stroke_width(1.0),
            );
            canvas.transition(Effect::Create, &[plane], 1.5);
            canvas.wait(1.5);
            canvas.fade_out(&[plane], 0.5);
        }

        let ids = vec![canvas.add(arrow), canvas.add(label)];
        canvas.transition(Effect::Create, &ids, 1.0);
        canvas.wait(1.0);
        shown.extend(ids);
    }

    let closing = canvas.write(
        theme
            .text(
                "The three modes are mutually orthogonal",
                Vector3::new(0.0, -3.4, 0.0),
                theme.fonts.label,
            )
            .color(palette.climber),
        1.0,
    );
    canvas.wait(5.0);

    canvas.fade_out(&[axes, cloud, shown, vec![closing]].concat(), 1.5);
    canvas.fade_out(&title, 0.5);
    conclusion(canvas, theme);
    Ok(())
}

/// The numbered takeaways, one color per point.
const TAKEAWAYS: [&str; 4] = [
    "1. Modes are sorted by energy, largest first",
    "2. All modes are pairwise orthogonal",
    "3. The fewest dimensions capture the most information",
    "4. At heart, it is the eigen-decomposition of the covariance matrix",
];

/// Summary of POD's key properties.
fn conclusion(canvas: &mut dyn Canvas, theme: &Theme) {
    let palette = &theme.palette;
    let heading = canvas.write(
        theme
            .text("POD core points", Vector3::new(0.0, 3.2, 0.0), theme.fonts.title)
            .color(palette.climber),
        1.0,
    );
    canvas.wait(1.0);

    let colors = [
        palette.modes[2],
        palette.modes[0],
        palette.modes[1],
        palette.target_gradient,
    ];
    let mut points = Vec::new();
    for (i, (text, color)) in TAKEAWAYS.into_iter().zip(colors).enumerate() {
        points.push(canvas.add(
            theme
                .text(text, Vector3::new(0.0, 1.8 - 0.9 * i as f64, 0.0), theme.fonts.body)
                .color(color),
        ));
        canvas.transition(Effect::FadeIn, &points[i..], 1.0);
    }
    canvas.wait(2.0);

    let summary = canvas.write(
        theme
            .text(
                "POD = the optimal orthogonal coordinate system of the data",
                Vector3::new(0.0, -3.0, 0.0),
                theme.fonts.subtitle,
            )
            .color(palette.climber),
        1.0,
    );
    canvas.wait(3.0);

    points.extend([heading, summary]);
    canvas.fade_out(&points, 2.0);
    canvas.wait(1.0);
}

fn mode_direction(modes: &Modes, index: usize) -> Vector3<f64> {
    modes
        .get(index)
        .map(|mode| mode.direction_xyz())
        .unwrap_or_else(Vector3::zeros)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::scene::{Command, Recorder, Shape};

    use super::*;

    #[test]
    fn closes_with_takeaways() {
        let theme = Theme::default();
        let mut rec = Recorder::new(theme.frame_rate);
        build(&mut rec, &theme).unwrap();
        let recording = rec.finish().unwrap();

        let texts = recording
            .commands
            .iter()
            .filter_map(|c| match c {
                Command::Add {
                    object:
                        Object {
                            shape: Shape::Text { text, .. },
                            ..
                        },
                    ..
                } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();
        let start = texts.iter().position(|&t| t == "POD core points").unwrap();
        assert_eq!(texts[start + 1..start + 5], TAKEAWAYS);
        assert!(texts[start + 5].starts_with("POD = "));
    }

    #[test]
    fn arrows_are_orthogonal_and_ordered() {
        let theme = Theme::default();
        let modes = decompose(&generating_covariance());
        let tips = mode_arrows(&modes, &theme)
            .into_iter()
            .map(|arrow| match arrow.shape {
                Shape::Arrow { end, .. } => end,
                other => panic!("expected an arrow, got {other:?}"),
            })
            .collect::<Vec<_>>();
        assert_eq!(tips.len(), 3);
        assert!(tips.windows(2).all(|w| w[0].norm() >= w[1].norm()));
        for i in 0..3 {
            for j in i + 1..3 {
                assert_abs_diff_eq!(tips[i].dot(&tips[j]), 0.0, epsilon = 1e-9);
            }
        }
    }
}
