//! Searching a correlated 2D point cloud for the direction of maximum projected energy.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Matrix2, Vector2, Vector3};
use podanim_math::{
    cloud,
    covariance::{decompose, empirical_covariance},
    energy,
    interp::Rate,
};

use crate::{
    scene::{sweep, Canvas, Effect, Object, ObjectId, Shape},
    theme::{Color, Theme},
};

use super::{dots, header};

const SEED: u64 = 42;
const SAMPLES: usize = 100;

/// Scene units per data unit.
const AXES_SCALE: f64 = 0.8;
const AXES_SHIFT: f64 = -0.5;

fn to_scene(p: Vector2<f64>) -> Vector3<f64> {
    Vector3::new(p.x * AXES_SCALE, p.y * AXES_SCALE + AXES_SHIFT, 0.0)
}

/// The line through the origin along `angle`, the arrow on it, and its label.
fn direction_marker(theme: &Theme, angle: f64, label: &str, color: Color) -> [Object; 3] {
    let u = energy::direction(angle);
    [
        Object::line(to_scene(u * -3.5), to_scene(u * 3.5))
            .color(color.with_opacity(0.5))
            .stroke_width(3.0),
        Object::arrow(to_scene(Vector2::zeros()), to_scene(u * 2.5))
            .color(color)
            .stroke_width(5.0),
        Object::formula(label, to_scene(u * 3.0), theme.fonts.subtitle).color(color),
    ]
}

/// Dashed lines from each point to its projection onto `angle`.
fn projections(
    points: &[Vector2<f64>],
    angle: f64,
    color: Color,
) -> impl Iterator<Item = Object> + '_ {
    let u = energy::direction(angle);
    points.iter().map(move |p| {
        Object::line(to_scene(*p), to_scene(u * p.dot(&u)))
            .color(color.with_opacity(0.4))
            .stroke_width(1.5)
    })
}

fn energy_value(theme: &Theme, position: Vector3<f64>, energy: f64) -> Object {
    theme
        .text(format!("{energy:.1}"), position, theme.fonts.title)
        .color(theme.palette.primary)
}

pub(super) fn build(canvas: &mut dyn Canvas, theme: &Theme) -> anyhow::Result<()> {
    let palette = &theme.palette;
    let title = header(
        canvas,
        theme,
        "POD: the essential directions of data",
        Some("Proper Orthogonal Decomposition"),
    );
    canvas.wait(1.0);
    experiment(canvas, theme);

    let x_axis = canvas.add(
        Object::line(
            to_scene(Vector2::new(-4.0, 0.0)),
            to_scene(Vector2::new(4.0, 0.0)),
        )
        .color(palette.dim_text),
    );
    let y_axis = canvas.add(
        Object::line(
            to_scene(Vector2::new(0.0, -4.0)),
            to_scene(Vector2::new(0.0, 4.0)),
        )
        .color(palette.dim_text),
    );
    let axis_labels = vec![
        canvas.add(
            theme
                .text("Sensor A", to_scene(Vector2::new(4.6, 0.0)), theme.fonts.caption)
                .color(palette.dim_text),
        ),
        canvas.add(
            theme
                .text("Sensor B", to_scene(Vector2::new(0.0, 4.4)), theme.fonts.caption)
                .color(palette.dim_text),
        ),
    ];
    canvas.transition(Effect::Create, &[x_axis, y_axis], 1.5);
    canvas.transition(Effect::Write, &axis_labels, 1.5);

    let cov = Matrix2::new(2.5, 2.0, 2.0, 2.5);
    let points = cloud::gaussian_cloud(&mut fastrand::Rng::with_seed(SEED), &cov, SAMPLES);
    let cloud = canvas.fade_in(dots(points.iter().map(|p| to_scene(*p)), theme), 2.0);

    let observation = canvas.write(
        theme
            .text(
                "The cloud is elliptical: the x/y axes are not the best description",
                Vector3::new(0.0, -3.6, 0.0),
                theme.fonts.caption,
            )
            .color(palette.climber),
        1.0,
    );
    canvas.wait(2.0);
    canvas.fade_out(&[vec![observation], axis_labels].concat(), 0.5);

    // Energy scan over a full turn.
    let intro = canvas.write(
        theme
            .text(
                "Core idea of POD: find the direction with the most energy",
                Vector3::new(0.0, 2.6, 0.0),
                theme.fonts.body,
            )
            .color(palette.climber),
        1.0,
    );
    canvas.wait(1.5);

    let mut angle = 0.0;
    let scan = direction_marker(theme, angle, r"\phi", palette.climber)
        .into_iter()
        .map(|o| canvas.add(o))
        .collect::<Vec<_>>();
    canvas.transition(Effect::Create, &scan, 1.0);
    let lines = projections(&points, angle, palette.target_gradient)
        .map(|o| canvas.add(o))
        .collect::<Vec<_>>();

    let readout_pos = Vector3::new(5.0, 1.5, 0.0);
    let readout = vec![
        canvas.add(
            theme
                .text("projected energy E:", readout_pos, theme.fonts.label)
                .color(palette.target_gradient),
        ),
        canvas.add(energy_value(
            theme,
            readout_pos - Vector3::new(0.0, 0.6, 0.0),
            energy::projected_energy(&points, angle),
        )),
        canvas.add(Object::formula(
            r"E = \sum_{i=1}^{n} |\mathbf{u}_i \cdot \boldsymbol{\phi}|^2",
            readout_pos - Vector3::new(0.0, 1.5, 0.0),
            theme.fonts.body,
        )),
        canvas.add(
            theme
                .text(
                    "u: data point",
                    readout_pos - Vector3::new(0.0, 2.2, 0.0),
                    theme.fonts.caption,
                )
                .color(palette.point_cloud),
        ),
        canvas.add(
            theme
                .text(
                    "φ: scan direction",
                    readout_pos - Vector3::new(0.0, 2.7, 0.0),
                    theme.fonts.caption,
                )
                .color(palette.climber),
        ),
    ];
    canvas.transition(Effect::Write, &readout, 2.0);
    canvas.wait(1.0);

    let update = |canvas: &mut dyn Canvas, angle: f64, label: &str, color: Color| {
        for (id, object) in scan
            .iter()
            .zip(direction_marker(theme, angle, label, color))
        {
            canvas.update(*id, object);
        }
        for (id, object) in lines
            .iter()
            .zip(projections(&points, angle, palette.target_gradient))
        {
            canvas.update(*id, object);
        }
        canvas.update(
            readout[1],
            energy_value(
                theme,
                readout_pos - Vector3::new(0.0, 0.6, 0.0),
                energy::projected_energy(&points, angle),
            ),
        );
    };

    sweep(canvas, 6.0, Rate::Linear, |canvas, t| {
        angle = 2.0 * PI * t;
        update(canvas, angle, r"\phi", palette.climber);
    });
    canvas.wait(0.5);

    let scanned = energy::scan(&points, 360);
    let best = energy::max_energy_angle(&points, 360);
    let mode1 = energy::principal_angle(&points);
    log::debug!(
        "scan maximum at {best:.3} rad ({} samples), exact principal angle {mode1:.3} rad",
        scanned.len()
    );

    // Settle on the exact maximizer, half a turn at most from where the scan stopped.
    let target = 2.0 * PI + mode1;
    sweep(canvas, 1.5, Rate::Smooth, |canvas, t| {
        update(canvas, angle + (target - angle) * t, r"\phi", palette.climber);
    });
    let found = canvas.write(
        theme
            .text(
                "Found it! Mode 1",
                Vector3::new(0.0, 2.0, 0.0),
                theme.fonts.body,
            )
            .color(palette.modes[0]),
        1.5,
    );
    update(canvas, target, r"\phi_1", palette.modes[0]);
    canvas.wait(2.0);
    for &id in &lines {
        canvas.remove(id);
    }
    canvas.fade_out(&[vec![intro, found], readout.clone()].concat(), 1.0);

    // Mode 2 is orthogonal to mode 1.
    let ortho = canvas.write(
        theme
            .text(
                "Mode 2 must be orthogonal to mode 1",
                Vector3::new(0.0, 2.6, 0.0),
                theme.fonts.body,
            )
            .color(palette.climber),
        1.0,
    );
    let constraint = canvas.write(
        Object::formula(
            r"\phi_1 \perp \phi_2",
            Vector3::new(5.0, 1.5, 0.0),
            theme.fonts.label,
        )
        .color(palette.target_gradient),
        1.0,
    );
    let mode2 = direction_marker(theme, mode1 + FRAC_PI_2, r"\phi_2", palette.modes[1])
        .into_iter()
        .map(|o| canvas.add(o))
        .collect::<Vec<_>>();
    canvas.transition(Effect::Create, &mode2, 2.0);
    let right_angle = canvas.add(
        Object::new(Shape::RightAngle {
            corner: to_scene(Vector2::zeros()),
            a: energy::direction(mode1).push(0.0),
            b: energy::direction(mode1 + FRAC_PI_2).push(0.0),
            size: 0.3,
        })
        .color(Color::WHITE),
    );
    canvas.transition(Effect::Create, &[right_angle], 1.0);

    let modes = decompose(&empirical_covariance(&points));
    let labels = ["Mode 1 (most energy)", "Mode 2 (second most)"]
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            canvas.add(
                theme
                    .text(
                        format!("{text}: {:.0}%", 100.0 * modes.energy_ratio(i)),
                        Vector3::new(-4.6, 1.5 - 0.5 * i as f64, 0.0),
                        theme.fonts.caption,
                    )
                    .color(palette.modes[i]),
            )
        })
        .collect::<Vec<_>>();
    canvas.transition(Effect::Write, &labels, 1.0);
    canvas.wait(2.0);
    canvas.fade_out(&[vec![ortho, constraint, right_angle], labels].concat(), 1.0);

    canvas.fade_out(&[cloud, vec![x_axis, y_axis], scan, mode2].concat(), 1.0);
    formulation(canvas, theme)?;
    canvas.fade_out(&title, 0.5);
    Ok(())
}

/// Steps from data matrix to eigenvalue problem.
fn formulation(canvas: &mut dyn Canvas, theme: &Theme) -> anyhow::Result<()> {
    let palette = &theme.palette;
    let heading = canvas.write(
        theme
            .text("The mathematics of POD", Vector3::new(0.0, 3.0, 0.0), theme.fonts.title)
            .color(palette.climber),
        1.0,
    );
    canvas.wait(1.0);

    let steps = [
        (
            "Step 1: build the data matrix",
            r"\mathbf{A} = [\mathbf{u}_1, \mathbf{u}_2, \dots, \mathbf{u}_n]",
            "each column is one data point",
        ),
        (
            "Step 2: compute the covariance matrix",
            r"\mathbf{C} = \mathbf{A}\mathbf{A}^T = \sum_{i=1}^{n} \mathbf{u}_i \mathbf{u}_i^T",
            "how the data spreads along every direction",
        ),
        (
            "Step 3: eigen-decomposition",
            r"\mathbf{C}\boldsymbol{\phi}_i = \lambda_i \boldsymbol{\phi}_i",
            "φᵢ: the i-th mode (eigenvector), λᵢ: its energy (eigenvalue)",
        ),
    ];

    let mut shown: Vec<ObjectId> = Vec::new();
    for (title, tex, explanation) in steps {
        if !shown.is_empty() {
            canvas.fade_out(&shown, 0.5);
        }
        shown = vec![
            canvas.add(
                theme
                    .text(title, Vector3::new(0.0, 2.0, 0.0), theme.fonts.label)
                    .color(palette.constraint_gradient),
            ),
            canvas.add(Object::formula(
                tex,
                Vector3::new(0.0, 1.0, 0.0),
                theme.fonts.subtitle,
            )),
            canvas.add(
                theme
                    .text(explanation, Vector3::new(0.0, 0.2, 0.0), theme.fonts.caption)
                    .color(palette.dim_text),
            ),
        ];
        canvas.transition(Effect::Write, &shown, 1.5);
        canvas.wait(2.0);
    }

    let outline = canvas.add(
        Object::polyline(
            vec![
                Vector3::new(-2.2, 0.6, 0.0),
                Vector3::new(2.2, 0.6, 0.0),
                Vector3::new(2.2, 1.4, 0.0),
                Vector3::new(-2.2, 1.4, 0.0),
            ],
            true,
        )
        .color(palette.climber),
    );
    canvas.transition(Effect::Create, &[outline], 1.0);
    let sorted = canvas.write(
        theme
            .text(
                "Sorted by energy, descending: λ₁ > λ₂ > λ₃ > …",
                Vector3::new(0.0, -0.8, 0.0),
                theme.fonts.label,
            )
            .color(palette.modes[2]),
        1.0,
    );
    canvas.wait(3.0);

    shown.extend([heading, outline, sorted]);
    canvas.fade_out(&shown, 1.0);
    Ok(())
}

/// The physical experiment the data comes from: two sensors sampled together.
fn experiment(canvas: &mut dyn Canvas, theme: &Theme) {
    let palette = &theme.palette;
    let setting = canvas.write(
        theme
            .text(
                "Setting: two sensors in a physical experiment",
                Vector3::new(0.0, 2.0, 0.0),
                theme.fonts.body,
            )
            .color(palette.text),
        1.0,
    );
    let sensors = vec![
        canvas.add(
            theme
                .text(
                    "Sensor A (temperature)",
                    Vector3::new(0.0, 1.1, 0.0),
                    theme.fonts.caption,
                )
                .color(palette.constraint_gradient),
        ),
        canvas.add(
            theme
                .text("Sensor B (pressure)", Vector3::new(0.0, 0.6, 0.0), theme.fonts.caption)
                .color(palette.modes[2]),
        ),
    ];
    canvas.transition(Effect::Write, &sensors, 1.5);
    canvas.wait(1.5);

    let collecting = canvas.write(
        theme
            .text(
                format!("Collecting {SAMPLES} data points..."),
                Vector3::new(0.0, -0.6, 0.0),
                theme.fonts.label,
            )
            .color(palette.point_cloud),
        1.0,
    );
    canvas.wait(1.0);
    canvas.fade_out(&[vec![setting, collecting], sensors].concat(), 0.8);
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::scene::{Command, Recorder};

    use super::*;

    fn record() -> Vec<Command> {
        let theme = Theme::default();
        let mut rec = Recorder::new(theme.frame_rate);
        build(&mut rec, &theme).unwrap();
        rec.finish().unwrap().commands
    }

    #[test]
    fn introduces_the_experiment() {
        let added = record()
            .into_iter()
            .filter_map(|c| match c {
                Command::Add {
                    object:
                        Object {
                            shape: Shape::Text { text, .. },
                            ..
                        },
                    ..
                } => Some(text),
                _ => None,
            })
            .collect::<Vec<_>>();
        for expected in [
            "Sensor A (temperature)",
            "Sensor B (pressure)",
            "Collecting 100 data points...",
            "Sensor A",
            "Sensor B",
            "u: data point",
            "φ: scan direction",
        ] {
            assert!(added.iter().any(|t| t == expected), "missing '{expected}'");
        }
        assert!(added.iter().any(|t| t.starts_with("Sorted by energy")));
    }

    #[test]
    fn locked_direction_is_relabeled() {
        let last_label = record()
            .into_iter()
            .filter_map(|c| match c {
                Command::Update {
                    object:
                        Object {
                            shape: Shape::Formula { tex, .. },
                            ..
                        },
                    ..
                } => Some(tex),
                _ => None,
            })
            .last()
            .unwrap();
        assert_eq!(last_label, r"\phi_1");
    }

    #[test]
    fn markers_sit_on_the_axes() {
        let [line, arrow, _] = direction_marker(&Theme::default(), 0.0, r"\phi", Color::WHITE);
        assert_eq!(
            line.shape,
            Shape::Line {
                start: Vector3::new(-3.5 * AXES_SCALE, AXES_SHIFT, 0.0),
                end: Vector3::new(3.5 * AXES_SCALE, AXES_SHIFT, 0.0),
            }
        );
        match arrow.shape {
            Shape::Arrow { start, end } => {
                assert_eq!(start, Vector3::new(0.0, AXES_SHIFT, 0.0));
                assert_abs_diff_eq!(end, Vector3::new(2.0, AXES_SHIFT, 0.0), epsilon = 1e-12);
            }
            other => panic!("expected an arrow, got {other:?}"),
        }
    }

    #[test]
    fn projections_are_perpendicular() {
        let points = [Vector2::new(1.0, 2.0), Vector2::new(-0.5, 0.3)];
        let angle = 0.6;
        let u = energy::direction(angle).push(0.0);
        for line in projections(&points, angle, Color::WHITE) {
            match line.shape {
                Shape::Line { start, end } => {
                    assert_abs_diff_eq!((end - start).dot(&u), 0.0, epsilon = 1e-12)
                }
                other => panic!("expected a line, got {other:?}"),
            }
        }
    }
}
