//! Recap of POD as a search for the direction capturing the most energy.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

use nalgebra::Vector3;
use podanim_math::{cloud, energy, energy::EnergyMeter, interp::Rate};

use crate::{
    scene::{sweep, Canvas, Object, ObjectId, Shape},
    theme::Theme,
};

use super::{bar, dots, grid, header};

const SEED: u64 = 8;
const SAMPLES: usize = 160;
const ELLIPSE_WIDTH: f64 = 8.0;
const ELLIPSE_HEIGHT: f64 = 4.2;
const ARROW_LENGTH: f64 = 3.5;

const METER_LEFT: f64 = 2.0;
const METER_Y: f64 = 2.3;
const METER_WIDTH: f64 = 3.6;
const METER_HEIGHT: f64 = 0.6;

/// Objects that follow the direction angle.
struct Tracked {
    arrow: ObjectId,
    label: ObjectId,
    bar: ObjectId,
    value: ObjectId,
}

fn arrow(theme: &Theme, angle: f64) -> Object {
    let tip = energy::direction(angle).push(0.0) * ARROW_LENGTH;
    Object::arrow(Vector3::zeros(), tip)
        .color(theme.palette.primary)
        .stroke_width(6.0)
}

fn label(theme: &Theme, angle: f64) -> Object {
    let position = energy::direction(angle).push(0.0) * (ARROW_LENGTH + 0.35);
    theme
        .text("u", position, theme.fonts.body)
        .color(theme.palette.primary)
}

fn meter_bar(theme: &Theme, ratio: f64) -> Object {
    let width = (ratio * (METER_WIDTH - 0.12)).max(0.02);
    bar(METER_LEFT + 0.06, METER_Y, width, METER_HEIGHT - 0.08)
        .color(theme.palette.primary.with_opacity(0.85))
}

fn meter_value(theme: &Theme, ratio: f64) -> Object {
    let position = Vector3::new(METER_LEFT + METER_WIDTH + 0.6, METER_Y, 0.0);
    theme
        .text(
            format!("{:.0}%", 100.0 * ratio),
            position,
            theme.fonts.label,
        )
        .color(theme.palette.primary)
}

fn update_tracked(
    canvas: &mut dyn Canvas,
    theme: &Theme,
    ids: &Tracked,
    meter: &EnergyMeter<'_>,
    angle: f64,
) {
    let ratio = meter.ratio(angle);
    canvas.update(ids.arrow, arrow(theme, angle));
    canvas.update(ids.label, label(theme, angle));
    canvas.update(ids.bar, meter_bar(theme, ratio));
    canvas.update(ids.value, meter_value(theme, ratio));
}

fn rectangle_outline(center: Vector3<f64>, width: f64, height: f64) -> Vec<Vector3<f64>> {
    let (w, h) = (width / 2.0, height / 2.0);
    [(-w, -h), (w, -h), (w, h), (-w, h)]
        .into_iter()
        .map(|(x, y)| center + Vector3::new(x, y, 0.0))
        .collect()
}

pub(super) fn build(canvas: &mut dyn Canvas, theme: &Theme) -> anyhow::Result<()> {
    let title = header(
        canvas,
        theme,
        "Scene 1 · POD review",
        Some("constrained optimum → eigenvalue intuition"),
    );

    let plane = canvas.fade_in(grid(theme, 4, 3), 1.0);
    let intro = canvas.write(
        theme
            .text(
                "POD: find the direction capturing the most energy",
                Vector3::new(0.3, 3.2, 0.0),
                theme.fonts.subtitle,
            )
            .color(theme.palette.text),
        1.0,
    );

    let ellipse = canvas.fade_in(
        vec![Object::new(Shape::Ellipse {
            center: Vector3::zeros(),
            width: ELLIPSE_WIDTH,
            height: ELLIPSE_HEIGHT,
        })
        .color(theme.palette.text.with_opacity(0.5))
        .stroke_width(2.5)],
        0.8,
    );

    let mut rng = fastrand::Rng::with_seed(SEED);
    let samples = cloud::ring_cloud(&mut rng, ELLIPSE_WIDTH, ELLIPSE_HEIGHT, SAMPLES);
    let cloud = canvas.fade_in(dots(samples.iter().map(|p| p.push(0.0)), theme), 1.4);
    log::debug!("ring cloud with {} points", samples.len());

    let start = -FRAC_PI_4;
    let meter = EnergyMeter::new(&samples);
    let pointer = canvas.fade_in(vec![arrow(theme, start), label(theme, start)], 1.0);
    canvas.wait(0.8);

    let meter_center = Vector3::new(METER_LEFT + METER_WIDTH / 2.0, METER_Y, 0.0);
    let hud = canvas.fade_in(
        vec![
            theme
                .text(
                    "energy captured",
                    meter_center + Vector3::new(0.0, 0.55, 0.0),
                    theme.fonts.label,
                )
                .color(theme.palette.dim_text),
            Object::polyline(
                rectangle_outline(meter_center, METER_WIDTH, METER_HEIGHT),
                true,
            )
            .color(theme.palette.text),
            meter_bar(theme, meter.ratio(start)),
            meter_value(theme, meter.ratio(start)),
        ],
        1.0,
    );
    canvas.fade_out(&[intro], 0.5);

    let tracked = Tracked {
        arrow: pointer[0],
        label: pointer[1],
        bar: hud[2],
        value: hud[3],
    };

    // Rotate to vertical, then swing out and back.
    sweep(canvas, 3.5, Rate::Smooth, |canvas, t| {
        let angle = start + (FRAC_PI_2 - start) * t;
        update_tracked(canvas, theme, &tracked, &meter, angle);
    });
    canvas.wait(1.2);
    sweep(canvas, 4.0, Rate::ThereAndBack, |canvas, t| {
        let angle = FRAC_PI_2 + (-FRAC_PI_3 - FRAC_PI_2) * t;
        update_tracked(canvas, theme, &tracked, &meter, angle);
    });
    canvas.wait(0.8);
    log::debug!(
        "principal direction at {:.3} rad, capturing {:.1}%",
        energy::principal_angle(&samples),
        100.0 * meter.ratio(energy::principal_angle(&samples))
    );

    let hint = canvas.write(
        theme
            .text(
                "maximum projected energy = principal mode",
                Vector3::new(0.0, -3.3, 0.0),
                theme.fonts.label,
            )
            .color(theme.palette.text),
        1.0,
    );
    canvas.wait(1.8);

    let formula = canvas.write(
        Object::formula(
            r"\max_{u} \; u^{\top} C u \quad \text{s.t.} \quad \|u\| = 1",
            Vector3::new(3.9, -2.6, 0.0),
            theme.fonts.body,
        )
        .color(theme.palette.text),
        1.0,
    );
    canvas.wait(1.2);

    let card_center = Vector3::new(-4.1, -2.4, 0.0);
    let card = canvas.fade_in(
        vec![
            Object::polyline(rectangle_outline(card_center, 4.6, 1.5), true)
                .color(theme.palette.primary)
                .stroke_width(2.5),
            theme
                .text(
                    "Why is the constrained problem",
                    card_center + Vector3::new(0.0, 0.25, 0.0),
                    theme.fonts.caption,
                )
                .color(theme.palette.text),
            theme
                .text(
                    "an eigenvalue problem?",
                    card_center - Vector3::new(0.0, 0.25, 0.0),
                    theme.fonts.caption,
                )
                .color(theme.palette.text),
        ],
        0.8,
    );
    canvas.wait(3.5);

    let everything = [plane, ellipse, cloud, pointer, hud, vec![hint, formula], card].concat();
    canvas.fade_out(&everything, 1.0);
    canvas.fade_out(&title, 0.5);
    Ok(())
}
