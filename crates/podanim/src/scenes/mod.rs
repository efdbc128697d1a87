//! The scenes, and a registry to look them up by name.

use anyhow::Context;
use nalgebra::Vector3;

use crate::{
    scene::{Canvas, Object, ObjectId, Recorder, Recording, Shape, FRAME_HEIGHT, FRAME_WIDTH},
    theme::Theme,
};

mod contour_morph;
mod energy_search;
mod lagrange_landscape;
mod modes_3d;
mod pod_review;
mod svd_stages;

/// Signature shared by all scenes.
pub type SceneFn = fn(&mut dyn Canvas, &Theme) -> anyhow::Result<()>;

/// A named scene.
#[derive(Clone, Copy)]
pub struct SceneEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub build: SceneFn,
}

/// All scenes, in presentation order.
pub const SCENES: &[SceneEntry] = &[
    SceneEntry {
        name: "pod-review",
        description: "rotating direction over a ring cloud, with a live energy meter",
        build: pod_review::build,
    },
    SceneEntry {
        name: "energy-search",
        description: "full-turn energy scan of a correlated cloud, locking modes 1 and 2",
        build: energy_search::build,
    },
    SceneEntry {
        name: "modes-3d",
        description: "empirical covariance and ordered modes of a 3D cloud",
        build: modes_3d::build,
    },
    SceneEntry {
        name: "lagrange-landscape",
        description: "constraint path on a landscape, with ∇f and ∇g along the path",
        build: lagrange_landscape::build,
    },
    SceneEntry {
        name: "contour-morph",
        description: "constraint path and quadratic-form level set morphing into circles",
        build: contour_morph::build,
    },
    SceneEntry {
        name: "svd-stages",
        description: "the unit circle pushed through Vᵀ, Σ and U",
        build: svd_stages::build,
    },
];

/// Looks up a scene by name.
pub fn find(name: &str) -> Option<&'static SceneEntry> {
    SCENES.iter().find(|entry| entry.name == name)
}

/// Records `entry` into a fresh [`Recorder`].
pub fn record(entry: &SceneEntry, theme: &Theme) -> anyhow::Result<Recording> {
    let mut recorder = Recorder::new(theme.frame_rate);
    (entry.build)(&mut recorder, theme)
        .with_context(|| format!("failed to build scene '{}'", entry.name))?;
    recorder
        .finish()
        .with_context(|| format!("scene '{}' is inconsistent", entry.name))
}

/// Adds the title (and optional subtitle) to the top left corner of the frame.
fn header(
    canvas: &mut dyn Canvas,
    theme: &Theme,
    title: &str,
    subtitle: Option<&str>,
) -> Vec<ObjectId> {
    let left = -FRAME_WIDTH / 2.0 + 2.4;
    let top = FRAME_HEIGHT / 2.0 - 0.55;
    let mut ids = vec![canvas.add(
        theme
            .text(title, Vector3::new(left, top, 0.0), theme.fonts.title)
            .color(theme.palette.primary),
    )];
    if let Some(subtitle) = subtitle {
        ids.push(canvas.add(
            theme
                .text(
                    subtitle,
                    Vector3::new(left, top - 0.6, 0.0),
                    theme.fonts.subtitle,
                )
                .color(theme.palette.text),
        ));
    }
    ids
}

/// Returns a faint coordinate grid spanning `[-x, x] × [-y, y]` with unit spacing.
fn grid(theme: &Theme, x: i32, y: i32) -> Vec<Object> {
    let vertical = (-x..=x).map(|i| {
        let i = f64::from(i);
        Object::line(
            Vector3::new(i, -f64::from(y), 0.0),
            Vector3::new(i, f64::from(y), 0.0),
        )
    });
    let horizontal = (-y..=y).map(|j| {
        let j = f64::from(j);
        Object::line(
            Vector3::new(-f64::from(x), j, 0.0),
            Vector3::new(f64::from(x), j, 0.0),
        )
    });
    vertical
        .chain(horizontal)
        .map(|line| line.color(theme.palette.grid).stroke_width(1.0))
        .collect()
}

/// Returns a point cloud as dots.
fn dots(points: impl IntoIterator<Item = Vector3<f64>>, theme: &Theme) -> Vec<Object> {
    let color = theme.palette.point_cloud.with_opacity(0.7);
    points
        .into_iter()
        .map(|p| Object::dot(p, 0.04).color(color))
        .collect()
}

/// A filled rectangle, used as a progress bar.
fn bar(left: f64, y: f64, width: f64, height: f64) -> Object {
    Object::new(Shape::Rect {
        center: Vector3::new(left + width / 2.0, y, 0.0),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_have_durations() {
        let theme = Theme::default();
        for (i, a) in SCENES.iter().enumerate() {
            assert!(theme.nominal_duration(a.name).is_some(), "{}", a.name);
            for b in &SCENES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
        assert_eq!(find("svd-stages").unwrap().name, "svd-stages");
        assert!(find("scene07").is_none());
    }
}
