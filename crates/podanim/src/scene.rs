//! Scene description model.
//!
//! Scenes don't draw anything themselves. They issue [`Command`]s to a [`Canvas`], which can
//! record them ([`Recorder`]), or hand them to a renderer.
//!
//! # Coordinates
//!
//! Scene coordinates are in abstract units with the origin at the center of the frame, X pointing
//! right and Y pointing up. The visible frame is [`FRAME_WIDTH`] by [`FRAME_HEIGHT`] units. Z
//! points towards the viewer and is only used by 3D scenes.

use std::{collections::BTreeSet, fmt};

use anyhow::bail;
use itertools::Itertools;
use nalgebra::Vector3;
use podanim_math::interp::Rate;

use crate::theme::Color;

pub const FRAME_WIDTH: f64 = 14.0;
pub const FRAME_HEIGHT: f64 = 8.0;

/// Identifies an object added to a [`Canvas`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Geometry of a scene object.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Dot {
        center: Vector3<f64>,
        radius: f64,
    },
    Line {
        start: Vector3<f64>,
        end: Vector3<f64>,
    },
    Arrow {
        start: Vector3<f64>,
        end: Vector3<f64>,
    },
    /// Plain text in the font `family`, centered on `position`.
    Text {
        text: String,
        position: Vector3<f64>,
        size: u32,
        family: String,
    },
    /// A TeX formula, centered on `position`.
    Formula {
        tex: String,
        position: Vector3<f64>,
        size: u32,
    },
    /// An axis-aligned ellipse outline.
    Ellipse {
        center: Vector3<f64>,
        width: f64,
        height: f64,
    },
    Polyline {
        points: Vec<Vector3<f64>>,
        closed: bool,
    },
    /// A filled, axis-aligned rectangle.
    Rect {
        center: Vector3<f64>,
        width: f64,
        height: f64,
    },
    /// The square mark denoting a right angle at `corner` between two unit directions.
    RightAngle {
        corner: Vector3<f64>,
        a: Vector3<f64>,
        b: Vector3<f64>,
        size: f64,
    },
}

/// A [`Shape`] with styling.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub shape: Shape,
    pub color: Color,
    pub stroke_width: f64,
}

impl Object {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            color: Color::WHITE,
            stroke_width: 2.0,
        }
    }

    pub fn dot(center: Vector3<f64>, radius: f64) -> Self {
        Self::new(Shape::Dot { center, radius })
    }

    pub fn line(start: Vector3<f64>, end: Vector3<f64>) -> Self {
        Self::new(Shape::Line { start, end })
    }

    pub fn arrow(start: Vector3<f64>, end: Vector3<f64>) -> Self {
        Self::new(Shape::Arrow { start, end })
    }

    pub fn text(
        text: impl Into<String>,
        position: Vector3<f64>,
        size: u32,
        family: impl Into<String>,
    ) -> Self {
        Self::new(Shape::Text {
            text: text.into(),
            position,
            size,
            family: family.into(),
        })
    }

    pub fn formula(tex: impl Into<String>, position: Vector3<f64>, size: u32) -> Self {
        Self::new(Shape::Formula {
            tex: tex.into(),
            position,
            size,
        })
    }

    pub fn polyline(points: Vec<Vector3<f64>>, closed: bool) -> Self {
        Self::new(Shape::Polyline { points, closed })
    }

    /// Sets the object's color.
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets the stroke width of outlines, lines and arrows.
    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }
}

/// Animation applied to objects entering or leaving the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FadeIn,
    /// Fades the targets out and removes them from the scene.
    FadeOut,
    /// Writes text or formulas stroke by stroke.
    Write,
    /// Draws outlines progressively.
    Create,
}

/// A single instruction issued by a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add { id: ObjectId, object: Object },
    Update { id: ObjectId, object: Object },
    Remove { id: ObjectId },
    Transition {
        effect: Effect,
        targets: Vec<ObjectId>,
        run_time: f64,
    },
    Wait { duration: f64 },
    /// All updates since the previous frame boundary form one frame.
    EndFrame,
}

/// Receiver of scene commands.
///
/// Adding an object makes it part of the scene immediately; use [`Canvas::transition`] to animate
/// its appearance.
pub trait Canvas {
    fn add(&mut self, object: Object) -> ObjectId;

    /// Replaces the object `id` with `object`.
    fn update(&mut self, id: ObjectId, object: Object);

    fn remove(&mut self, id: ObjectId);

    fn transition(&mut self, effect: Effect, targets: &[ObjectId], run_time: f64);

    fn wait(&mut self, duration: f64);

    /// Returns the number of frames per second that [`sweep`] should produce.
    fn frame_rate(&self) -> f64;

    fn end_frame(&mut self);

    /// Adds all `objects` and fades them in together.
    fn fade_in(&mut self, objects: Vec<Object>, run_time: f64) -> Vec<ObjectId> {
        let ids = objects.into_iter().map(|o| self.add(o)).collect::<Vec<_>>();
        self.transition(Effect::FadeIn, &ids, run_time);
        ids
    }

    fn fade_out(&mut self, targets: &[ObjectId], run_time: f64) {
        self.transition(Effect::FadeOut, targets, run_time);
    }

    /// Adds a text or formula object and writes it out.
    fn write(&mut self, object: Object, run_time: f64) -> ObjectId {
        let id = self.add(object);
        self.transition(Effect::Write, &[id], run_time);
        id
    }
}

/// Animates a value over `run_time` seconds, one frame at a time.
///
/// For every frame, `frame` is called with the eased progress (`rate` applied to the linear
/// progress), after which the frame is ended. There is always at least one frame, and the last
/// frame receives exactly `rate.apply(1.0)`, so sweeps land precisely on their target.
pub fn sweep<C: Canvas + ?Sized>(
    canvas: &mut C,
    run_time: f64,
    rate: Rate,
    mut frame: impl FnMut(&mut C, f64),
) {
    let frames = ((run_time * canvas.frame_rate()).ceil() as usize).max(1);
    for i in 1..=frames {
        let t = i as f64 / frames as f64;
        frame(canvas, rate.apply(t));
        canvas.end_frame();
    }
}

/// A [`Canvas`] that stores every command it receives.
pub struct Recorder {
    frame_rate: f64,
    commands: Vec<Command>,
    next_id: u32,
    live: BTreeSet<ObjectId>,
    elapsed: f64,
    frames: usize,
    errors: Vec<String>,
}

/// The result of recording a scene.
#[derive(Debug, Clone)]
pub struct Recording {
    pub commands: Vec<Command>,
    /// Total scene duration in seconds.
    pub duration: f64,
    /// Number of objects that were added over the whole scene.
    pub objects: usize,
    /// Number of frames produced by sweeps.
    pub frames: usize,
}

impl Recorder {
    /// Creates a recorder that samples sweeps at `frame_rate` frames per second.
    ///
    /// # Panics
    ///
    /// `frame_rate` must be positive.
    pub fn new(frame_rate: f64) -> Self {
        assert!(frame_rate > 0.0, "frame rate must be positive");
        Self {
            frame_rate,
            commands: Vec::new(),
            next_id: 0,
            live: BTreeSet::new(),
            elapsed: 0.0,
            frames: 0,
            errors: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Returns the scene time elapsed so far, in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Returns whether `id` is currently part of the scene.
    pub fn is_live(&self, id: ObjectId) -> bool {
        self.live.contains(&id)
    }

    /// Finishes the recording.
    ///
    /// Fails if the scene referred to objects that were never added or were already removed.
    pub fn finish(self) -> anyhow::Result<Recording> {
        if !self.errors.is_empty() {
            bail!(
                "scene issued {} invalid command(s): {}",
                self.errors.len(),
                self.errors.iter().join("; ")
            );
        }
        Ok(Recording {
            commands: self.commands,
            duration: self.elapsed,
            objects: self.next_id as usize,
            frames: self.frames,
        })
    }

    fn check_live(&mut self, id: ObjectId, op: &str) -> bool {
        if self.live.contains(&id) {
            true
        } else {
            log::warn!("{op} of unknown object {id}");
            self.errors.push(format!("{op} of unknown object {id}"));
            false
        }
    }
}

impl Canvas for Recorder {
    fn add(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        self.commands.push(Command::Add { id, object });
        id
    }

    fn update(&mut self, id: ObjectId, object: Object) {
        if self.check_live(id, "update") {
            self.commands.push(Command::Update { id, object });
        }
    }

    fn remove(&mut self, id: ObjectId) {
        if self.check_live(id, "removal") {
            self.live.remove(&id);
            self.commands.push(Command::Remove { id });
        }
    }

    fn transition(&mut self, effect: Effect, targets: &[ObjectId], run_time: f64) {
        let mut valid = true;
        for &id in targets {
            valid &= self.check_live(id, "transition");
        }
        if !valid {
            return;
        }
        if effect == Effect::FadeOut {
            for id in targets {
                self.live.remove(id);
            }
        }
        self.elapsed += run_time;
        self.commands.push(Command::Transition {
            effect,
            targets: targets.to_vec(),
            run_time,
        });
    }

    fn wait(&mut self, duration: f64) {
        self.elapsed += duration;
        self.commands.push(Command::Wait { duration });
    }

    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn end_frame(&mut self) {
        self.elapsed += self.frame_rate.recip();
        self.frames += 1;
        self.commands.push(Command::EndFrame);
    }
}
