//! Numerics behind the POD and Lagrange multiplier animations.
//!
//! # Overview
//!
//! Everything in this crate is a pure function of its inputs (or a plain value type). The scene
//! layer feeds it point sets, angles and blend factors, and reads back energies, gradients and
//! eigenvectors to position visual elements on every frame.
//!
//! - [`energy`]: energy captured by projecting a 2D point set onto a direction.
//! - [`covariance`]: the two-eigenvalue covariance model and ordered eigen-decomposition into
//!   [`Modes`][covariance::Modes].
//! - [`gradient`]: scalar fields with closed-form gradients, and a central-difference fallback for
//!   everything else.
//! - [`interp`]: path and matrix blending, `smooth_step` and animation rate curves.
//! - [`cloud`]: reproducible point clouds drawn from a caller-owned seeded generator.
//! - [`geometry`]: constraint paths, surface projection and level sets.
//! - [`svd`]: the stages of `A = UΣVᵀ` applied to the unit circle.
//!
//! # Conventions
//!
//! All computations use `f64`. Angles are in radians and are never wrapped: any value is accepted
//! and treated periodically. Directions are *unsigned* where noted, in which case results are
//! reported in `[0, π)`.
//!
//! 2D quantities that end up on screen are returned as [`Vector3`][nalgebra::Vector3] with `z = 0`,
//! which is what the drawing layer expects.

pub mod cloud;
pub mod covariance;
pub mod energy;
pub mod geometry;
pub mod gradient;
pub mod interp;
pub mod iter;
pub mod num;
pub mod svd;
