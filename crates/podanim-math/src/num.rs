//! Utilities for numerics.

use std::{cmp::Ordering, f64::consts::PI};

/// An `f64` that implements [`Ord`] according to the IEEE 754 totalOrder predicate.
#[derive(Debug, Clone, Copy)]
pub struct TotalF64(pub f64);

impl PartialEq for TotalF64 {
    fn eq(&self, other: &Self) -> bool {
        f64::total_cmp(&self.0, &other.0) == Ordering::Equal
    }
}

impl Eq for TotalF64 {}

impl PartialOrd for TotalF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TotalF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        f64::total_cmp(&self.0, &other.0)
    }
}

/// Maps an angle describing an *unsigned* direction (a line through the origin) into `[0, π)`.
pub fn unsigned_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(PI);
    // `rem_euclid` can round up to exactly `PI` for tiny negative inputs.
    if wrapped >= PI {
        0.0
    } else {
        wrapped
    }
}

/// Returns the distance between two unsigned directions, in `[0, π/2]`.
pub fn unsigned_angle_distance(a: f64, b: f64) -> f64 {
    let d = unsigned_angle(a - b);
    d.min(PI - d)
}
