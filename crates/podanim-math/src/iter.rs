//! Evenly spaced parameter sequences.

use std::f64::consts::PI;

/// Returns `n` evenly spaced values from `start` to `end`, both inclusive.
///
/// The last value is exactly `end`. For `n == 1` only `start` is yielded.
pub fn linspace(start: f64, end: f64, n: usize) -> impl ExactSizeIterator<Item = f64> + Clone {
    let step = if n > 1 {
        (end - start) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n).map(move |i| {
        if n > 1 && i == n - 1 {
            end
        } else {
            start + step * i as f64
        }
    })
}

/// Returns `n` evenly spaced angles covering the half-open range `[0, π)`.
///
/// This covers every unsigned direction exactly once.
pub fn half_turn(n: usize) -> impl ExactSizeIterator<Item = f64> + Clone {
    (0..n).map(move |i| PI * i as f64 / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_endpoints() {
        let values = linspace(0.1, 0.8, 8).collect::<Vec<_>>();
        assert_eq!(values.len(), 8);
        assert_eq!(values[0], 0.1);
        assert_eq!(values[7], 0.8);
        assert!(values.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(linspace(2.0, 5.0, 1).collect::<Vec<_>>(), [2.0]);
        assert_eq!(linspace(2.0, 5.0, 0).len(), 0);
    }

    #[test]
    fn half_turn_excludes_pi() {
        let angles = half_turn(4).collect::<Vec<_>>();
        assert_eq!(angles, [0.0, PI / 4.0, PI / 2.0, 3.0 * PI / 4.0]);
    }
}
