//! Scene descriptions for animations explaining Proper Orthogonal Decomposition.
//!
//! Every scene is a plain function that receives a [`Canvas`][scene::Canvas] to issue drawing
//! commands to, and the [`Theme`][theme::Theme] to style them with. The numerics that position
//! everything live in [`podanim_math`].
//!
//! # Environment Variables
//!
//! * `PODANIM_FONT`: Overrides the font family used for all text. By default, a platform-specific
//!   font with CJK glyphs is used.
//! * `PODANIM_FPS`: Overrides the number of frames per second that animated sweeps are sampled at
//!   (default: 30).

use log::LevelFilter;

pub mod scene;
pub mod scenes;
pub mod theme;

pub use podanim_math as math;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .filter(Some("podanim_math"), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate, `podanim` and `podanim_math` will log at *debug* level. This can be
/// overridden with the `RUST_LOG` environment variable.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
