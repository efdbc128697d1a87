//! Colors, fonts and timing shared by all scenes.

use std::{collections::BTreeMap, fmt, str::FromStr};

use anyhow::{bail, Context};
use nalgebra::Vector3;

use crate::scene::Object;

/// An 8-bit RGBA color.
///
/// Colors are in the non-linear sRGB color space and use non-premultiplied alpha.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct Color([u8; 4]);

impl Color {
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.0[3]
    }

    pub fn with_alpha(mut self, a: u8) -> Color {
        self.0[3] = a;
        self
    }

    /// Sets the alpha channel from an opacity in range 0.0 to 1.0 (values outside are clamped).
    pub fn with_opacity(self, opacity: f64) -> Color {
        self.with_alpha((opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Parses `#rrggbb` or `#rrggbbaa` (the `#` is optional).
impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            bail!("invalid color `{s}`, expected `#rrggbb` or `#rrggbbaa`");
        }
        let mut rgba = [255; 4];
        for (i, channel) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
            let digits = &hex[2 * i..2 * i + 2];
            *channel = u8::from_str_radix(digits, 16)
                .with_context(|| format!("invalid color channel `{digits}` in `{s}`"))?;
        }
        Ok(Self(rgba))
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r(),
            self.g(),
            self.b(),
            self.a(),
        )
    }
}

/// Prints `#rrggbb`, or `#rrggbbaa` if the color is not fully opaque.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())?;
        if self.a() != 255 {
            write!(f, "{:02x}", self.a())?;
        }
        Ok(())
    }
}

/// The color scheme: light elements on a dark navy background.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Color,
    /// Constraint paths, principal directions and titles.
    pub primary: Color,
    /// Gradient of the objective, `∇f`.
    pub target_gradient: Color,
    /// Gradient of the constraint, `∇g`.
    pub constraint_gradient: Color,
    pub point_cloud: Color,
    pub grid: Color,
    pub contour: Color,
    pub climber: Color,
    pub text: Color,
    pub dim_text: Color,
    pub highlight: Color,
    /// Colors of modes 1, 2 and 3.
    pub modes: [Color; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb8(0x05, 0x0c, 0x1d),
            primary: Color::from_rgb8(0xf4, 0x5b, 0x69),
            target_gradient: Color::from_rgb8(0xf7, 0xc8, 0x73),
            constraint_gradient: Color::from_rgb8(0x50, 0xa7, 0xf6),
            point_cloud: Color::from_rgb8(0x9f, 0xd8, 0xff),
            grid: Color::from_rgb8(0x1d, 0x24, 0x33),
            contour: Color::WHITE,
            climber: Color::from_rgb8(0xfc, 0xe7, 0x6c),
            text: Color::from_rgb8(0xf4, 0xf4, 0xf5),
            dim_text: Color::from_rgb8(0xa2, 0xa7, 0xb4),
            highlight: Color::from_rgb8(0xff, 0x6b, 0x9d),
            modes: [
                Color::from_rgb8(0xf4, 0x5b, 0x69),
                Color::from_rgb8(0x50, 0xa7, 0xf6),
                Color::from_rgb8(0x7c, 0xd9, 0x92),
            ],
        }
    }
}

/// Font family and sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct Fonts {
    /// Font family used for all text. Must contain CJK glyphs.
    pub family: String,
    pub title: u32,
    pub subtitle: u32,
    pub body: u32,
    pub label: u32,
    pub caption: u32,
}

impl Fonts {
    /// Returns the default CJK font family of the platform we're compiled for.
    pub fn platform_family() -> &'static str {
        if cfg!(target_os = "windows") {
            "Microsoft YaHei"
        } else if cfg!(target_os = "macos") {
            "PingFang SC"
        } else {
            "sans-serif"
        }
    }
}

impl Default for Fonts {
    fn default() -> Self {
        Self {
            family: Self::platform_family().to_string(),
            title: 46,
            subtitle: 34,
            body: 32,
            label: 28,
            caption: 24,
        }
    }
}

/// Environment variable overriding [`Fonts::family`].
pub const FONT_VAR: &str = "PODANIM_FONT";
/// Environment variable overriding [`Theme::frame_rate`].
pub const FPS_VAR: &str = "PODANIM_FPS";

const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Everything a scene needs to know about presentation.
///
/// Scenes get a `&Theme` passed in; there is no global styling state.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub palette: Palette,
    pub fonts: Fonts,
    /// Frames per second at which sweeps are sampled.
    pub frame_rate: f64,
    durations: BTreeMap<&'static str, f64>,
}

impl Default for Theme {
    fn default() -> Self {
        let durations = [
            ("pod-review", 40.0),
            ("energy-search", 60.0),
            ("modes-3d", 90.0),
            ("lagrange-landscape", 80.0),
            ("contour-morph", 75.0),
            ("svd-stages", 45.0),
        ]
        .into_iter()
        .collect();
        Self {
            palette: Palette::default(),
            fonts: Fonts::default(),
            frame_rate: DEFAULT_FRAME_RATE,
            durations,
        }
    }
}

impl Theme {
    /// Creates the default theme, with overrides taken from the `PODANIM_FONT` and `PODANIM_FPS`
    /// environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::default().with_overrides(
            std::env::var(FONT_VAR).ok(),
            std::env::var(FPS_VAR).ok(),
        )
    }

    /// Applies a font family and frame rate override, as they would be read from the environment.
    ///
    /// Empty strings are ignored. The frame rate must be a positive, finite number.
    pub fn with_overrides(
        mut self,
        font: Option<String>,
        fps: Option<String>,
    ) -> anyhow::Result<Self> {
        if let Some(font) = font.filter(|f| !f.trim().is_empty()) {
            log::debug!("using font '{font}' from {FONT_VAR}");
            self.fonts.family = font;
        }
        if let Some(fps) = fps.filter(|f| !f.trim().is_empty()) {
            let rate = fps
                .trim()
                .parse::<f64>()
                .with_context(|| format!("{FPS_VAR} must be a number, got '{fps}'"))?;
            if !(rate.is_finite() && rate > 0.0) {
                bail!("{FPS_VAR} must be positive, got {rate}");
            }
            self.frame_rate = rate;
        }
        Ok(self)
    }

    /// Returns the intended duration of the named scene in seconds, if one is configured.
    pub fn nominal_duration(&self, scene: &str) -> Option<f64> {
        self.durations.get(scene).copied()
    }

    /// Creates a text object set in the theme's font family.
    pub fn text(&self, text: impl Into<String>, position: Vector3<f64>, size: u32) -> Object {
        Object::text(text, position, size, self.fonts.family.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color() {
        let c: Color = "#F45B69".parse().unwrap();
        assert_eq!(c, Color::from_rgb8(0xf4, 0x5b, 0x69));
        assert_eq!(format!("{c}"), "#f45b69");
        assert_eq!(format!("{c:?}"), "#f45b69ff");

        let c: Color = "050c1d80".parse().unwrap();
        assert_eq!(c, Color::from_rgba8(0x05, 0x0c, 0x1d, 0x80));
        assert_eq!(c.to_string(), "#050c1d80");

        assert!("#12345".parse::<Color>().is_err());
        assert!("#12345g".parse::<Color>().is_err());
        assert!("#ääää".parse::<Color>().is_err());
    }

    #[test]
    fn opacity() {
        assert_eq!(Color::WHITE.with_opacity(0.0).a(), 0);
        assert_eq!(Color::WHITE.with_opacity(0.5).a(), 128);
        assert_eq!(Color::WHITE.with_opacity(3.0).a(), 255);
    }

    #[test]
    fn overrides() {
        let theme = Theme::default()
            .with_overrides(Some("Source Han Sans CN".into()), Some(" 60 ".into()))
            .unwrap();
        assert_eq!(theme.fonts.family, "Source Han Sans CN");
        assert_eq!(theme.frame_rate, 60.0);

        let theme = Theme::default()
            .with_overrides(Some(String::new()), None)
            .unwrap();
        assert_eq!(theme.fonts.family, Fonts::platform_family());
        assert_eq!(theme.frame_rate, 30.0);
    }

    #[test]
    fn bad_frame_rate() {
        for fps in ["fast", "0", "-24", "inf", "NaN"] {
            let res = Theme::default().with_overrides(None, Some(fps.into()));
            assert!(res.is_err(), "accepted frame rate '{fps}'");
        }
    }

    #[test]
    fn durations() {
        let theme = Theme::default();
        assert_eq!(theme.nominal_duration("modes-3d"), Some(90.0));
        assert_eq!(theme.nominal_duration("nope"), None);
    }
}
