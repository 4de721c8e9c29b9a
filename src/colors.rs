//! Named colors and color space helpers.
//!
//! HSV (Hue, Saturation, Value) is often more intuitive than RGB when
//! picking sequence colors by eye. All helpers return [`RgbColor`] so the
//! result can go straight into an animation configuration.

use crate::types::RgbColor;
use palette::{FromColor, Hsv, Srgb};

pub const BLACK: RgbColor = Srgb::new(0, 0, 0);
pub const WHITE: RgbColor = Srgb::new(255, 255, 255);
pub const RED: RgbColor = Srgb::new(255, 0, 0);
pub const GREEN: RgbColor = Srgb::new(0, 255, 0);
pub const BLUE: RgbColor = Srgb::new(0, 0, 255);
pub const CYAN: RgbColor = Srgb::new(0, 255, 255);
pub const MAGENTA: RgbColor = Srgb::new(255, 0, 255);
pub const SILVER: RgbColor = Srgb::new(192, 192, 192);
pub const GRAY: RgbColor = Srgb::new(128, 128, 128);
pub const MAROON: RgbColor = Srgb::new(128, 0, 0);
pub const OLIVE: RgbColor = Srgb::new(128, 128, 0);
pub const PURPLE: RgbColor = Srgb::new(128, 0, 128);
pub const TEAL: RgbColor = Srgb::new(0, 128, 128);
pub const NAVY: RgbColor = Srgb::new(0, 0, 128);
pub const TURQUOISE: RgbColor = Srgb::new(64, 224, 208);

/// Creates a color from HSV components.
///
/// `hue` is in degrees and wraps at 360; `saturation` and `value` are
/// clamped to 0.0-1.0.
#[inline]
pub fn hsv(hue: f32, saturation: f32, value: f32) -> RgbColor {
    let hsv = Hsv::new(hue, saturation.clamp(0.0, 1.0), value.clamp(0.0, 1.0));
    let rgb: Srgb<f32> = Srgb::from_color(hsv);
    rgb.into_format()
}

/// Creates a fully saturated, full brightness color from a hue.
#[inline]
pub fn hue(hue: f32) -> RgbColor {
    hsv(hue, 1.0, 1.0)
}
