//! Linear RGBA color used for explosions, flashes and score text

use serde::{Deserialize, Serialize};

use crate::clamp01;

/// RGBA color with channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
    pub const RED: Rgba = Rgba::rgb(1.0, 0.0, 0.0);
    pub const YELLOW: Rgba = Rgba::rgb(1.0, 0.92, 0.016);
    pub const ORANGE: Rgba = Rgba::rgb(1.0, 0.5, 0.0);
    pub const CYAN: Rgba = Rgba::rgb(0.0, 1.0, 1.0);
    /// All-zero color; a material reporting this is treated as having no color
    pub const CLEAR: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::CLEAR
    }

    /// Upper-case `RRGGBB` hex string (alpha ignored)
    pub fn to_hex_rgb(&self) -> String {
        format!(
            "{:02X}{:02X}{:02X}",
            channel_byte(self.r),
            channel_byte(self.g),
            channel_byte(self.b)
        )
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

#[inline]
fn channel_byte(c: f32) -> u8 {
    (clamp01(c) * 255.0).round() as u8
}
