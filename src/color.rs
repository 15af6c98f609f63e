//! Color triple type shared by the pipeline, the server and the client.
//!
//! A [`ColorTriple`] is three integer channel intensities (red, green, blue).
//! Channels are `u16` because the extraction grammar admits up to three digits,
//! so a model answering `[300, 0, 9]` is representable without loss.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Three channel intensities in R, G, B order.
///
/// Serializes to JSON as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u16; 3]", into = "[u16; 3]")]
pub struct ColorTriple {
    r: u16,
    g: u16,
    b: u16,
}

impl ColorTriple {
    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }

    pub fn r(&self) -> u16 {
        self.r
    }

    pub fn g(&self) -> u16 {
        self.g
    }

    pub fn b(&self) -> u16 {
        self.b
    }

    pub fn channels(&self) -> [u16; 3] {
        [self.r, self.g, self.b]
    }

    /// True when every channel lies in `0..=255`.
    pub fn is_in_gamut(&self) -> bool {
        self.channels().iter().all(|c| *c <= 255)
    }

    /// Render as a CSS color string, e.g. `rgb(12, 200, 5)`.
    ///
    /// Channels are written as-is, out-of-gamut values included.
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Parse the format produced by [`ColorTriple::to_css`].
    ///
    /// Whitespace around channels is tolerated; anything else returns `None`.
    pub fn from_css(s: &str) -> Option<Self> {
        let inner = s.trim().strip_prefix("rgb(")?.strip_suffix(')')?;
        let mut parts = inner.split(',').map(|p| p.trim().parse::<u16>());
        let r = parts.next()?.ok()?;
        let g = parts.next()?.ok()?;
        let b = parts.next()?.ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(r, g, b))
    }

    /// Channels clamped to `0..=255`, for rendering on real displays.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let clamp = |c: u16| c.min(255) as u8;
        (clamp(self.r), clamp(self.g), clamp(self.b))
    }
}

impl From<[u16; 3]> for ColorTriple {
    fn from([r, g, b]: [u16; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<ColorTriple> for [u16; 3] {
    fn from(color: ColorTriple) -> Self {
        color.channels()
    }
}

impl fmt::Display for ColorTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.r, self.g, self.b)
    }
}
