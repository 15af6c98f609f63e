//! Palette type and the prompt-to-palette pipeline.

mod orchestrator;
mod stage;

pub use orchestrator::PaletteOrchestrator;
pub use stage::PipelineStage;

use serde::{Deserialize, Serialize};

use crate::color::ColorTriple;
use crate::extract::SEED_COUNT;

/// Most colors a palette may hold: three seeds plus two inferred slots.
pub const MAX_PALETTE_LEN: usize = SEED_COUNT + crate::services::extension::INFERRED_SLOTS;

/// Final answer delivered to the caller: 3 to 5 colors in order.
///
/// Serializes as a bare array of `[r, g, b]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<ColorTriple>);

impl Palette {
    /// The three extracted seeds, unchanged.
    pub fn from_seeds(seeds: [ColorTriple; SEED_COUNT]) -> Self {
        Self(seeds.to_vec())
    }

    /// Accept an extension result if its length fits `SEED_COUNT..=MAX_PALETTE_LEN`.
    pub fn from_extension(colors: Vec<ColorTriple>) -> Option<Self> {
        (SEED_COUNT..=MAX_PALETTE_LEN)
            .contains(&colors.len())
            .then_some(Self(colors))
    }

    pub fn colors(&self) -> &[ColorTriple] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_colors(self) -> Vec<ColorTriple> {
        self.0
    }
}

/// Where the final palette came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteSource {
    /// The extension service's answer, used as-is.
    Extended,
    /// The three seeds, because extension produced nothing usable.
    Seeds,
}

impl PaletteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteSource::Extended => "extended",
            PaletteSource::Seeds => "seeds",
        }
    }
}

/// Successful pipeline result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteOutcome {
    pub palette: Palette,
    pub source: PaletteSource,
}
