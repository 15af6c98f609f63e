//! Error handling for the palette pipeline.
//!
//! - **Error Categories**: classification that drives status codes and log fields
//! - **Pipeline Error**: `PaletteError`, the bounded set of failures a caller can see
//!
//! | Category | Status | Example |
//! |----------|--------|---------|
//! | Input | 400 | Missing prompt |
//! | Upstream | 500 | Generation service down, empty answer |
//! | Extraction | 500 | Model answered without three RGB groups |
//! | Internal | 500 | Panic inside a handler |
//!
//! Extension-service failures never appear here; they degrade the palette
//! to its seed colors instead.

mod category;
mod palette;

pub use category::ErrorCategory;
pub use palette::{excerpt, PaletteError, INTERNAL_ERROR_MESSAGE};

/// Result alias for pipeline operations.
pub type PaletteResult<T> = Result<T, PaletteError>;
