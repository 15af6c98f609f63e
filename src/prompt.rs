//! Generation instruction building.

use crate::error::PaletteError;

/// Wrap a theme prompt in the instruction sent to the generation service.
///
/// The theme is embedded verbatim; JSON serialization of the request body is
/// the only escaping applied. An empty or whitespace-only theme is rejected
/// before any outbound call is made.
pub fn build_instruction(theme: &str) -> Result<String, PaletteError> {
    if theme.trim().is_empty() {
        return Err(PaletteError::MissingPrompt);
    }

    Ok(format!(
        "Generate three RGB colors based on the theme '{}'. \
         Give exactly three RGB colors in format [[R, G, B], [R, G, B], [R, G, B]]. \
         Return only the RGB values.",
        theme
    ))
}
