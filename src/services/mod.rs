//! Outbound service clients.
//!
//! - [`GenerationClient`] - strict: every failure is an error
//! - [`ExtensionClient`] - best-effort: every failure is `None`

pub mod extension;
pub mod generation;

pub use extension::{ExtensionClient, ExtensionError, ExtensionRequest, SeedSlot};
pub use generation::{GenerationClient, GenerationError, GenerationRequest, GenerationResponse};
