//! webmuse - prompt-to-palette service
//!
//! A theme prompt goes to a text-generation service, the first three
//! `[R, G, B]` groups in its answer become seed colors, and an extension
//! service is asked to grow them into a full palette. If extension fails the
//! seeds are returned on their own.
//!
//! This library exposes modules for the binaries and integration tests.

pub mod adapters;
pub mod bridge;
pub mod client;
pub mod color;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod palette;
pub mod prompt;
pub mod server;
pub mod services;
pub mod traits;
