//! Error category classification.
//!
//! Categories drive the HTTP status returned to the caller and the
//! `category` field attached to error logs.

use std::fmt;

use tracing::Level;

/// High-level categorization of pipeline errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller sent something unusable (missing prompt, bad body).
    Input,

    /// The generation service failed or returned nothing usable.
    Upstream,

    /// The generation service answered, but not with three colors.
    /// Usually the model refused or misformatted its answer.
    Extraction,

    /// Anything unexpected inside the service itself.
    Internal,
}

impl ErrorCategory {
    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Upstream => "upstream",
            ErrorCategory::Extraction => "extraction",
            ErrorCategory::Internal => "internal",
        }
    }

    /// HTTP status code surfaced for errors in this category.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::Input => 400,
            ErrorCategory::Upstream | ErrorCategory::Extraction | ErrorCategory::Internal => 500,
        }
    }

    /// Level for the failure log line. Caller mistakes stay out of error logs.
    pub fn log_level(&self) -> Level {
        match self {
            ErrorCategory::Input => Level::WARN,
            ErrorCategory::Upstream | ErrorCategory::Extraction | ErrorCategory::Internal => {
                Level::ERROR
            }
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
