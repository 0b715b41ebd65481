//! Non-fatal diagnostics collected while building scenes and driving sprites

use std::fmt;

/// A warning generated while resolving, rasterizing or animating.
///
/// Every warning is also emitted through `tracing` at the point it is
/// created, so hosts that install a subscriber see them in their logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Create a warning and log it.
    pub fn emit(message: impl Into<String>) -> Self {
        let warning = Self::new(message);
        tracing::warn!("{}", warning.message);
        warning
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
