//! Error handling for maidr-rs
//!
//! Only wiring and configuration mistakes are errors. Boundaries, missing
//! data and failed searches are ordinary outcomes that end up as
//! notifications, so they never show up here.

use thiserror::Error;

/// Main error type for maidr-rs operations
#[derive(Error, Debug)]
pub enum MaidrError {
    /// A command name that does not exist was requested
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// An observer key that was never registered was looked up
    #[error("Unknown observer: {0}")]
    UnknownObserver(String),

    /// The chart description could not be turned into plot nodes
    #[error("Invalid chart: {0}")]
    InvalidChart(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<MaidrError>,
    },
}

impl MaidrError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        MaidrError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for maidr-rs operations
pub type Result<T> = std::result::Result<T, MaidrError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MaidrError::UnknownCommand("JUMP".to_string());
        assert_eq!(err.to_string(), "Unknown command: JUMP");
    }

    #[test]
    fn test_error_with_context() {
        let err = MaidrError::InvalidChart("empty layer".to_string());
        let with_ctx = err.with_context("Failed to load chart.json");
        assert!(with_ctx.to_string().contains("Failed to load chart.json"));
        assert!(with_ctx.to_string().contains("empty layer"));
    }

    #[test]
    fn test_result_ext_lazy_context() {
        let result: Result<()> = Err(MaidrError::Config("bad volume".to_string()));
        let err = result
            .with_context(|| format!("layer {}", 3))
            .unwrap_err();
        assert!(matches!(err, MaidrError::WithContext { .. }));
        assert_eq!(err.to_string(), "layer 3: Configuration error: bad volume");
    }
}
