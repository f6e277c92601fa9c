//! Error types for vf-jinja

use thiserror::Error;

/// Jinja templating errors
#[derive(Error, Debug)]
pub enum JinjaError {
    /// Template render error (J001)
    #[error("[J001] Jinja render error: {0}")]
    RenderError(String),

    /// Template syntax error (J002)
    #[error("[J002] Template syntax error: {0}")]
    SyntaxError(String),
}

/// Result type alias for JinjaError
pub type JinjaResult<T> = Result<T, JinjaError>;

impl From<minijinja::Error> for JinjaError {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::SyntaxError => JinjaError::SyntaxError(err.to_string()),
            _ => JinjaError::RenderError(err.to_string()),
        }
    }
}
