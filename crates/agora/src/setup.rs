//! Error types for engine setup.

use thiserror::Error;

/// Errors raised while assembling an [`Engine`](crate::Engine).
#[derive(Debug, Error)]
pub enum SetupError {
    /// A setting has an unusable shape or value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Two constructors were registered under the same controller id.
    #[error("duplicate controller: {0}")]
    DuplicateController(String),

    /// Reading a settings file failed.
    #[error("settings I/O error")]
    Io(#[from] std::io::Error),

    /// A settings document failed to parse.
    #[error("settings parse error")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_display() {
        let err = SetupError::Config("front_page must name a controller".into());
        assert_eq!(
            err.to_string(),
            "configuration error: front_page must name a controller"
        );

        let err = SetupError::DuplicateController("Post_Controller".into());
        assert_eq!(err.to_string(), "duplicate controller: Post_Controller");
    }
}
