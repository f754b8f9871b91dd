//! Error types and handling for the bulletin generator
//!
//! Only fatal conditions live here. A section or list delimiter missing from
//! the provider reply is not an error; the parser substitutes fallback text.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a bulletin run
#[derive(Error, Debug)]
pub enum BulletinError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The provider credential could not be found
    #[error("Missing credential: set {variable} or provider.api_key")]
    MissingCredential { variable: String },

    /// Text-generation provider errors
    #[error("Provider error: {message}")]
    Provider {
        message: String,
        status: Option<u16>,
    },

    /// The report container was absent from the loaded page
    #[error("Render target not found: {selector}")]
    RenderTargetNotFound { selector: String },

    /// Headless browser failures other than a missing target
    #[error("Render error: {message}")]
    Render { message: String },

    /// Filesystem write failures
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BulletinError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn missing_credential<S: Into<String>>(variable: S) -> Self {
        Self::MissingCredential {
            variable: variable.into(),
        }
    }

    /// Create a provider error without an HTTP status (transport or decode failure)
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
            status: None,
        }
    }

    /// Create a provider error for a non-success HTTP response
    pub fn provider_status<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Provider {
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn render_target_not_found<S: Into<String>>(selector: S) -> Self {
        Self::RenderTargetNotFound {
            selector: selector.into(),
        }
    }

    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            BulletinError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            BulletinError::MissingCredential { variable } => {
                format!("No provider API key found. Export {variable} and try again.")
            }
            BulletinError::Provider { status: Some(code), .. } => {
                format!("The forecast provider rejected the request (HTTP {code}).")
            }
            BulletinError::Provider { .. } => {
                "Unable to reach the forecast provider. Please check your internet connection."
                    .to_string()
            }
            BulletinError::RenderTargetNotFound { selector } => {
                format!("The report container {selector} was not found in the rendered page.")
            }
            BulletinError::Render { .. } => {
                "Headless browser failed. Please check that Chromium is installed.".to_string()
            }
            BulletinError::Io { path, .. } => {
                format!("Could not write {}. Please check file permissions.", path.display())
            }
        }
    }

    /// Process exit status for this error
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            BulletinError::MissingCredential { .. } => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = BulletinError::config("bad viewport");
        assert!(matches!(config_err, BulletinError::Config { .. }));

        let provider_err = BulletinError::provider_status(401, "unauthorized");
        assert!(matches!(
            provider_err,
            BulletinError::Provider {
                status: Some(401),
                ..
            }
        ));

        let target_err = BulletinError::render_target_not_found("#weatherReportContainer");
        assert!(target_err.to_string().contains("#weatherReportContainer"));
    }

    #[test]
    fn test_user_messages() {
        let cred_err = BulletinError::missing_credential("OPENAI_API_KEY");
        assert!(cred_err.user_message().contains("OPENAI_API_KEY"));

        let provider_err = BulletinError::provider("connection refused");
        assert!(provider_err.user_message().contains("Unable to reach"));

        let status_err = BulletinError::provider_status(500, "boom");
        assert!(status_err.user_message().contains("HTTP 500"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BulletinError::missing_credential("X").exit_code(), 2);
        assert_eq!(BulletinError::render("crashed").exit_code(), 1);
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(BulletinError::io("/tmp/out", io_err).exit_code(), 1);
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = BulletinError::io("output/index.html", io_err);
        assert!(err.to_string().contains("output/index.html"));
    }
}
