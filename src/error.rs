//! Error types for a sweep run

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    /// Drive answered with a non-success status
    #[error("Google Drive API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failure or undecodable response body
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The client secret is needed for the consent flow but could not be read
    #[error("Could not read client secret {}: {source}", path.display())]
    ClientSecret {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("OAuth error: {0}")]
    OAuth(#[from] yup_oauth2::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SweepError {
    /// Errors raised by the remote provider. These end a run with a single
    /// `Error:` line instead of propagating out of `main`.
    pub fn is_provider_error(&self) -> bool {
        matches!(self, SweepError::Api { .. } | SweepError::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;
