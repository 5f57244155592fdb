//! Error handling for the floating clock

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Login item error: {message}")]
    Login { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, AppError>;

/// Helper functions for creating specific error types
impl AppError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn login<S: Into<String>>(message: S) -> Self {
        Self::Login {
            message: message.into(),
        }
    }
}
