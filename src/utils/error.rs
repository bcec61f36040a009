use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration field '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Unknown rate limit bucket: {bucket}")]
    UnknownBucket { bucket: String },

    #[error("Submission store error: {message}")]
    StoreError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    RateLimit,
    Store,
}

impl PlatformError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlatformError::IoError(_) | PlatformError::SerializationError(_) => ErrorCategory::Io,
            PlatformError::ConfigValidationError { .. }
            | PlatformError::InvalidConfigValueError { .. }
            | PlatformError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PlatformError::UnknownBucket { .. } => ErrorCategory::RateLimit,
            PlatformError::StoreError { .. } => ErrorCategory::Store,
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Io => 1,
            ErrorCategory::RateLimit | ErrorCategory::Store => 3,
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        PlatformError::StoreError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
