//! Error types and exit codes for codeatlas

use thiserror::Error;

/// Main error type for codeatlas operations
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("No configuration found at {path}")]
    NoConfigFound { path: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Unsupported language for extension: {extension}")]
    UnsupportedLanguage { extension: String },

    #[error("Failed to parse file: {message}")]
    ParseFailure { message: String },

    #[error("Git error: {message}")]
    GitError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AtlasError {
    /// Process exit code contract:
    /// - 0: success
    /// - 1: failure with structured error
    /// - 2: configuration/setup problem
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoConfigFound { .. } | Self::InvalidConfig { .. } => 2,
            _ => 1,
        }
    }

    /// Machine-readable error code for the JSON error envelope
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::DirectoryNotFound { .. } => ErrorCode::DirectoryNotFound,
            Self::InvalidPath { .. } => ErrorCode::InvalidPath,
            Self::NoConfigFound { .. } | Self::InvalidConfig { .. } => ErrorCode::NoConfigFound,
            Self::UnsupportedLanguage { .. } | Self::ParseFailure { .. } => ErrorCode::ParseError,
            Self::GitError { .. } | Self::Io(_) => ErrorCode::UnknownError,
        }
    }
}

/// Error codes surfaced in JSON output
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    DirectoryNotFound,
    NoConfigFound,
    InvalidPath,
    ParseError,
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectoryNotFound => "DIRECTORY_NOT_FOUND",
            Self::NoConfigFound => "NO_CONFIG_FOUND",
            Self::InvalidPath => "INVALID_PATH",
            Self::ParseError => "PARSE_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

/// Result type alias for codeatlas operations
pub type Result<T> = std::result::Result<T, AtlasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let config_err = AtlasError::NoConfigFound {
            path: ".codeatlas.toml".to_string(),
        };
        assert_eq!(config_err.exit_code(), 2);

        let dir_err = AtlasError::DirectoryNotFound {
            path: "missing".to_string(),
        };
        assert_eq!(dir_err.exit_code(), 1);
    }

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::DirectoryNotFound.as_str(), "DIRECTORY_NOT_FOUND");
        assert_eq!(ErrorCode::ParseError.as_str(), "PARSE_ERROR");
        assert_eq!(ErrorCode::UnknownError.as_str(), "UNKNOWN_ERROR");
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::InvalidPath).unwrap();
        assert_eq!(json, "\"INVALID_PATH\"");
    }
}
