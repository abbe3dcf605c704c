//! Error types for the whiskers_io crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Rkyv error: {0}")]
    Rkyv(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A stored cat failed the core's own checks.
    #[error("Invalid cat: {0}")]
    InvalidCat(#[from] whiskers_core::CatError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    #[must_use]
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    #[must_use]
    pub fn rkyv<S: Into<String>>(msg: S) -> Self {
        Self::Rkyv(msg.into())
    }

    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    #[must_use]
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound(resource.into())
    }

    #[must_use]
    pub fn compression<S: Into<String>>(msg: S) -> Self {
        Self::Compression(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            IoError::NotFound(_) => true,
            IoError::Context { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whiskers_core::CatError;

    #[test]
    fn test_error_display() {
        let err = IoError::serialization("bad bytes");
        assert_eq!(err.to_string(), "Serialization error: bad bytes");
    }

    #[test]
    fn test_error_context() {
        let err = IoError::not_found("house-cats").with_context("loading collection");
        assert!(err.to_string().contains("loading collection"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_cat_error() {
        let err: IoError = CatError::InvalidTrait {
            name: "energy",
            value: 4.0,
        }
        .into();
        assert!(matches!(err, IoError::InvalidCat(_)));
        assert!(err.to_string().contains("energy"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: IoError = io_err.into();
        assert!(matches!(err, IoError::FileSystem(_)));
    }
}
