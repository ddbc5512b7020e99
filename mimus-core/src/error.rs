//! Error types for mimus

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Core error type for mimus operations
#[derive(Error, Debug)]
pub enum MimusError {
    /// The requested feature exists on the command line but has no behavior yet
    #[error("not implemented")]
    NotImplemented,

    /// Configuration loading or validation failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A config file could not be read
    #[error("Cannot read config file: {source} (file: {})", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for mimus operations
pub type Result<T> = std::result::Result<T, MimusError>;

/// A configuration problem, optionally tied to the file it came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}{}", file_suffix(.file))]
pub struct ConfigError {
    /// Human-readable description of the problem
    pub reason: String,
    /// File the offending definition was read from, if any
    pub file: Option<PathBuf>,
}

impl ConfigError {
    /// Create an error that is not attributed to any file.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            file: None,
        }
    }

    /// Attribute the error to a file. `None` leaves it unattributed.
    pub fn in_file(mut self, file: Option<&Path>) -> Self {
        self.file = file.map(Path::to_path_buf);
        self
    }
}

fn file_suffix(file: &Option<PathBuf>) -> String {
    match file {
        Some(path) => format!(" (file: {})", path.display()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_implemented_display() {
        assert_eq!(MimusError::NotImplemented.to_string(), "not implemented");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::new("name should be a non-empty string");
        assert_eq!(err.to_string(), "name should be a non-empty string");

        let err = ConfigError::new("Unsupported config version 3")
            .in_file(Some(Path::new("/srv/mimus.yml")));
        assert_eq!(
            err.to_string(),
            "Unsupported config version 3 (file: /srv/mimus.yml)"
        );
    }

    #[test]
    fn test_config_error_conversion_is_transparent() {
        let err: MimusError = ConfigError::new("Duplicate service name 'api' found").into();

        match &err {
            MimusError::Config(inner) => assert!(inner.file.is_none()),
            _ => panic!("Expected Config error"),
        }
        assert_eq!(err.to_string(), "Duplicate service name 'api' found");
    }

    #[test]
    fn test_io_error_display() {
        let err = MimusError::Io {
            path: PathBuf::from("mimus.yml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        assert_eq!(
            err.to_string(),
            "Cannot read config file: file not found (file: mimus.yml)"
        );
    }
}
