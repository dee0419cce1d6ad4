//! Centralized error handling for Quire
//!
//! One error type covers every failure that can reach the user: project
//! loading, stylesheet persistence, the external compiler and configuration.
//! Parsing CSS never fails and has no variant here. A dismissed folder picker
//! is `None`, not an error.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the application.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the application.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    /// Failed to read a file
    FileRead { path: PathBuf, source: io::Error },

    /// Failed to write file contents
    FileWrite { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Project Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The selected folder is not a usable book project
    ProjectInvalid { path: PathBuf, reason: String },

    /// An operation needs an open project but none is loaded
    NoProject,

    /// A typed selector cannot be written as a rule
    InvalidSelector { selector: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Compiler Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The compiler executable could not be found or started
    CompilerNotFound { program: String },

    /// The compiler ran and reported a failure (stderr kept verbatim)
    CompilerFailed { status: Option<i32>, stderr: String },

    /// The compiler exceeded the configured time limit and was killed
    CompilerTimedOut { seconds: u64 },

    /// The user cancelled a running compile
    CompilerCancelled,

    /// The stylesheet is held by a running compile
    StylesheetBusy,

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Application Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic application error with a message
    Application(String),
}

impl Error {
    /// Whether the caller should offer a manual compiler path and retry.
    pub fn is_compiler_not_found(&self) -> bool {
        matches!(self, Error::CompilerNotFound { .. })
    }
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Application(format!("File watcher error: {}", err))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // File I/O Errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileRead { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }

            // Project Errors
            Error::ProjectInvalid { path, reason } => {
                write!(f, "'{}' is not a book project: {}", path.display(), reason)
            }
            Error::NoProject => write!(f, "No project selected"),
            Error::InvalidSelector { selector } => {
                if selector.trim().is_empty() {
                    write!(f, "Enter a selector before applying the style")
                } else {
                    write!(f, "'{}' is not a usable CSS selector", selector.trim())
                }
            }

            // Compiler Errors
            Error::CompilerNotFound { program } => {
                write!(f, "Pandoc was not found (tried '{}')", program)
            }
            Error::CompilerFailed { status, stderr } => {
                let stderr = stderr.trim();
                match (status, stderr.is_empty()) {
                    (Some(code), true) => write!(f, "Pandoc exited with status {}", code),
                    (None, true) => write!(f, "Pandoc was terminated"),
                    (_, false) => write!(f, "{}", stderr),
                }
            }
            Error::CompilerTimedOut { seconds } => {
                write!(f, "Pandoc did not finish within {} seconds", seconds)
            }
            Error::CompilerCancelled => write!(f, "Compilation cancelled"),
            Error::StylesheetBusy => {
                write!(f, "The stylesheet is in use by a running compile")
            }

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }

            // Application Errors
            Error::Application(msg) => write!(f, "{}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::FileRead { source, .. } | Error::FileWrite { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::ProjectInvalid { .. }
            | Error::NoProject
            | Error::InvalidSelector { .. }
            | Error::CompilerNotFound { .. }
            | Error::CompilerFailed { .. }
            | Error::CompilerTimedOut { .. }
            | Error::CompilerCancelled
            | Error::StylesheetBusy
            | Error::ConfigDirNotFound
            | Error::Application(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_creation() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test error");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_result: std::result::Result<String, _> = serde_json::from_str("invalid json");
        let err = Error::from(json_result.unwrap_err());
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_display_project_invalid() {
        let err = Error::ProjectInvalid {
            path: PathBuf::from("/books/novel"),
            reason: "no .md files found in Chapters".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("novel"));
        assert!(msg.contains("no .md files"));
    }

    #[test]
    fn test_display_compiler_failed_is_verbatim_stderr() {
        let err = Error::CompilerFailed {
            status: Some(64),
            stderr: "pandoc: images/COVER.png: openBinaryFile: does not exist\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "pandoc: images/COVER.png: openBinaryFile: does not exist"
        );
    }

    #[test]
    fn test_display_compiler_failed_without_stderr() {
        let err = Error::CompilerFailed {
            status: Some(1),
            stderr: "  ".to_string(),
        };
        assert_eq!(err.to_string(), "Pandoc exited with status 1");
    }

    #[test]
    fn test_is_compiler_not_found() {
        let err = Error::CompilerNotFound {
            program: "pandoc".to_string(),
        };
        assert!(err.is_compiler_not_found());
        assert!(!Error::CompilerCancelled.is_compiler_not_found());
    }

    #[test]
    fn test_error_source_file_write() {
        use std::error::Error as StdError;
        let err = Error::FileWrite {
            path: PathBuf::from("/x.css"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_source_none_for_simple_variants() {
        use std::error::Error as StdError;
        assert!(Error::Application("test".to_string()).source().is_none());
        assert!(Error::ConfigDirNotFound.source().is_none());
        assert!(Error::CompilerCancelled.source().is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default_err() {
        let result: super::Result<i32> = Err(Error::NoProject);
        assert_eq!(result.unwrap_or_warn_default(7, "test context"), 7);
    }

    #[test]
    fn test_unwrap_or_warn_default_ok() {
        let result: super::Result<i32> = Ok(42);
        assert_eq!(result.unwrap_or_warn_default(0, "test context"), 42);
    }
}
