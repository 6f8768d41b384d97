//! Error taxonomy for repository content resolution
//!
//! Every variant except [`ScanError::NoDevfileFound`] aborts the whole scan.
//! `NoDevfileFound` is handled inside the engine and only means that one
//! component context ends up without a synthesized devfile.

use crate::catalog::CatalogError;
use crate::detector::DetectorError;
use crate::devfile::DevfileError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// A directory or file under the scan root could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The repository URL cannot be turned into a hosted file link
    #[error("Invalid source URL '{url}': {reason}")]
    InvalidSourceUrl { url: String, reason: String },

    /// A devfile was found but could not be parsed
    #[error("Invalid devfile at {location}: {source}")]
    InvalidDevfile {
        location: String,
        #[source]
        source: DevfileError,
    },

    /// The devfile registry could not answer a lookup
    #[error("Devfile registry lookup failed at {registry}: {source}")]
    CatalogLookupFailed {
        registry: String,
        #[source]
        source: CatalogError,
    },

    /// No devfile could be matched for a component
    #[error("No devfile found for {}", location.display())]
    NoDevfileFound { location: PathBuf },

    /// The language detector failed for a reason other than "no match"
    #[error("Component detection failed for {}: {source}", location.display())]
    Detector {
        location: PathBuf,
        #[source]
        source: DetectorError,
    },

    /// The scan request itself is unusable
    #[error("Invalid scan request: {0}")]
    InvalidRequest(String),

    /// The caller cancelled the scan
    #[error("Scan cancelled")]
    Cancelled,
}

impl ScanError {
    pub fn io(path: impl Into<PathBuf>, source: anyhow::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error terminates the whole multi-component scan
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ScanError::NoDevfileFound { .. })
    }

    /// Returns a user-friendly error message with troubleshooting hints
    pub fn help_message(&self) -> String {
        match self {
            ScanError::Io { path, source } => format!(
                "Error: Unable to read repository content\nPath: {}\n\n\
                Help: The scan stops at the first unreadable directory. Please check:\n\
                - Does the path exist?\n\
                - Do you have permission to read it?\n\n\
                Details: {:#}",
                path.display(),
                source
            ),
            ScanError::InvalidSourceUrl { url, reason } => format!(
                "Error: Invalid source URL\nURL: {}\n\n\
                Help: Provide the repository URL as https://<host>/<owner>/<repo>\n\
                (for example --source-url https://github.com/org/repo).\n\n\
                Details: {}",
                url, reason
            ),
            ScanError::InvalidDevfile { location, source } => format!(
                "Error: Invalid devfile\nLocation: {}\n\n\
                Help: One broken devfile invalidates the whole repository scan.\n\
                Fix or remove the devfile and scan again.\n\n\
                Details: {}",
                location, source
            ),
            ScanError::CatalogLookupFailed { registry, source } => format!(
                "Error: Devfile registry lookup failed\nRegistry: {}\n\n\
                Help: Try:\n\
                - Check network connectivity\n\
                - Check the registry URL (--registry or DEVSCOUT_REGISTRY_URL)\n\n\
                Details: {}",
                registry, source
            ),
            ScanError::Detector { location, source } => format!(
                "Error: Component detection failed\nPath: {}\n\n\
                Details: {}",
                location.display(),
                source
            ),
            ScanError::NoDevfileFound { .. }
            | ScanError::InvalidRequest(_)
            | ScanError::Cancelled => format!("Error: {}", self),
        }
    }
}
