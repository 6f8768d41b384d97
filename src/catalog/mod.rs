//! Devfile registry catalog: candidate devfile types and the sample
//! repositories behind them.

mod mock;
mod registry;

pub use mock::MockCatalog;
pub use registry::{RegistryCatalog, RegistryIndexEntry};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("registry at {url} is unreachable: {message}")]
    Unreachable { url: String, message: String },

    #[error("registry index at {url} is malformed: {message}")]
    InvalidIndex { url: String, message: String },

    #[error("sample '{name}' is not listed in the registry")]
    UnknownSample { name: String },

    #[error("sample '{name}' does not declare a git repository")]
    NoRepository { name: String },
}

/// A registry sample as seen by language/framework matching
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevfileType {
    pub name: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DevfileType {
    pub fn new(name: &str, language: &str, project_type: &str, tags: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            language: language.to_string(),
            project_type: project_type.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Devfile registry lookups
#[async_trait]
pub trait DevfileCatalog: Send + Sync {
    /// Candidate devfile types, in registry order
    async fn devfile_types(&self, registry_url: &str) -> Result<Vec<DevfileType>, CatalogError>;

    /// Git repository URL backing the named sample
    async fn sample_repository(
        &self,
        sample: &str,
        registry_url: &str,
    ) -> Result<String, CatalogError>;
}
