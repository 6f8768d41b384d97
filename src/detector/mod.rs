//! Language, framework and port detection for component directories

mod heuristic;
mod languages;
mod mock;
mod ports;
mod selection;

pub use heuristic::{DetectorConfig, HeuristicDetector};
pub use languages::{LanguageRule, LANGUAGE_RULES};
pub use mock::MockDetector;
pub use ports::PortScanner;
pub use selection::select_devfile_type;

use crate::catalog::DevfileType;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("no valid devfile type found for project in {}", path.display())]
    NoMatch { path: PathBuf },

    #[error("failed to analyze {}: {message}", path.display())]
    Analysis { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    pub name: String,
    /// Share of recognized source files, 0.0 to 100.0
    pub weight: f64,
    /// Detected through a build/config file rather than file statistics
    pub from_config: bool,
    pub can_be_component: bool,
    pub frameworks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedComponent {
    pub name: String,
    pub path: PathBuf,
    /// Most relevant language first
    pub languages: Vec<DetectedLanguage>,
    /// Ascending, without duplicates
    pub ports: Vec<u16>,
}

impl DetectedComponent {
    pub fn can_be_component(&self) -> bool {
        self.languages.iter().any(|l| l.can_be_component)
    }
}

/// Heuristic component classifier
#[async_trait]
pub trait ComponentDetector: Send + Sync {
    /// Components rooted at `path`; empty when no language is recognized
    async fn detect_components(&self, path: &Path) -> Result<Vec<DetectedComponent>, DetectorError>;

    /// Index into `types` of the best matching devfile type
    async fn select_devfile_type(
        &self,
        path: &Path,
        types: &[DevfileType],
    ) -> Result<usize, DetectorError>;
}
