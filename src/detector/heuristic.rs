use super::languages::LANGUAGE_RULES;
use super::ports::PortScanner;
use super::selection::select_devfile_type;
use super::{ComponentDetector, DetectedComponent, DetectedLanguage, DetectorError};
use crate::catalog::DevfileType;
use async_trait::async_trait;
use ignore::WalkBuilder;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Languages at or above this share of source files can form a component
const MIN_COMPONENT_WEIGHT: f64 = 20.0;

const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".idea",
    ".vscode",
    ".venv",
    "venv",
    "__pycache__",
    "node_modules",
    "target",
    "vendor",
    "dist",
    "bin",
    "obj",
];

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub max_depth: usize,
    pub max_files: usize,
    pub max_file_size: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            max_files: 5000,
            max_file_size: 512 * 1024,
        }
    }
}

#[derive(Debug)]
struct Analysis {
    languages: Vec<DetectedLanguage>,
    ports: BTreeSet<u16>,
}

struct Analyzer {
    config: DetectorConfig,
    ports: PortScanner,
}

impl Analyzer {
    fn analyze(&self, root: &Path) -> Result<Analysis, DetectorError> {
        if !root.is_dir() {
            return Err(DetectorError::Analysis {
                path: root.to_path_buf(),
                message: "not a directory".to_string(),
            });
        }

        let mut counts: HashMap<&'static str, usize> = HashMap::new();
        let mut frameworks: HashMap<&'static str, Vec<String>> = HashMap::new();
        let mut source_files = 0usize;
        let mut files_seen = 0usize;
        let mut ports = BTreeSet::new();

        let walker = WalkBuilder::new(root)
            .max_depth(Some(self.config.max_depth))
            .hidden(false)
            .git_ignore(true)
            .require_git(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir || entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !EXCLUDED_DIRS.iter().any(|excluded| *excluded == name)
            })
            .build();

        for result in walker {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            if files_seen >= self.config.max_files {
                warn!(
                    path = %root.display(),
                    max_files = self.config.max_files,
                    "Reached file limit, stopping analysis"
                );
                break;
            }
            files_seen += 1;

            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();

            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if let Some(rule) = LANGUAGE_RULES.iter().find(|r| r.matches_extension(ext)) {
                    *counts.entry(rule.name).or_default() += 1;
                    source_files += 1;
                }
            }

            let is_root_config = entry.depth() == 1
                && LANGUAGE_RULES.iter().any(|r| r.matches_config_file(&name));
            if !is_root_config && !self.ports.is_candidate(&name) {
                continue;
            }

            let content = match self.read_small(path) {
                Some(c) => c,
                None => continue,
            };

            if is_root_config {
                for rule in LANGUAGE_RULES.iter().filter(|r| r.matches_config_file(&name)) {
                    let found = frameworks.entry(rule.name).or_default();
                    let lower = content.to_lowercase();
                    for (needle, framework) in rule.frameworks {
                        if lower.contains(needle) && !found.iter().any(|f| f == framework) {
                            found.push(framework.to_string());
                        }
                    }
                }
            }

            ports.extend(self.ports.scan(&name, &content));
        }

        let mut languages: Vec<DetectedLanguage> = LANGUAGE_RULES
            .iter()
            .filter_map(|rule| {
                let count = counts.get(rule.name).copied().unwrap_or(0);
                let detected_frameworks = frameworks.remove(rule.name);
                let from_config = detected_frameworks.is_some();
                if count == 0 && !from_config {
                    return None;
                }
                let weight = if source_files > 0 {
                    count as f64 * 100.0 / source_files as f64
                } else {
                    0.0
                };
                Some(DetectedLanguage {
                    name: rule.name.to_string(),
                    weight,
                    from_config,
                    can_be_component: from_config || weight >= MIN_COMPONENT_WEIGHT,
                    frameworks: detected_frameworks.unwrap_or_default(),
                })
            })
            .collect();

        languages.sort_by(|a, b| {
            b.from_config
                .cmp(&a.from_config)
                .then(b.weight.total_cmp(&a.weight))
                .then(a.name.cmp(&b.name))
        });

        debug!(
            path = %root.display(),
            files_seen,
            languages = ?languages.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
            ports = ?ports,
            "Analyzed component directory"
        );

        Ok(Analysis { languages, ports })
    }

    fn read_small(&self, path: &Path) -> Option<String> {
        let size = fs::metadata(path).ok()?.len();
        if size > self.config.max_file_size {
            return None;
        }
        fs::read_to_string(path).ok()
    }
}

/// File-system heuristics: extension statistics, well-known build files and
/// port patterns. Analysis runs on the blocking thread pool.
///
/// The analysis made by `detect_components` is kept for the next
/// `select_devfile_type` call on the same path, which consumes it.
pub struct HeuristicDetector {
    analyzer: Arc<Analyzer>,
    last: Mutex<Option<(PathBuf, Arc<Analysis>)>>,
}

impl HeuristicDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            analyzer: Arc::new(Analyzer {
                config,
                ports: PortScanner::new(),
            }),
            last: Mutex::new(None),
        }
    }

    async fn analyze(&self, path: &Path) -> Result<Arc<Analysis>, DetectorError> {
        let analyzer = Arc::clone(&self.analyzer);
        let owned: PathBuf = path.to_path_buf();
        let analysis = tokio::task::spawn_blocking(move || analyzer.analyze(&owned))
            .await
            .map_err(|e| DetectorError::Analysis {
                path: path.to_path_buf(),
                message: format!("analysis task failed: {}", e),
            })??;
        Ok(Arc::new(analysis))
    }

    fn remember(&self, path: &Path, analysis: &Arc<Analysis>) {
        if let Ok(mut last) = self.last.lock() {
            *last = Some((path.to_path_buf(), Arc::clone(analysis)));
        }
    }

    fn take_remembered(&self, path: &Path) -> Option<Arc<Analysis>> {
        let mut last = self.last.lock().ok()?;
        match last.take() {
            Some((cached, analysis)) if cached.as_path() == path => Some(analysis),
            other => {
                *last = other;
                None
            }
        }
    }
}

impl Default for HeuristicDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

#[async_trait]
impl ComponentDetector for HeuristicDetector {
    async fn detect_components(
        &self,
        path: &Path,
    ) -> Result<Vec<DetectedComponent>, DetectorError> {
        let analysis = self.analyze(path).await?;
        self.remember(path, &analysis);
        if analysis.languages.is_empty() {
            return Ok(Vec::new());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(vec![DetectedComponent {
            name,
            path: path.to_path_buf(),
            languages: analysis.languages.clone(),
            ports: analysis.ports.iter().copied().collect(),
        }])
    }

    async fn select_devfile_type(
        &self,
        path: &Path,
        types: &[DevfileType],
    ) -> Result<usize, DetectorError> {
        let analysis = match self.take_remembered(path) {
            Some(analysis) => analysis,
            None => self.analyze(path).await?,
        };
        select_devfile_type(&analysis.languages, types).ok_or_else(|| {
            DetectorError::NoMatch {
                path: path.to_path_buf(),
            }
        })
    }
}
