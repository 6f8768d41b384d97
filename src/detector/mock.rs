use super::{ComponentDetector, DetectedComponent, DetectedLanguage, DetectorError};
use crate::catalog::DevfileType;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned detection results keyed by directory name
#[derive(Default)]
pub struct MockDetector {
    components: HashMap<String, (Vec<String>, Vec<u16>)>,
    selections: HashMap<String, String>,
    failures: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MockDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `dir` as a component written in `language`
    pub fn with_component(mut self, dir: &str, language: &str, ports: &[u16]) -> Self {
        self.components.insert(
            dir.to_string(),
            (vec![language.to_string()], ports.to_vec()),
        );
        self
    }

    /// Devfile type name to pick for `dir`
    pub fn with_selection(mut self, dir: &str, type_name: &str) -> Self {
        self.selections
            .insert(dir.to_string(), type_name.to_string());
        self
    }

    pub fn with_error(mut self, dir: &str, message: &str) -> Self {
        self.failures.insert(dir.to_string(), message.to_string());
        self
    }

    /// Total number of trait calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn key(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    fn check(&self, path: &Path) -> Result<String, DetectorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = Self::key(path);
        match self.failures.get(&key) {
            Some(message) => Err(DetectorError::Analysis {
                path: path.to_path_buf(),
                message: message.clone(),
            }),
            None => Ok(key),
        }
    }
}

#[async_trait]
impl ComponentDetector for MockDetector {
    async fn detect_components(
        &self,
        path: &Path,
    ) -> Result<Vec<DetectedComponent>, DetectorError> {
        let key = self.check(path)?;
        let Some((languages, ports)) = self.components.get(&key) else {
            return Ok(Vec::new());
        };

        Ok(vec![DetectedComponent {
            name: key.clone(),
            path: path.to_path_buf(),
            languages: languages
                .iter()
                .map(|name| DetectedLanguage {
                    name: name.clone(),
                    weight: 100.0,
                    from_config: true,
                    can_be_component: true,
                    frameworks: Vec::new(),
                })
                .collect(),
            ports: ports.clone(),
        }])
    }

    async fn select_devfile_type(
        &self,
        path: &Path,
        types: &[DevfileType],
    ) -> Result<usize, DetectorError> {
        let key = self.check(path)?;
        self.selections
            .get(&key)
            .and_then(|name| types.iter().position(|t| &t.name == name))
            .ok_or_else(|| DetectorError::NoMatch {
                path: path.to_path_buf(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_results() {
        let detector = MockDetector::new()
            .with_component("api", "Go", &[8080])
            .with_selection("api", "go-basic")
            .with_error("broken", "disk on fire");

        let types = vec![
            DevfileType::new("python-basic", "Python", "Python", &[]),
            DevfileType::new("go-basic", "Go", "Go", &[]),
        ];

        let components = detector.detect_components(Path::new("/repo/api")).await.unwrap();
        assert_eq!(components[0].ports, vec![8080]);
        assert!(components[0].can_be_component());

        assert_eq!(
            detector
                .select_devfile_type(Path::new("/repo/api"), &types)
                .await
                .unwrap(),
            1
        );
        assert!(detector
            .detect_components(Path::new("/repo/docs"))
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            detector.select_devfile_type(Path::new("/repo/docs"), &types).await,
            Err(DetectorError::NoMatch { .. })
        ));
        assert!(matches!(
            detector.detect_components(Path::new("/repo/broken")).await,
            Err(DetectorError::Analysis { .. })
        ));
        assert_eq!(detector.calls(), 5);
    }
}
