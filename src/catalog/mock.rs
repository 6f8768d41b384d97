use super::{CatalogError, DevfileCatalog, DevfileType};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory registry with an optional "offline" switch
#[derive(Default)]
pub struct MockCatalog {
    types: Vec<DevfileType>,
    repositories: HashMap<String, String>,
    offline: AtomicBool,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample(mut self, devfile_type: DevfileType, repository: impl Into<String>) -> Self {
        self.repositories
            .insert(devfile_type.name.clone(), repository.into());
        self.types.push(devfile_type);
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self, registry_url: &str) -> Result<(), CatalogError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CatalogError::Unreachable {
                url: registry_url.to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DevfileCatalog for MockCatalog {
    async fn devfile_types(&self, registry_url: &str) -> Result<Vec<DevfileType>, CatalogError> {
        self.check_online(registry_url)?;
        Ok(self.types.clone())
    }

    async fn sample_repository(
        &self,
        sample: &str,
        registry_url: &str,
    ) -> Result<String, CatalogError> {
        self.check_online(registry_url)?;
        self.repositories
            .get(sample)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownSample {
                name: sample.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup() {
        let catalog = MockCatalog::new().with_sample(
            DevfileType::new("python-basic", "Python", "Python", &["Python", "Pip"]),
            "https://github.com/devfile-samples/devfile-sample-python-basic",
        );

        let types = catalog.devfile_types("https://registry").await.unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(
            catalog
                .sample_repository("python-basic", "https://registry")
                .await
                .unwrap(),
            "https://github.com/devfile-samples/devfile-sample-python-basic"
        );
        assert!(matches!(
            catalog.sample_repository("go-basic", "https://registry").await,
            Err(CatalogError::UnknownSample { .. })
        ));
    }

    #[tokio::test]
    async fn test_offline() {
        let catalog = MockCatalog::new();
        catalog.set_offline(true);
        assert!(matches!(
            catalog.devfile_types("https://registry").await,
            Err(CatalogError::Unreachable { .. })
        ));
    }
}
