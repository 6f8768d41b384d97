use super::{CatalogError, DevfileCatalog, DevfileType};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

const SAMPLE_INDEX_PATH: &str = "index/sample";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryIndexEntry {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub git: Option<GitSource>,
    #[serde(default)]
    pub versions: Vec<SampleVersion>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitSource {
    #[serde(default)]
    pub remotes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SampleVersion {
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub git: Option<GitSource>,
}

impl RegistryIndexEntry {
    /// `origin` if present, otherwise the first remote by name. Entries
    /// without a top-level `git` fall back to the default version's remotes.
    pub fn repository(&self) -> Option<&str> {
        let git = self.git.as_ref().or_else(|| {
            self.versions
                .iter()
                .find(|v| v.default)
                .or_else(|| self.versions.first())
                .and_then(|v| v.git.as_ref())
        })?;

        git.remotes
            .get("origin")
            .or_else(|| git.remotes.values().next())
            .map(String::as_str)
    }

    fn to_devfile_type(&self) -> DevfileType {
        DevfileType {
            name: self.name.clone(),
            language: self.language.clone(),
            project_type: self.project_type.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Catalog backed by a devfile registry's sample index
pub struct RegistryCatalog {
    client: reqwest::Client,
}

impl RegistryCatalog {
    pub fn new(timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Unreachable {
                url: String::new(),
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    pub fn index_url(registry_url: &str) -> String {
        format!("{}/{}", registry_url.trim_end_matches('/'), SAMPLE_INDEX_PATH)
    }

    pub async fn sample_index(
        &self,
        registry_url: &str,
    ) -> Result<Vec<RegistryIndexEntry>, CatalogError> {
        let url = Self::index_url(registry_url);
        let unreachable = |message: String| CatalogError::Unreachable {
            url: url.clone(),
            message,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unreachable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(unreachable(format!("HTTP {}", response.status())));
        }

        let entries: Vec<RegistryIndexEntry> =
            response
                .json()
                .await
                .map_err(|e| CatalogError::InvalidIndex {
                    url: url.clone(),
                    message: e.to_string(),
                })?;

        debug!(url = %url, samples = entries.len(), "Fetched registry sample index");
        Ok(entries)
    }
}

#[async_trait]
impl DevfileCatalog for RegistryCatalog {
    async fn devfile_types(&self, registry_url: &str) -> Result<Vec<DevfileType>, CatalogError> {
        let index = self.sample_index(registry_url).await?;
        Ok(index.iter().map(RegistryIndexEntry::to_devfile_type).collect())
    }

    async fn sample_repository(
        &self,
        sample: &str,
        registry_url: &str,
    ) -> Result<String, CatalogError> {
        let index = self.sample_index(registry_url).await?;
        let entry = index
            .iter()
            .find(|entry| entry.name == sample)
            .ok_or_else(|| CatalogError::UnknownSample {
                name: sample.to_string(),
            })?;

        entry
            .repository()
            .map(str::to_string)
            .ok_or_else(|| CatalogError::NoRepository {
                name: sample.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"[
      {
        "name": "nodejs-basic",
        "displayName": "Basic Node.js",
        "type": "sample",
        "tags": ["NodeJS", "Express"],
        "projectType": "Node.js",
        "language": "JavaScript",
        "git": {"remotes": {"origin": "https://github.com/nodeshift-starters/devfile-sample.git"}}
      },
      {
        "name": "java-springboot-basic",
        "language": "Java",
        "projectType": "springboot",
        "tags": ["Java", "Spring"],
        "versions": [
          {"version": "1.0.0", "git": {"remotes": {"origin": "https://github.com/old/springboot"}}},
          {"version": "2.0.0", "default": true, "git": {"remotes": {"upstream": "https://github.com/devfile-samples/devfile-sample-java-springboot-basic"}}}
        ]
      },
      {"name": "no-git", "language": "Go"}
    ]"#;

    fn index() -> Vec<RegistryIndexEntry> {
        serde_json::from_str(INDEX).unwrap()
    }

    #[test]
    fn test_index_url() {
        assert_eq!(
            RegistryCatalog::index_url("https://registry.devfile.io/"),
            "https://registry.devfile.io/index/sample"
        );
    }

    #[test]
    fn test_repository_prefers_origin() {
        let index = index();
        assert_eq!(
            index[0].repository(),
            Some("https://github.com/nodeshift-starters/devfile-sample.git")
        );
    }

    #[test]
    fn test_repository_from_default_version() {
        let index = index();
        assert_eq!(
            index[1].repository(),
            Some("https://github.com/devfile-samples/devfile-sample-java-springboot-basic")
        );
    }

    #[test]
    fn test_repository_missing() {
        assert_eq!(index()[2].repository(), None);
    }

    #[test]
    fn test_devfile_type_conversion() {
        let types: Vec<DevfileType> = index()
            .iter()
            .map(RegistryIndexEntry::to_devfile_type)
            .collect();
        assert_eq!(
            types[0],
            DevfileType::new("nodejs-basic", "JavaScript", "Node.js", &["NodeJS", "Express"])
        );
        assert_eq!(types[2].project_type, "");
    }

    #[tokio::test]
    async fn test_unreachable_registry() {
        let catalog = RegistryCatalog::new(Duration::from_secs(2)).unwrap();
        let result = catalog.devfile_types("http://127.0.0.1:1").await;
        assert!(matches!(result, Err(CatalogError::Unreachable { .. })));
    }
}
