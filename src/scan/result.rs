use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestOrigin {
    /// Found in the scanned repository
    Repository,
    /// Synthesized from a registry sample
    Catalog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    pub context: String,
    pub bytes: Option<Vec<u8>>,
    pub url: Option<String>,
    pub origin: ManifestOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum BuildFileLocation {
    /// Relative to the context directory, resolved later by the build
    Relative(String),
    Url(String),
}

impl BuildFileLocation {
    pub fn as_str(&self) -> &str {
        match self {
            BuildFileLocation::Relative(path) => path,
            BuildFileLocation::Url(url) => url,
        }
    }
}

impl fmt::Display for BuildFileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFileRecord {
    pub context: String,
    pub location: BuildFileLocation,
}

/// Ports detected for a context. Never empty: no entry means "unknown".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSet {
    pub context: String,
    pub ports: BTreeSet<u16>,
}

impl PortSet {
    pub fn new(context: &str, ports: impl IntoIterator<Item = u16>) -> Option<Self> {
        let ports: BTreeSet<u16> = ports.into_iter().collect();
        if ports.is_empty() {
            None
        } else {
            Some(Self {
                context: context.to_string(),
                ports,
            })
        }
    }
}

/// Everything decided for one component context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextOutcome {
    pub context: String,
    pub manifest: Option<ManifestRecord>,
    pub build_file: Option<BuildFileRecord>,
    pub ports: Option<PortSet>,
}

impl ContextOutcome {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            manifest: None,
            build_file: None,
            ports: None,
        }
    }

    pub fn set_manifest(
        &mut self,
        bytes: Option<Vec<u8>>,
        url: Option<String>,
        origin: ManifestOrigin,
    ) {
        self.manifest = Some(ManifestRecord {
            context: self.context.clone(),
            bytes,
            url,
            origin,
        });
    }

    pub fn set_build_file(&mut self, location: BuildFileLocation) {
        self.build_file = Some(BuildFileRecord {
            context: self.context.clone(),
            location,
        });
    }

    pub fn set_ports(&mut self, ports: impl IntoIterator<Item = u16>) {
        if let Some(set) = PortSet::new(&self.context, ports) {
            self.ports = Some(set);
        }
    }

    pub fn has_manifest(&self) -> bool {
        self.manifest.is_some()
    }

    /// A devfile found in the repository is authoritative: a Dockerfile found
    /// next to it is dropped, the devfile has to reference it itself.
    pub fn apply_manifest_precedence(&mut self) {
        let repository_manifest = matches!(
            &self.manifest,
            Some(ManifestRecord { origin: ManifestOrigin::Repository, .. })
        );
        if repository_manifest && self.build_file.take().is_some() {
            debug!(context = %self.context, "Dropping Dockerfile next to repository devfile");
        }
    }
}

/// The four per-context mappings a scan produces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub devfiles: BTreeMap<String, Vec<u8>>,
    pub devfile_urls: BTreeMap<String, String>,
    pub dockerfiles: BTreeMap<String, String>,
    pub ports: BTreeMap<String, BTreeSet<u16>>,
}

impl ScanResult {
    /// No devfile bytes, devfile links or Dockerfiles were found
    pub fn is_empty(&self) -> bool {
        self.devfiles.is_empty() && self.devfile_urls.is_empty() && self.dockerfiles.is_empty()
    }

    /// Every context that has at least one entry
    pub fn contexts(&self) -> BTreeSet<&str> {
        self.devfiles
            .keys()
            .chain(self.devfile_urls.keys())
            .chain(self.dockerfiles.keys())
            .chain(self.ports.keys())
            .map(String::as_str)
            .collect()
    }

    pub(crate) fn record(&mut self, outcome: ContextOutcome) {
        if let Some(manifest) = outcome.manifest {
            if let Some(bytes) = manifest.bytes {
                self.devfiles.insert(manifest.context.clone(), bytes);
            }
            if let Some(url) = manifest.url {
                self.devfile_urls.insert(manifest.context, url);
            }
        }
        if let Some(build_file) = outcome.build_file {
            self.dockerfiles
                .insert(build_file.context, build_file.location.as_str().to_string());
        }
        if let Some(ports) = outcome.ports {
            self.ports.insert(ports.context, ports.ports);
        }
    }

    pub(crate) fn finish(self, root: &Path) -> Self {
        if self.is_empty() {
            info!(
                path = %root.display(),
                "No devfile or Dockerfile found in the specified location"
            );
        } else {
            info!(
                path = %root.display(),
                devfiles = self.devfile_urls.len().max(self.devfiles.len()),
                dockerfiles = self.dockerfiles.len(),
                "Scan complete"
            );
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ports_are_not_recorded() {
        assert!(PortSet::new("api", Vec::new()).is_none());

        let mut outcome = ContextOutcome::new("api");
        outcome.set_ports(vec![]);
        assert!(outcome.ports.is_none());

        outcome.set_ports(vec![9090, 8080, 8080]);
        let ports: Vec<u16> = outcome.ports.unwrap().ports.into_iter().collect();
        assert_eq!(ports, vec![8080, 9090]);
    }

    #[test]
    fn test_repository_devfile_drops_dockerfile() {
        let mut outcome = ContextOutcome::new("api");
        outcome.set_build_file(BuildFileLocation::Relative("Dockerfile".to_string()));
        outcome.set_manifest(
            Some(b"schemaVersion: 2.2.0".to_vec()),
            None,
            ManifestOrigin::Repository,
        );
        outcome.apply_manifest_precedence();
        assert!(outcome.build_file.is_none());
    }

    #[test]
    fn test_catalog_devfile_keeps_dockerfile() {
        let mut outcome = ContextOutcome::new("api");
        outcome.set_manifest(
            None,
            Some("https://x/devfile.yaml".to_string()),
            ManifestOrigin::Catalog,
        );
        outcome.set_build_file(BuildFileLocation::Url("https://x/Dockerfile".to_string()));
        outcome.apply_manifest_precedence();
        assert!(outcome.build_file.is_some());
    }

    #[test]
    fn test_record_and_contexts() {
        let mut result = ScanResult::default();
        assert!(result.is_empty());

        let mut api = ContextOutcome::new("api");
        api.set_manifest(
            Some(b"a".to_vec()),
            Some("https://x/api/devfile.yaml".to_string()),
            ManifestOrigin::Repository,
        );
        result.record(api);

        let mut web = ContextOutcome::new("web");
        web.set_build_file(BuildFileLocation::Relative("docker/Dockerfile".to_string()));
        web.set_ports(vec![3000]);
        result.record(web);

        result.record(ContextOutcome::new("docs"));

        assert!(!result.is_empty());
        assert_eq!(result.dockerfiles["web"], "docker/Dockerfile");
        assert_eq!(result.contexts().into_iter().collect::<Vec<_>>(), vec!["api", "web"]);
    }

    #[test]
    fn test_ports_alone_do_not_count_as_found() {
        let mut result = ScanResult::default();
        result.ports.insert("api".to_string(), BTreeSet::from([8080]));
        assert!(result.is_empty());
    }
}
