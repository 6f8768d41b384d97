//! Per-context resolution: validate on-disk devfiles, look for a Dockerfile
//! reference inside them and fall back to registry matching when the
//! context still has no usable Dockerfile.

use super::layout::{context_file, ContextLayout};
use super::request::ScanRequest;
use super::result::{BuildFileLocation, ContextOutcome, ManifestOrigin};
use crate::catalog::{DevfileCatalog, DevfileType};
use crate::detector::{ComponentDetector, DetectorError};
use crate::devfile::{
    find_dockerfile_reference, is_ignore_sentinel, Devfile, DevfileParser, DevfileSource,
    DEFAULT_DEVFILE,
};
use crate::error::ScanError;
use crate::git::raw_file_url;
use std::path::Path;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Dockerfile name assumed in a registry sample whose devfile names none
const DEFAULT_DOCKERFILE: &str = "Dockerfile";

/// A registry sample matched for a context
#[derive(Debug)]
struct CatalogMatch {
    devfile_bytes: Vec<u8>,
    devfile_url: String,
    dockerfile_url: String,
    ports: Vec<u16>,
}

pub(crate) struct ContextResolver<'a> {
    parser: &'a dyn DevfileParser,
    detector: &'a dyn ComponentDetector,
    catalog: &'a dyn DevfileCatalog,
    request: &'a ScanRequest,
    devfile_types: OnceCell<Vec<DevfileType>>,
}

impl<'a> ContextResolver<'a> {
    pub fn new(
        parser: &'a dyn DevfileParser,
        detector: &'a dyn ComponentDetector,
        catalog: &'a dyn DevfileCatalog,
        request: &'a ScanRequest,
    ) -> Self {
        Self {
            parser,
            detector,
            catalog,
            request,
            devfile_types: OnceCell::new(),
        }
    }

    pub async fn resolve(&self, layout: &ContextLayout) -> Result<ContextOutcome, ScanError> {
        let mut outcome = ContextOutcome::new(layout.context.clone());

        let devfile = self.validate_devfiles(layout, &mut outcome).await?;

        if let Some(dockerfile) = &layout.dockerfile {
            outcome.set_build_file(BuildFileLocation::Relative(dockerfile.clone()));
        }
        outcome.apply_manifest_precedence();

        let mut has_dockerfile = outcome.build_file.is_some();
        if let Some(reference) = devfile.as_ref().and_then(find_dockerfile_reference) {
            if reference.is_absolute() {
                outcome.set_build_file(BuildFileLocation::Url(reference.uri().to_string()));
            }
            has_dockerfile = true;
        }

        if !has_dockerfile {
            match self.match_catalog(&layout.path).await {
                Ok(found) => {
                    if !outcome.has_manifest() {
                        outcome.set_manifest(
                            Some(found.devfile_bytes),
                            Some(found.devfile_url),
                            ManifestOrigin::Catalog,
                        );
                    }
                    outcome.set_build_file(BuildFileLocation::Url(found.dockerfile_url));
                    outcome.set_ports(found.ports);
                }
                Err(err) if !err.is_fatal() => {
                    info!(context = %layout.context, "{}", err);
                }
                Err(err) => return Err(err),
            }
        } else if !outcome.has_manifest() {
            self.harvest_ports(&layout.path, &mut outcome).await;
        }

        Ok(outcome)
    }

    /// Parses every on-disk devfile in listing order; the last one that is
    /// not an ignore sentinel becomes the context's manifest. Any parse
    /// failure is fatal.
    async fn validate_devfiles(
        &self,
        layout: &ContextLayout,
        outcome: &mut ContextOutcome,
    ) -> Result<Option<Devfile>, ScanError> {
        let mut chosen = None;

        for candidate in &layout.devfiles {
            let location = context_file(&layout.context, &candidate.relative);
            let devfile = self
                .parser
                .parse(DevfileSource::Bytes(&candidate.bytes), self.request.token())
                .await
                .map_err(|source| ScanError::InvalidDevfile {
                    location: location.clone(),
                    source,
                })?;

            if is_ignore_sentinel(&devfile) {
                debug!(
                    context = %layout.context,
                    devfile = %location,
                    "Ignoring devfile without components"
                );
                continue;
            }

            let url = match &self.request.source_url {
                Some(source_url) => {
                    Some(raw_file_url(source_url, &self.request.revision, &location)?)
                }
                None => None,
            };
            outcome.set_manifest(
                Some(candidate.bytes.clone()),
                url,
                ManifestOrigin::Repository,
            );
            chosen = Some(devfile);
        }

        Ok(chosen)
    }

    async fn devfile_types(&self) -> Result<&Vec<DevfileType>, ScanError> {
        self.devfile_types
            .get_or_try_init(|| async {
                self.catalog
                    .devfile_types(&self.request.registry_url)
                    .await
                    .map_err(|source| self.catalog_error(source))
            })
            .await
    }

    fn catalog_error(&self, source: crate::catalog::CatalogError) -> ScanError {
        ScanError::CatalogLookupFailed {
            registry: self.request.registry_url.clone(),
            source,
        }
    }

    async fn match_catalog(&self, path: &Path) -> Result<CatalogMatch, ScanError> {
        let no_devfile = || ScanError::NoDevfileFound {
            location: path.to_path_buf(),
        };

        let components = self
            .detector
            .detect_components(path)
            .await
            .map_err(|source| ScanError::Detector {
                location: path.to_path_buf(),
                source,
            })?;
        let component = components.into_iter().next().ok_or_else(no_devfile)?;
        if !component.can_be_component() {
            return Err(no_devfile());
        }

        let types = self.devfile_types().await?;
        let index = match self.detector.select_devfile_type(path, types).await {
            Ok(index) => index,
            Err(DetectorError::NoMatch { .. }) => return Err(no_devfile()),
            Err(source) => {
                return Err(ScanError::Detector {
                    location: path.to_path_buf(),
                    source,
                })
            }
        };
        let selected = types.get(index).ok_or_else(|| ScanError::Detector {
            location: path.to_path_buf(),
            source: DetectorError::Analysis {
                path: path.to_path_buf(),
                message: format!("selected devfile type {} of {}", index, types.len()),
            },
        })?;

        let repository = self
            .catalog
            .sample_repository(&selected.name, &self.request.registry_url)
            .await
            .map_err(|source| self.catalog_error(source))?;
        let devfile_url = raw_file_url(&repository, "", DEFAULT_DEVFILE)?;

        // Registry samples are public, no token
        let invalid = |source| ScanError::InvalidDevfile {
            location: devfile_url.clone(),
            source,
        };
        let devfile = self
            .parser
            .parse(DevfileSource::Url(&devfile_url), None)
            .await
            .map_err(invalid)?;
        let devfile_bytes = self.parser.marshal(&devfile).map_err(invalid)?;

        let dockerfile = find_dockerfile_reference(&devfile);
        let dockerfile_uri = dockerfile
            .as_ref()
            .map(|r| r.uri())
            .unwrap_or(DEFAULT_DOCKERFILE);
        let dockerfile_url = raw_file_url(&repository, "", dockerfile_uri)?;

        info!(
            path = %path.display(),
            sample = %selected.name,
            devfile = %devfile_url,
            "Matched devfile registry sample"
        );

        Ok(CatalogMatch {
            devfile_bytes,
            devfile_url,
            dockerfile_url,
            ports: component.ports,
        })
    }

    /// A Dockerfile without a devfile still gets its ports detected
    async fn harvest_ports(&self, path: &Path, outcome: &mut ContextOutcome) {
        match self.detector.detect_components(path).await {
            Ok(components) => {
                if let Some(component) = components.into_iter().next() {
                    outcome.set_ports(component.ports);
                }
            }
            Err(err) => {
                info!(context = %outcome.context, error = %err, "Failed to detect ports");
            }
        }
    }
}
