use super::layout::{component_dirs, context_key, scan_context, single_context_key};
use super::request::ScanRequest;
use super::resolver::ContextResolver;
use super::result::ScanResult;
use crate::catalog::{DevfileCatalog, RegistryCatalog};
use crate::config::DevscoutConfig;
use crate::detector::{ComponentDetector, HeuristicDetector};
use crate::devfile::{DevfileParser, YamlDevfileParser};
use crate::error::ScanError;
use crate::fs::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Repository content resolution engine
///
/// Holds no state between scans: every call to [`ContentResolver::scan`]
/// is a function of the request, the file system and the collaborators.
pub struct ContentResolver<F: FileSystem> {
    fs: F,
    parser: Arc<dyn DevfileParser>,
    detector: Arc<dyn ComponentDetector>,
    catalog: Arc<dyn DevfileCatalog>,
}

impl ContentResolver<RealFileSystem> {
    /// Production collaborators, configured from `config`
    pub fn from_config(config: &DevscoutConfig) -> Result<Self> {
        let parser = YamlDevfileParser::new(config.request_timeout())
            .context("Failed to create devfile parser")?;
        let catalog = RegistryCatalog::new(config.request_timeout())
            .context("Failed to create devfile registry client")?;
        let detector = HeuristicDetector::new(config.detector_config());

        Ok(Self::new(
            RealFileSystem::new(),
            Arc::new(parser),
            Arc::new(detector),
            Arc::new(catalog),
        ))
    }
}

impl<F: FileSystem> ContentResolver<F> {
    pub fn new(
        fs: F,
        parser: Arc<dyn DevfileParser>,
        detector: Arc<dyn ComponentDetector>,
        catalog: Arc<dyn DevfileCatalog>,
    ) -> Self {
        Self {
            fs,
            parser,
            detector,
            catalog,
        }
    }

    /// Resolves every immediate sub-directory of the request root as one
    /// component context. Contexts are processed one at a time in listing
    /// order; the first fatal error discards everything gathered so far.
    pub async fn scan(&self, request: &ScanRequest) -> Result<ScanResult, ScanError> {
        request.validate()?;
        let root = request.root_path.as_path();
        let start = Instant::now();

        info!(
            root = %root.display(),
            registry = %request.registry_url,
            "Starting repository scan"
        );

        let resolver = self.resolver(request);
        let mut result = ScanResult::default();

        for dir in component_dirs(&self.fs, root)? {
            let context = context_key(&request.context_prefix, dir.file_name());
            let layout = scan_context(&self.fs, dir.path(), context)?;
            result.record(resolver.resolve(&layout).await?);
        }

        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Repository scan finished");
        Ok(result.finish(root))
    }

    /// [`ContentResolver::scan`] that gives up as soon as `token` is
    /// cancelled. In-flight registry and devfile requests are dropped.
    pub async fn scan_with_cancel(
        &self,
        request: &ScanRequest,
        token: &CancellationToken,
    ) -> Result<ScanResult, ScanError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!(root = %request.root_path.display(), "Scan cancelled");
                Err(ScanError::Cancelled)
            }
            result = self.scan(request) => result,
        }
    }

    /// Resolves the request root itself as a single component context, for
    /// repositories that are one component rather than a monorepo.
    pub async fn analyze_path(&self, request: &ScanRequest) -> Result<ScanResult, ScanError> {
        request.validate()?;
        let root = request.root_path.as_path();
        if !self.fs.is_dir(root) {
            return Err(ScanError::io(root, anyhow::anyhow!("not a directory")));
        }

        info!(root = %root.display(), "Analyzing single component");

        let context = single_context_key(&request.context_prefix);
        let layout = scan_context(&self.fs, root, context)?;
        let outcome = self.resolver(request).resolve(&layout).await?;

        let mut result = ScanResult::default();
        result.record(outcome);
        Ok(result.finish(root))
    }

    fn resolver<'a>(&'a self, request: &'a ScanRequest) -> ContextResolver<'a> {
        ContextResolver::new(
            self.parser.as_ref(),
            self.detector.as_ref(),
            self.catalog.as_ref(),
            request,
        )
    }
}
