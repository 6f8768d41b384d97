//! Shared fixtures for the integration tests

#![allow(dead_code)]

use devscout::catalog::{DevfileType, MockCatalog};
use devscout::detector::{ComponentDetector, MockDetector};
use devscout::devfile::MockDevfileParser;
use devscout::fs::RealFileSystem;
use devscout::scan::{ContentResolver, ScanRequest};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const REGISTRY: &str = "https://registry.example.com";
pub const SOURCE: &str = "https://github.com/acme/shop";

pub const NODE_SAMPLE_REPO: &str = "https://github.com/devfile-samples/devfile-sample-nodejs-basic";
pub const NODE_SAMPLE_DEVFILE: &str =
    "https://raw.githubusercontent.com/devfile-samples/devfile-sample-nodejs-basic/main/devfile.yaml";
pub const NODE_SAMPLE_DOCKERFILE: &str =
    "https://raw.githubusercontent.com/devfile-samples/devfile-sample-nodejs-basic/main/docker/Dockerfile";

pub const PYTHON_SAMPLE_REPO: &str =
    "https://github.com/devfile-samples/devfile-sample-python-basic.git";
pub const PYTHON_SAMPLE_DEVFILE: &str =
    "https://raw.githubusercontent.com/devfile-samples/devfile-sample-python-basic/main/devfile.yaml";

/// Devfile whose image component references a Dockerfile next to it
pub const DEVFILE_RELATIVE_DOCKERFILE: &str = r#"schemaVersion: 2.2.0
metadata:
  name: backend
components:
  - name: image-build
    image:
      imageName: backend:latest
      dockerfile:
        uri: docker/Dockerfile
        buildContext: .
"#;

pub const DEVFILE_ABSOLUTE_DOCKERFILE: &str = r#"schemaVersion: 2.2.0
metadata:
  name: worker
components:
  - name: image-build
    image:
      imageName: worker:latest
      dockerfile:
        uri: https://raw.githubusercontent.com/acme/images/main/worker/Dockerfile
"#;

/// Devfile without any image component
pub const DEVFILE_NO_DOCKERFILE: &str = r#"schemaVersion: 2.2.0
metadata:
  name: api
components:
  - name: runtime
    container:
      image: registry.access.redhat.com/ubi8/nodejs-18:latest
"#;

/// Parent-only devfile, treated as absent
pub const DEVFILE_SENTINEL: &str = r#"schemaVersion: 2.2.0
parent:
  id: nodejs
  registryUrl: https://registry.devfile.io
"#;

pub const DEVFILE_INVALID: &str = "metadata:\n  name: broken\n";

pub const NODE_SAMPLE_YAML: &str = r#"schemaVersion: 2.2.0
metadata:
  name: nodejs
  language: JavaScript
  projectType: Node.js
components:
  - name: image-build
    image:
      imageName: nodejs-image:latest
      dockerfile:
        uri: docker/Dockerfile
        buildContext: .
  - name: kubernetes-deploy
    kubernetes:
      uri: deploy.yaml
"#;

/// Registry sample that does not name its Dockerfile
pub const PYTHON_SAMPLE_YAML: &str = r#"schemaVersion: 2.2.0
metadata:
  name: python
components:
  - name: py
    container:
      image: python:3.11
"#;

pub fn write(base: &Path, rel: &str, content: &str) {
    let path = base.join(rel);
    fs::create_dir_all(path.parent().expect("file has a parent")).expect("create dirs");
    fs::write(path, content).expect("write file");
}

pub fn mkdir(base: &Path, rel: &str) {
    fs::create_dir_all(base.join(rel)).expect("create dir");
}

pub fn catalog() -> MockCatalog {
    MockCatalog::new()
        .with_sample(
            DevfileType::new("nodejs-basic", "JavaScript", "Node.js", &["NodeJS", "Express"]),
            NODE_SAMPLE_REPO,
        )
        .with_sample(
            DevfileType::new("python-basic", "Python", "Python", &["Python", "Pip"]),
            PYTHON_SAMPLE_REPO,
        )
}

pub fn parser() -> MockDevfileParser {
    MockDevfileParser::new()
        .with_remote(NODE_SAMPLE_DEVFILE, NODE_SAMPLE_YAML)
        .with_remote(PYTHON_SAMPLE_DEVFILE, PYTHON_SAMPLE_YAML)
}

pub fn resolver(
    detector: impl ComponentDetector + 'static,
    catalog: MockCatalog,
) -> ContentResolver<RealFileSystem> {
    ContentResolver::new(
        RealFileSystem::new(),
        Arc::new(parser()),
        Arc::new(detector),
        Arc::new(catalog),
    )
}

pub fn default_resolver(detector: MockDetector) -> ContentResolver<RealFileSystem> {
    resolver(detector, catalog())
}

pub fn request(root: &TempDir) -> ScanRequest {
    ScanRequest::new(root.path(), REGISTRY).with_source(SOURCE, "")
}
