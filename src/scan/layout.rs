//! What is physically present in one component context
//!
//! The hidden `.devfile/` directory is looked into as part of the same
//! listing step as the flat devfile names, so both count as the same depth.
//! Nothing deeper than that is ever read.
//!
//! Entries are visited in sorted listing order. When a context holds more
//! than one devfile or Dockerfile, the one visited last represents it.

use crate::devfile::{is_devfile_name, HIDDEN_DEVFILE_DIR};
use crate::error::ScanError;
use crate::fs::{DirEntry, FileSystem};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories that may hold the component's Dockerfile
pub const BUILD_DIRS: [&str; 3] = ["docker", ".docker", "build"];

const DOCKERFILE: &str = "dockerfile";
const CONTAINERFILE: &str = "containerfile";

/// A devfile found on disk, with its bytes already read
#[derive(Debug, Clone)]
pub(crate) struct DevfileCandidate {
    /// Path relative to the context directory, e.g. `.devfile/devfile.yaml`
    pub relative: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub(crate) struct ContextLayout {
    pub context: String,
    pub path: PathBuf,
    /// In listing order, hidden-directory devfiles at the position of `.devfile/`
    pub devfiles: Vec<DevfileCandidate>,
    /// Path of the Dockerfile relative to the context directory
    pub dockerfile: Option<String>,
}

/// Joins a repository-relative prefix and a directory name into a context key
pub fn context_key(prefix: &str, name: &str) -> String {
    let base = normalize_prefix(prefix);
    let name = name.trim_matches('/');
    match (base.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, name),
    }
}

/// Context key used when the scan root itself is the only component
pub fn single_context_key(prefix: &str) -> String {
    let base = normalize_prefix(prefix);
    if base.is_empty() {
        "./".to_string()
    } else {
        base.to_string()
    }
}

fn normalize_prefix(prefix: &str) -> &str {
    let trimmed = prefix.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    let trimmed = trimmed.trim_end_matches('/');
    if trimmed == "." {
        ""
    } else {
        trimmed
    }
}

/// Immediate sub-directories of `root`, in listing order
pub(crate) fn component_dirs<F: FileSystem>(
    fs: &F,
    root: &Path,
) -> Result<Vec<DirEntry>, ScanError> {
    let entries = fs.read_dir(root).map_err(|e| ScanError::io(root, e))?;
    Ok(entries.into_iter().filter(|e| e.is_dir()).collect())
}

/// Classifies the direct listing of one context directory. Any read failure
/// is returned as-is and aborts the whole scan.
pub(crate) fn scan_context<F: FileSystem>(
    fs: &F,
    dir: &Path,
    context: String,
) -> Result<ContextLayout, ScanError> {
    let mut devfiles = Vec::new();
    let mut dockerfile = None;

    for entry in list(fs, dir)? {
        let name = entry.file_name();

        if entry.is_file() {
            if is_devfile_name(name) {
                devfiles.push(read_candidate(fs, &entry, name.to_string())?);
            } else if is_dockerfile_name(name) {
                dockerfile = Some(name.to_string());
            }
        } else if entry.is_dir() && name == HIDDEN_DEVFILE_DIR {
            for inner in list(fs, entry.path())? {
                if inner.is_file() && is_devfile_name(inner.file_name()) {
                    let relative = format!("{}/{}", HIDDEN_DEVFILE_DIR, inner.file_name());
                    devfiles.push(read_candidate(fs, &inner, relative)?);
                }
            }
        } else if entry.is_dir() && BUILD_DIRS.iter().any(|d| *d == name) {
            for inner in list(fs, entry.path())? {
                if inner.is_file() && is_dockerfile_name(inner.file_name()) {
                    dockerfile = Some(format!("{}/{}", name, inner.file_name()));
                }
            }
        }
    }

    debug!(
        context = %context,
        devfiles = ?devfiles.iter().map(|c| c.relative.as_str()).collect::<Vec<_>>(),
        dockerfile = ?dockerfile,
        "Scanned component context"
    );

    Ok(ContextLayout {
        context,
        path: dir.to_path_buf(),
        devfiles,
        dockerfile,
    })
}

fn list<F: FileSystem>(fs: &F, dir: &Path) -> Result<Vec<DirEntry>, ScanError> {
    fs.read_dir(dir).map_err(|e| ScanError::io(dir, e))
}

fn is_dockerfile_name(file_name: &str) -> bool {
    matches!(file_name.to_lowercase().as_str(), DOCKERFILE | CONTAINERFILE)
}

fn read_candidate<F: FileSystem>(
    fs: &F,
    entry: &DirEntry,
    relative: String,
) -> Result<DevfileCandidate, ScanError> {
    let bytes = fs
        .read(entry.path())
        .map_err(|e| ScanError::io(entry.path(), e))?;
    Ok(DevfileCandidate { relative, bytes })
}

/// Repository-relative path of `file` inside `context`
pub(crate) fn context_file(context: &str, file: &str) -> String {
    context_key(context, file)
}
