//! Revision-pinned links to files in hosted git repositories
//!
//! GitHub repositories resolve to `raw.githubusercontent.com`, GitLab
//! repositories to the `/-/raw/` endpoint and every other host to the
//! Gitea/Forgejo style `/raw/` endpoint.

use crate::devfile::is_network_uri;
use crate::error::ScanError;
use reqwest::Url;

pub const DEFAULT_REVISION: &str = "main";

/// Builds the raw-content URL for `path` inside `repo_url` at `revision`.
///
/// An empty revision means [`DEFAULT_REVISION`]. A `path` that already is an
/// absolute http(s) URL is returned unchanged.
pub fn raw_file_url(repo_url: &str, revision: &str, path: &str) -> Result<String, ScanError> {
    if is_network_uri(path) {
        return Ok(path.trim().to_string());
    }

    let invalid = |reason: &str| ScanError::InvalidSourceUrl {
        url: repo_url.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = repo_url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("only http and https repository URLs are supported"));
    }
    let host = url
        .host_str()
        .ok_or_else(|| invalid("repository URL has no host"))?
        .to_ascii_lowercase();

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    if segments.is_empty() {
        return Err(invalid("repository URL has no repository path"));
    }

    let revision = match revision.trim() {
        "" => DEFAULT_REVISION,
        rev => rev,
    };
    let path = path.trim().trim_start_matches("./").trim_start_matches('/');

    if host == "github.com" || host == "www.github.com" {
        if segments.len() < 2 {
            return Err(invalid("GitHub URLs must name an owner and a repository"));
        }
        return Ok(format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}",
            segments[0], segments[1], revision, path
        ));
    }

    let base = match url.port() {
        Some(port) => format!("{}://{}:{}/{}", url.scheme(), host, port, segments.join("/")),
        None => format!("{}://{}/{}", url.scheme(), host, segments.join("/")),
    };

    if host == "gitlab.com" || host.starts_with("gitlab.") {
        Ok(format!("{}/-/raw/{}/{}", base, revision, path))
    } else {
        Ok(format!("{}/raw/{}/{}", base, revision, path))
    }
}
