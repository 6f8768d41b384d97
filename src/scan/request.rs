use crate::error::ScanError;
use std::path::PathBuf;

/// Everything one scan needs to know about the repository it looks at.
/// Immutable for the duration of the scan.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    /// Local checkout to scan
    pub root_path: PathBuf,
    /// Path of `root_path` inside the repository, prepended to context keys
    pub context_prefix: String,
    /// Hosted repository URL; without it on-disk devfiles get no link
    pub source_url: Option<String>,
    /// Revision for hosted links, empty means `main`
    pub revision: String,
    pub auth_token: Option<String>,
    pub registry_url: String,
}

impl ScanRequest {
    pub fn new(root_path: impl Into<PathBuf>, registry_url: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            registry_url: registry_url.into(),
            ..Default::default()
        }
    }

    pub fn with_context_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.context_prefix = prefix.into();
        self
    }

    pub fn with_source(mut self, url: impl Into<String>, revision: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self.revision = revision.into();
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.auth_token.as_deref().filter(|t| !t.is_empty())
    }

    pub(crate) fn validate(&self) -> Result<(), ScanError> {
        if self.root_path.as_os_str().is_empty() {
            return Err(ScanError::InvalidRequest(
                "repository root path is empty".to_string(),
            ));
        }
        if self.registry_url.trim().is_empty() {
            return Err(ScanError::InvalidRequest(
                "devfile registry URL is empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = ScanRequest::new("/repo", "https://registry.devfile.io")
            .with_context_prefix("services")
            .with_source("https://github.com/org/repo", "v1")
            .with_auth_token("secret");

        assert_eq!(request.context_prefix, "services");
        assert_eq!(request.source_url.as_deref(), Some("https://github.com/org/repo"));
        assert_eq!(request.revision, "v1");
        assert_eq!(request.token(), Some("secret"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_token_is_no_token() {
        let request = ScanRequest::new("/repo", "https://registry").with_auth_token("");
        assert_eq!(request.token(), None);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            ScanRequest::new("/repo", " ").validate(),
            Err(ScanError::InvalidRequest(_))
        ));
        assert!(matches!(
            ScanRequest::new("", "https://registry").validate(),
            Err(ScanError::InvalidRequest(_))
        ));
    }
}
