use super::model::Devfile;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DevfileError {
    #[error("devfile is not valid: {0}")]
    Invalid(String),

    #[error("failed to fetch devfile from {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("failed to marshal devfile: {0}")]
    Marshal(String),
}

/// Where a devfile comes from
#[derive(Debug, Clone, Copy)]
pub enum DevfileSource<'a> {
    Bytes(&'a [u8]),
    Url(&'a str),
}

/// Devfile parsing service
#[async_trait]
pub trait DevfileParser: Send + Sync {
    /// Parse a devfile. `token` authorizes fetches from private repositories.
    async fn parse(
        &self,
        source: DevfileSource<'_>,
        token: Option<&str>,
    ) -> Result<Devfile, DevfileError>;

    fn marshal(&self, devfile: &Devfile) -> Result<Vec<u8>, DevfileError> {
        serde_yaml::to_string(devfile)
            .map(String::into_bytes)
            .map_err(|e| DevfileError::Marshal(e.to_string()))
    }
}

pub(crate) fn parse_bytes(bytes: &[u8]) -> Result<Devfile, DevfileError> {
    Devfile::from_slice(bytes).map_err(|e| DevfileError::Invalid(e.to_string()))
}

/// Parses devfile YAML locally and fetches remote devfiles over HTTP
pub struct YamlDevfileParser {
    client: reqwest::Client,
}

impl YamlDevfileParser {
    pub fn new(timeout: Duration) -> Result<Self, DevfileError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DevfileError::Fetch {
                url: String::new(),
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    async fn fetch(&self, url: &str, token: Option<&str>) -> Result<Vec<u8>, DevfileError> {
        let fetch_err = |message: String| DevfileError::Fetch {
            url: url.to_string(),
            message,
        };

        let mut request = self.client.get(url);
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| fetch_err(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fetch_err(format!("HTTP {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;
        debug!(url, bytes = bytes.len(), "Fetched remote devfile");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl DevfileParser for YamlDevfileParser {
    async fn parse(
        &self,
        source: DevfileSource<'_>,
        token: Option<&str>,
    ) -> Result<Devfile, DevfileError> {
        match source {
            DevfileSource::Bytes(bytes) => parse_bytes(bytes),
            DevfileSource::Url(url) => {
                let bytes = self.fetch(url, token).await?;
                parse_bytes(&bytes)
            }
        }
    }
}
