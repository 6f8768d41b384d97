use super::model::Devfile;
use super::parser::{parse_bytes, DevfileError, DevfileParser, DevfileSource};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Parses bytes like the real parser and serves URLs from an in-memory table
pub struct MockDevfileParser {
    remote: Mutex<HashMap<String, String>>,
    fetched: Mutex<Vec<String>>,
}

impl MockDevfileParser {
    pub fn new() -> Self {
        Self {
            remote: Mutex::new(HashMap::new()),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn with_remote(self, url: impl Into<String>, yaml: impl Into<String>) -> Self {
        self.add_remote(url, yaml);
        self
    }

    pub fn add_remote(&self, url: impl Into<String>, yaml: impl Into<String>) {
        self.remote.lock().unwrap().insert(url.into(), yaml.into());
    }

    /// URLs fetched so far, in call order
    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl Default for MockDevfileParser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DevfileParser for MockDevfileParser {
    async fn parse(
        &self,
        source: DevfileSource<'_>,
        _token: Option<&str>,
    ) -> Result<Devfile, DevfileError> {
        match source {
            DevfileSource::Bytes(bytes) => parse_bytes(bytes),
            DevfileSource::Url(url) => {
                self.fetched.lock().unwrap().push(url.to_string());
                let yaml = self
                    .remote
                    .lock()
                    .unwrap()
                    .get(url)
                    .cloned()
                    .ok_or_else(|| DevfileError::Fetch {
                        url: url.to_string(),
                        message: "HTTP 404 Not Found".to_string(),
                    })?;
                parse_bytes(yaml.as_bytes())
            }
        }
    }
}
