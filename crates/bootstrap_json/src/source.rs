//! Ways of obtaining the `bootstrap.json` response.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::BootstrapConfig;
use crate::document::{Bootstrap, BootstrapEnvelope};
use crate::error::{BootstrapError, Result};

/// Produces the raw `bootstrap.json` response body.
pub trait BootstrapSource {
    /// Human-readable origin, used in logs and errors.
    fn describe(&self) -> String;

    fn load_raw(&self) -> Result<Value>;

    /// Loads the response and extracts its `bootstrap` field.
    fn load(&self) -> Result<Bootstrap> {
        let envelope: BootstrapEnvelope = serde_json::from_value(self.load_raw()?)?;
        envelope
            .bootstrap
            .ok_or_else(|| BootstrapError::MissingBootstrap {
                source_name: self.describe(),
            })
    }
}

#[derive(Debug)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(base_address: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(2).min(timeout))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/bootstrap.json", base_address.trim_end_matches('/')),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl BootstrapSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn load_raw(&self) -> Result<Value> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(BootstrapError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// A `bootstrap.json` response saved to disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BootstrapSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_raw(&self) -> Result<Value> {
        if !self.path.exists() {
            return Err(BootstrapError::MissingPath {
                path: self.path.clone(),
            });
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Picks the file source when configured, otherwise HTTP.
pub fn source_for(config: &BootstrapConfig) -> Result<Box<dyn BootstrapSource>> {
    match &config.bootstrap_file {
        Some(path) => Ok(Box::new(FileSource::new(path.clone()))),
        None => Ok(Box::new(HttpSource::new(&config.proxy, config.timeout)?)),
    }
}
