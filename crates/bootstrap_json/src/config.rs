use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::error::{BootstrapError, Result};

pub const PROXY_ENV: &str = "BOOTSTRAP_JSON_PROXY";
pub const TIMEOUT_ENV: &str = "BOOTSTRAP_JSON_TIMEOUT";
pub const DEFAULT_PROXY: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Where the bootstrap document comes from.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Backend base address; `/bootstrap.json` is appended.
    #[arg(long)]
    pub proxy: Option<String>,

    /// Read a saved `bootstrap.json` response instead of fetching.
    #[arg(long = "bootstrap-file", conflicts_with = "proxy")]
    pub bootstrap_file: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long = "timeout", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub proxy: String,
    pub bootstrap_file: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            proxy: DEFAULT_PROXY.to_string(),
            bootstrap_file: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

impl BootstrapConfig {
    /// Resolves CLI arguments, falling back to the environment, then defaults.
    pub fn resolve(args: SourceArgs) -> Result<Self> {
        Self::resolve_with(args, |name| std::env::var(name).ok())
    }

    fn resolve_with(args: SourceArgs, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let proxy = args
            .proxy
            .or_else(|| env(PROXY_ENV))
            .unwrap_or_else(|| DEFAULT_PROXY.to_string());
        let proxy = normalize_base_address(&proxy)?;

        let timeout_seconds = match args.timeout_seconds {
            Some(seconds) => seconds,
            None => match env(TIMEOUT_ENV) {
                Some(raw) => parse_timeout(&raw)?,
                None => DEFAULT_TIMEOUT_SECONDS,
            },
        };

        Ok(Self {
            proxy,
            bootstrap_file: args.bootstrap_file,
            timeout: Duration::from_secs(timeout_seconds),
        })
    }

    #[must_use]
    pub fn bootstrap_url(&self) -> String {
        format!("{}/bootstrap.json", self.proxy)
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(seconds),
        _ => Err(BootstrapError::invalid(format!(
            "{TIMEOUT_ENV} must be a positive number of seconds, got {raw:?}"
        ))),
    }
}

/// Trims whitespace and trailing slashes; requires an http(s) scheme.
pub fn normalize_base_address(raw: &str) -> Result<String> {
    let value = raw.trim().trim_end_matches('/');
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(BootstrapError::invalid(format!(
            "proxy must be an http(s) URL, got {raw:?}"
        )));
    }
    Ok(value.to_string())
}
