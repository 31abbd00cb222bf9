use std::env;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::ClientError;

/// API root used when `STAY_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
/// Request timeout used when `STAY_API_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Credential directory used when `STAY_DATA_DIR` is not set.
pub const DEFAULT_DATA_DIR: &str = ".stay";

/// Where the API lives and how the client talks to it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://stays.example/api` (no trailing slash)
    pub api_base_url: String,
    /// Applied to every request by the transport
    pub timeout: Duration,
    pub user_agent: String,
    /// Directory holding one credential file per API origin
    pub data_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("web-client/{}", env!("CARGO_PKG_VERSION")),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl ClientConfig {
    /// Build from `STAY_API_URL`, `STAY_API_TIMEOUT_SECS` and `STAY_DATA_DIR`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Ok(Self {
            api_base_url: api_base_url()?,
            timeout: timeout()?,
            data_dir: data_dir(),
            ..Self::default()
        })
    }

    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, ClientError> {
        self.api_base_url = normalize_base_url(url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// File-name-safe label for the API origin, e.g. `127.0.0.1_8000`.
    pub fn origin_slug(&self) -> String {
        let Ok(url) = Url::parse(&self.api_base_url) else {
            return "default".to_string();
        };
        let host = url.host_str().unwrap_or("local");
        let origin = match url.port_or_known_default() {
            Some(port) => format!("{host}_{port}"),
            None => host.to_string(),
        };
        origin
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect()
    }

    /// Credential file for this configuration's API origin.
    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.origin_slug()))
    }
}

/// Get the API root from the environment (defaults to the local dev server)
fn api_base_url() -> Result<String, ClientError> {
    match env::var("STAY_API_URL") {
        Ok(raw) if !raw.trim().is_empty() => normalize_base_url(&raw),
        _ => Ok(DEFAULT_API_URL.to_string()),
    }
}

/// Get the request timeout from the environment (defaults to 10 seconds)
fn timeout() -> Result<Duration, ClientError> {
    let Ok(raw) = env::var("STAY_API_TIMEOUT_SECS") else {
        return Ok(DEFAULT_TIMEOUT);
    };
    let secs = raw.trim().parse::<u64>().map_err(|_| {
        ClientError::config(format!(
            "STAY_API_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
        ))
    })?;
    if secs == 0 {
        return Err(ClientError::config(
            "STAY_API_TIMEOUT_SECS must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Get the credential directory from the environment (defaults to `.stay`)
fn data_dir() -> PathBuf {
    env::var("STAY_DATA_DIR")
        .ok()
        .filter(|d| !d.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| ClientError::config(format!("invalid API URL '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::config(format!(
            "API URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(trimmed.to_string())
}
