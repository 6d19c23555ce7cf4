use anyhow::{Context, Result};
use reqwest::header::HeaderValue;
use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/all_movies.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_search_path")]
    pub search_path: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.imdb.com".to_string()
}
fn default_search_path() -> String {
    "/find/".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0 Safari/537.36"
        .to_string()
}
fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    2
}

impl SourceConfig {
    /// Parsed `base_url`.
    pub fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .with_context(|| format!("source.base_url is not a valid URL: {}", self.base_url))
    }
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self {
            store: StoreConfig::default(),
            source: SourceConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Load the config file if it exists, otherwise fall back to
/// [`Config::minimal`]. A file that exists but is invalid is an error.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::minimal())
    }
}

fn validate(config: &Config) -> Result<()> {
    // Validate source
    let base = config.source.base()?;
    match base.scheme() {
        "http" | "https" => {}
        other => anyhow::bail!(
            "source.base_url must use http or https, got '{}'",
            other
        ),
    }
    if !config.source.search_path.starts_with('/') {
        anyhow::bail!("source.search_path must start with '/'");
    }
    if config.source.timeout_secs == 0 {
        anyhow::bail!("source.timeout_secs must be > 0");
    }
    HeaderValue::from_str(&config.source.user_agent)
        .with_context(|| "source.user_agent is not a valid header value")?;
    HeaderValue::from_str(&config.source.accept_language)
        .with_context(|| "source.accept_language is not a valid header value")?;

    // Validate store
    if config.store.path.as_os_str().is_empty() {
        anyhow::bail!("store.path must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("movie-finder.toml");
        std::fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = load_config_or_default(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.source.base_url, "https://www.imdb.com");
        assert_eq!(cfg.store.path, PathBuf::from("./data/all_movies.json"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let (_tmp, path) = write_config("[store]\npath = \"/tmp/movies.json\"\n");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.store.path, PathBuf::from("/tmp/movies.json"));
        assert_eq!(cfg.source.search_path, "/find/");
        assert_eq!(cfg.source.timeout_secs, 30);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let (_tmp, path) = write_config("[source]\nbase_url = \"ftp://example.com\"\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let (_tmp, path) = write_config("[source]\ntimeout_secs = 0\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn rejects_accept_language_with_control_characters() {
        let (_tmp, path) = write_config("[source]\naccept_language = \"en-US\\nX-Injected: 1\"\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("accept_language"));
    }

    #[test]
    fn invalid_toml_is_an_error_even_with_fallback() {
        let (_tmp, path) = write_config("[store\n");
        assert!(load_config_or_default(&path).is_err());
    }
}
