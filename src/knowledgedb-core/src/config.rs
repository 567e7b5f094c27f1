use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Environment variable holding the database endpoint.
pub const ENDPOINT_ENV: &str = "KNOWLEDGEDB_ENDPOINT";
/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "KNOWLEDGEDB_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing configuration value: {0}")]
    Missing(&'static str),
}

/// Connection settings for one remote database.
///
/// The endpoint has a single trailing `/` stripped when the config is
/// built, so every request path (which always starts with `/`) can be
/// appended without producing `//`. Both values are immutable afterwards.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    endpoint: String,
    api_key: String,
}

/// On-disk shape of `knowledgedb.json`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    endpoint: String,
    #[serde(default, alias = "apiKey")]
    api_key: String,
}

impl Config {
    pub fn new(endpoint: impl AsRef<str>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint.as_ref()),
            api_key: api_key.into(),
        }
    }

    /// Load from a JSON file: `{"endpoint": "...", "api_key": "..."}`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: shown.clone(),
            source,
        })?;
        let file: ConfigFile = serde_json::from_str(&contents).map_err(|source| {
            ConfigError::Parse {
                path: shown.clone(),
                source,
            }
        })?;

        tracing::debug!(path = %shown, "Loaded client configuration");
        Ok(Self::new(file.endpoint, file.api_key))
    }

    /// Build from `KNOWLEDGEDB_ENDPOINT` / `KNOWLEDGEDB_API_KEY`.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Replace each value for which `lookup` yields a non-empty string.
    ///
    /// `lookup` is keyed by [`ENDPOINT_ENV`] and [`API_KEY_ENV`].
    pub fn overlay<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENDPOINT_ENV)
            .filter(|v| !v.is_empty())
            .map(|v| normalize_endpoint(&v))
            .unwrap_or(self.endpoint);
        let api_key = lookup(API_KEY_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or(self.api_key);

        Self { endpoint, api_key }
    }

    /// Fails if either value is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::Missing("endpoint"));
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::Missing("api_key"));
        }
        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Full request URL for a path beginning with `/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }
}

// Keep the credential out of logs and panic messages.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Strip every trailing `/` so `endpoint + path` never doubles the slash.
pub fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_trailing_slash_stripped() {
        let with = Config::new("http://host/db/x/", "k");
        let without = Config::new("http://host/db/x", "k");

        assert_eq!(with.endpoint(), "http://host/db/x");
        assert_eq!(with.url("/collections"), without.url("/collections"));
        assert_eq!(with.url("/collections"), "http://host/db/x/collections");

        assert_eq!(normalize_endpoint("http://host//"), "http://host");
    }

    #[test]
    fn test_repeated_trailing_slashes_never_double_join() {
        let doubled = Config::new("http://host/db/x//", "k");
        let plain = Config::new("http://host/db/x", "k");

        assert_eq!(doubled.url("/collections"), plain.url("/collections"));
        assert!(!doubled.url("/collections").contains("x//"));

        let overlaid = plain.overlay(|key| match key {
            ENDPOINT_ENV => Some("http://other///".to_string()),
            _ => None,
        });
        assert_eq!(overlaid.endpoint(), "http://other");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config::new("http://localhost:5000/db/u/app", "kdb_secret");
        let printed = format!("{:?}", config);

        assert!(printed.contains("http://localhost:5000/db/u/app"));
        assert!(!printed.contains("kdb_secret"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"endpoint": "http://localhost:5000/db/usr_abc/myapp/", "api_key": "kdb_123"}}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.endpoint(), "http://localhost:5000/db/usr_abc/myapp");
        assert_eq!(config.api_key(), "kdb_123");
    }

    #[test]
    fn test_load_accepts_camel_case_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"endpoint": "http://h/db/u/a", "apiKey": "kdb_cc"}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api_key(), "kdb_cc");
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load("/definitely/not/here/knowledgedb.json");
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_overlay_prefers_non_empty_values() {
        let vars: HashMap<&str, &str> = [
            (ENDPOINT_ENV, "http://env-host/db/u/app/"),
            (API_KEY_ENV, ""),
        ]
        .into_iter()
        .collect();

        let config = Config::new("http://file-host/db/u/app", "kdb_file")
            .overlay(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.endpoint(), "http://env-host/db/u/app");
        assert_eq!(config.api_key(), "kdb_file");
    }

    #[test]
    fn test_validate() {
        assert!(Config::new("http://h", "k").validate().is_ok());
        assert!(matches!(
            Config::new("", "k").validate(),
            Err(ConfigError::Missing("endpoint"))
        ));
        assert!(matches!(
            Config::new("http://h", "").validate(),
            Err(ConfigError::Missing("api_key"))
        ));
    }
}
