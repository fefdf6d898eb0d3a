use crate::error::ConfigError;
use crate::format::is_http_url;
use crate::storage::{default_storage_dir, is_valid_key};
use crate::store::DEFAULT_STORAGE_KEY;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub backend_url: String,
    pub storage_key: String,
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: default_storage_dir(),
        }
    }
}

/// `KEY=VALUE` pairs from a dotenv-formatted string, in file order. Lines
/// that do not parse are skipped.
pub fn parse_env_defaults(text: &str) -> Vec<(String, String)> {
    dotenvy::from_read_iter(text.as_bytes())
        .filter_map(Result::ok)
        .collect()
}

impl AppConfig {
    /// Read configuration from the environment:
    /// `RAG_BACKEND_URL`, `RAG_STORAGE_KEY`, `RAG_DATA_DIR`.
    ///
    /// The storage key doubles as a file name, so it is limited to ASCII
    /// letters, digits, `-` and `_`; anything else is rejected rather than
    /// rewritten onto a name another key may already use.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let backend_url = non_empty("RAG_BACKEND_URL")
            .map(|url| url.trim().to_string())
            .unwrap_or(defaults.backend_url);
        if !is_http_url(&backend_url) {
            return Err(ConfigError::InvalidBackendUrl { url: backend_url });
        }

        let storage_key = non_empty("RAG_STORAGE_KEY")
            .map(|key| key.trim().to_string())
            .unwrap_or(defaults.storage_key);
        if !is_valid_key(&storage_key) {
            return Err(ConfigError::InvalidStorageKey { key: storage_key });
        }

        Ok(Self {
            backend_url,
            storage_key,
            data_dir: non_empty("RAG_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("RAG_BACKEND_URL", " https://rag.internal/api/ "),
            ("RAG_STORAGE_KEY", "work_chat"),
            ("RAG_DATA_DIR", "/tmp/ragchat"),
        ]))
        .unwrap();
        assert_eq!(config.backend_url, "https://rag.internal/api/");
        assert_eq!(config.storage_key, "work_chat");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/ragchat"));
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("RAG_STORAGE_KEY", "  ")])).unwrap();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn rejects_non_http_backend() {
        let err = AppConfig::from_lookup(lookup(&[("RAG_BACKEND_URL", "localhost:8000")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBackendUrl { .. }));
    }

    #[test]
    fn parses_bundled_defaults() {
        let pairs = parse_env_defaults(
            "# comment\n\nRAG_BACKEND_URL=http://localhost:8000\nRAG_STORAGE_KEY=work_chat\n",
        );
        assert_eq!(
            pairs,
            vec![
                ("RAG_BACKEND_URL".to_string(), "http://localhost:8000".to_string()),
                ("RAG_STORAGE_KEY".to_string(), "work_chat".to_string()),
            ]
        );
    }

    #[test]
    fn shipped_defaults_form_a_valid_config() {
        let pairs = parse_env_defaults(include_str!("../assets/config.env"));
        assert!(!pairs.is_empty());
        let config = AppConfig::from_lookup(|name| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        })
        .unwrap();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn rejects_storage_key_that_would_be_rewritten() {
        for key in ["work:chat", "a/b", "chat history"] {
            let err = AppConfig::from_lookup(lookup(&[("RAG_STORAGE_KEY", key)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidStorageKey { .. }));
        }
        let config = AppConfig::from_lookup(lookup(&[("RAG_STORAGE_KEY", "work_chat")])).unwrap();
        assert_eq!(config.storage_key, "work_chat");
    }
}
