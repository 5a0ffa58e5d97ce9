use std::path::PathBuf;

use secrecy::SecretString;

use crate::StoreError;

pub const DEFAULT_STORE_DIR: &str = "./wellness-data";
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub store_dir: PathBuf,
    /// Default sealing key for stored entries.
    pub access_key: Option<SecretString>,
    /// Most recent entries loaded as analysis history.
    pub history_limit: usize,
    pub backend: StoreBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            access_key: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            backend: StoreBackend::File,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Read configuration through `get` instead of the process environment,
    /// so tests need not mutate global state.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, StoreError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let store_dir = get("WELLNESS_JOURNAL_STORE_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));
        let access_key = get("WELLNESS_JOURNAL_ACCESS_KEY")
            .filter(|s| !s.is_empty())
            .map(|s| SecretString::new(s.into()));
        let history_limit = match get("WELLNESS_JOURNAL_HISTORY_LIMIT") {
            None => DEFAULT_HISTORY_LIMIT,
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    StoreError::Config(format!(
                        "WELLNESS_JOURNAL_HISTORY_LIMIT must be a positive integer, got {raw:?}"
                    ))
                })?,
        };
        let backend = match get("WELLNESS_JOURNAL_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("file") => StoreBackend::File,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(StoreError::Config(format!(
                    "WELLNESS_JOURNAL_STORE must be `file` or `memory`, got {other:?}"
                )));
            }
        };
        Ok(Self {
            store_dir,
            access_key,
            history_limit,
            backend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::from_env_with(|_| None).expect("cfg");
        assert_eq!(cfg.store_dir, PathBuf::from(DEFAULT_STORE_DIR));
        assert!(cfg.access_key.is_none());
        assert_eq!(cfg.history_limit, 30);
        assert_eq!(cfg.backend, StoreBackend::File);
    }

    #[test]
    fn reads_values() {
        let get = |k: &str| match k {
            "WELLNESS_JOURNAL_STORE_DIR" => Some("/tmp/journal".into()),
            "WELLNESS_JOURNAL_ACCESS_KEY" => Some("sekrit".into()),
            "WELLNESS_JOURNAL_HISTORY_LIMIT" => Some("7".into()),
            "WELLNESS_JOURNAL_STORE" => Some("memory".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.store_dir, PathBuf::from("/tmp/journal"));
        assert_eq!(cfg.access_key.unwrap().expose_secret(), "sekrit");
        assert_eq!(cfg.history_limit, 7);
        assert_eq!(cfg.backend, StoreBackend::Memory);
    }

    #[test]
    fn invalid_history_limit_is_config_error() {
        for bad in ["abc", "0", "-3"] {
            let res = Config::from_env_with(|k| {
                (k == "WELLNESS_JOURNAL_HISTORY_LIMIT").then(|| bad.to_string())
            });
            assert!(matches!(res, Err(StoreError::Config(_))), "{bad}");
        }
    }

    #[test]
    fn unknown_backend_is_config_error() {
        let res = Config::from_env_with(|k| (k == "WELLNESS_JOURNAL_STORE").then(|| "s3".into()));
        assert!(matches!(res, Err(StoreError::Config(_))));
    }
}
