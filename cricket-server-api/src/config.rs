use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPLOAD_DIR: &str = "./public/uploads";
const DEFAULT_UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024; // 5 MiB
const DEFAULT_UPLOAD_EXTENSIONS: &str = "jpg,jpeg,png,gif,webp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a valid port, got '{value}'")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var} must be a positive number of bytes, got '{value}'")]
    InvalidSize { var: &'static str, value: String },

    #[error("{var} must list at least one extension")]
    NoExtensions { var: &'static str },
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
    /// Lowercase, without the leading dot.
    pub upload_extensions: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            upload_max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
            upload_extensions: split_list(DEFAULT_UPLOAD_EXTENSIONS),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup("CRICKET_HTTP_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("CRICKET_HTTP_PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: "CRICKET_HTTP_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(origins) = lookup("CRICKET_CORS_ORIGINS") {
            let origins = split_list(&origins);
            config.cors_origins = if origins.iter().any(|o| o == "*") {
                Vec::new()
            } else {
                origins
            };
        }
        if let Some(dir) = lookup("CRICKET_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }
        if let Some(max) = lookup("CRICKET_UPLOAD_MAX_BYTES") {
            config.upload_max_bytes = match max.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidSize {
                        var: "CRICKET_UPLOAD_MAX_BYTES",
                        value: max,
                    });
                }
            };
        }
        if let Some(extensions) = lookup("CRICKET_UPLOAD_EXTENSIONS") {
            let extensions: Vec<String> = split_list(&extensions)
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
            if extensions.is_empty() {
                return Err(ConfigError::NoExtensions {
                    var: "CRICKET_UPLOAD_EXTENSIONS",
                });
            }
            config.upload_extensions = extensions;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.upload_max_bytes, 5 * 1024 * 1024);
        assert_eq!(
            config.upload_extensions,
            vec!["jpg", "jpeg", "png", "gif", "webp"]
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CRICKET_HTTP_PORT", "9000"),
            ("CRICKET_CORS_ORIGINS", "http://a.test, http://b.test"),
            ("CRICKET_UPLOAD_EXTENSIONS", ".PNG, svg"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.upload_extensions, vec!["png", "svg"]);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("CRICKET_HTTP_PORT", "http")]),
            Err(ConfigError::InvalidPort { .. })
        ));
        assert!(matches!(
            config_from(&[("CRICKET_UPLOAD_MAX_BYTES", "0")]),
            Err(ConfigError::InvalidSize { .. })
        ));
        assert!(matches!(
            config_from(&[("CRICKET_UPLOAD_EXTENSIONS", " , ")]),
            Err(ConfigError::NoExtensions { .. })
        ));
    }
}
