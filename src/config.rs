use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub disabled_rules: Vec<String>,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Spawn a local server at startup and stop it on exit.
    #[serde(default)]
    pub autostart: bool,

    /// Explicit java binary; `java` from PATH when unset.
    pub java_path: Option<PathBuf>,

    #[serde(default = "default_jar_path")]
    pub jar_path: PathBuf,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_server_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_suggestions() -> usize {
    3
}

fn default_encodings() -> Vec<String> {
    crate::input::DEFAULT_ENCODINGS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_jar_path() -> PathBuf {
    PathBuf::from("languagetool/languagetool-server.jar")
}

fn default_port() -> u16 {
    8081
}

fn default_startup_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
            disabled_rules: Vec::new(),
            max_suggestions: default_max_suggestions(),
            encodings: default_encodings(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            autostart: false,
            java_path: None,
            jar_path: default_jar_path(),
            port: default_port(),
            startup_timeout_secs: default_startup_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(
        language: Option<String>,
        server_url: Option<String>,
        timeout_secs: Option<u64>,
        cli_disabled_rules: Vec<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        // Load local config (overrides global)
        let local_path = PathBuf::from(".ltfix.toml");
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        // Apply CLI overrides
        if let Some(language) = language {
            config.language = language;
        }
        if let Some(url) = server_url {
            config.server_url = url;
        }
        if let Some(secs) = timeout_secs {
            config.timeout_secs = secs;
        }
        if !cli_disabled_rules.is_empty() {
            config.disabled_rules.extend(cli_disabled_rules);
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        // Merge logic: other's values override self's if they differ from defaults
        if other.language != default_language() {
            self.language = other.language;
        }
        if other.server_url != default_server_url() {
            self.server_url = other.server_url;
        }
        if other.timeout_secs != default_timeout_secs() {
            self.timeout_secs = other.timeout_secs;
        }
        if !other.disabled_rules.is_empty() {
            self.disabled_rules = other.disabled_rules;
        }
        if other.max_suggestions != default_max_suggestions() {
            self.max_suggestions = other.max_suggestions;
        }
        if other.encodings != default_encodings() {
            self.encodings = other.encodings;
        }
        if other.server != ServerConfig::default() {
            self.server = other.server;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ltfix").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.language, "en-US");
        assert_eq!(config.server_url, "http://localhost:8081");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_suggestions, 3);
        assert!(!config.server.autostart);
    }

    #[test]
    fn test_merge_configs() {
        let base = Config::default();
        let override_config = Config {
            language: "de-DE".to_string(),
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(merged.language, "de-DE");
        assert_eq!(merged.server_url, "http://localhost:8081");
    }

    #[test]
    fn test_merge_server_table() {
        let base = Config::default();
        let override_config = Config {
            server: ServerConfig {
                autostart: true,
                port: 9001,
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert!(merged.server.autostart);
        assert_eq!(merged.server.port, 9001);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("language = \"en-GB\"").unwrap();
        assert_eq!(config.language, "en-GB");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.server.port, 8081);
    }
}
