//! Process configuration.
//!
//! Resolved once at startup from built-in defaults, an optional TOML file and
//! the environment (highest precedence), then passed explicitly to the model
//! client, orchestrator and server.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default Anthropic model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default directory under which per-build workspaces are created.
pub const DEFAULT_WORKSPACE_ROOT: &str = "./blueprint-output";

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "blueprint.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}", path = .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub demo_origin: Option<String>,
    pub demo_key: Option<String>,
    pub workspace_root: PathBuf,
    /// Program and arguments of the external verification command.
    ///
    /// `BLUEPRINT_VERIFY_COMMAND` is split on whitespace with no quoting, so
    /// an argument containing spaces must be given through the TOML array
    /// form (`verify_command = ["npx", "tsc", "--project", "my app"]`).
    pub verify_command: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            demo_origin: None,
            demo_key: None,
            workspace_root: PathBuf::from(DEFAULT_WORKSPACE_ROOT),
            verify_command: None,
        }
    }
}

/// The TOML file shape. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    model: Option<String>,
    demo_origin: Option<String>,
    demo_key: Option<String>,
    workspace_root: Option<PathBuf>,
    verify_command: Option<Vec<String>>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Resolve from optional TOML text and an environment lookup.
    pub fn resolve(
        file_text: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file: FileConfig = match file_text {
            Some(text) => toml::from_str(text)?,
            None => FileConfig::default(),
        };
        let env = |key: &str| non_empty(env(key));

        let mut config = Config::default();

        if let Some(v) = non_empty(file.api_key) {
            config.api_key = Some(v);
        }
        if let Some(v) = non_empty(file.model) {
            config.model = v;
        }
        config.demo_origin = non_empty(file.demo_origin);
        config.demo_key = non_empty(file.demo_key);
        if let Some(v) = file.workspace_root.filter(|p| !p.as_os_str().is_empty()) {
            config.workspace_root = v;
        }
        config.verify_command = file.verify_command.filter(|argv| !argv.is_empty());

        if let Some(v) = env("ANTHROPIC_API_KEY") {
            config.api_key = Some(v);
        }
        if let Some(v) = env("BLUEPRINT_MODEL") {
            config.model = v;
        }
        if let Some(v) = env("BLUEPRINT_DEMO_ORIGIN") {
            config.demo_origin = Some(v);
        }
        if let Some(v) = env("BLUEPRINT_DEMO_KEY") {
            config.demo_key = Some(v);
        }
        if let Some(v) = env("BLUEPRINT_WORKSPACE") {
            config.workspace_root = PathBuf::from(v);
        }
        // No shell quoting: whitespace always separates arguments.
        if let Some(v) = env("BLUEPRINT_VERIFY_COMMAND") {
            config.verify_command = Some(v.split_whitespace().map(str::to_string).collect());
        }

        Ok(config)
    }

    /// Load from `path` (which must exist) or from `blueprint.toml` in the
    /// working directory if present, then apply the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let text = match path {
            Some(path) => Some(read(path)?),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Some(read(default)?)
                } else {
                    None
                }
            }
        };
        Self::resolve(text.as_deref(), |key| std::env::var(key).ok())
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = Config::resolve(None, env_of(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.workspace_root, PathBuf::from("./blueprint-output"));
    }

    #[test]
    fn env_overrides_file() {
        let file = r#"
            api_key = "from-file"
            model = "file-model"
            demo_origin = "http://file.example"
            verify_command = ["npm", "run", "check"]
        "#;
        let config = Config::resolve(
            Some(file),
            env_of(&[
                ("ANTHROPIC_API_KEY", "from-env"),
                ("BLUEPRINT_VERIFY_COMMAND", "sh verify.sh --strict"),
            ]),
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.model, "file-model");
        assert_eq!(config.demo_origin.as_deref(), Some("http://file.example"));
        assert_eq!(
            config.verify_command,
            Some(vec!["sh".into(), "verify.sh".into(), "--strict".into()])
        );
    }

    #[test]
    fn empty_values_count_as_unset() {
        let file = r#"
            model = ""
            demo_key = "  "
            verify_command = []
        "#;
        let config = Config::resolve(
            Some(file),
            env_of(&[("ANTHROPIC_API_KEY", ""), ("BLUEPRINT_WORKSPACE", "")]),
        )
        .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn verify_command_quoting_needs_the_file_form() {
        let from_env = Config::resolve(
            None,
            env_of(&[("BLUEPRINT_VERIFY_COMMAND", "npx  tsc --project \"my app\"")]),
        )
        .unwrap();
        assert_eq!(
            from_env.verify_command.unwrap(),
            vec!["npx", "tsc", "--project", "\"my", "app\""]
        );

        let from_file = Config::resolve(
            Some(r#"verify_command = ["npx", "tsc", "--project", "my app"]"#),
            env_of(&[]),
        )
        .unwrap();
        assert_eq!(
            from_file.verify_command.unwrap(),
            vec!["npx", "tsc", "--project", "my app"]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::resolve(Some("colour = \"blue\""), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
