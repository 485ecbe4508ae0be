//! Configuration types and parsing for tidemark.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name looked up in the project directory
pub const DEFAULT_CONFIG_FILE_NAME: &str = "tidemark.yml";

/// Alternate extension accepted by [`Config::load_from_dir`]
const ALT_CONFIG_FILE_NAME: &str = "tidemark.yaml";

const DEFAULT_DB_PATH: &str = ":memory:";

const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

const DEFAULT_CHANGELOG_TABLE: &str = "changelog";

/// Main project configuration from tidemark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Directory holding migration files, relative to the project root
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: ConfigValue,

    /// Table that stores the changelog
    #[serde(default = "default_changelog_table")]
    pub changelog_table: ConfigValue,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: ConfigValue,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// A string setting that is either written inline or read from the
/// environment when resolved (`{ env: NAME }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Inline value
    Literal(String),
    /// Name of an environment variable holding the value
    Env { env: String },
}

impl ConfigValue {
    /// Resolve the value; `setting` names the config key for error messages.
    pub fn resolve(&self, setting: &str) -> CoreResult<String> {
        match self {
            ConfigValue::Literal(value) => Ok(value.clone()),
            ConfigValue::Env { env } => {
                std::env::var(env).map_err(|_| CoreError::MissingEnvVar {
                    name: env.clone(),
                    setting: setting.to_string(),
                })
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Literal(value.to_string())
    }
}

fn default_db_path() -> ConfigValue {
    DEFAULT_DB_PATH.into()
}

fn default_migrations_dir() -> ConfigValue {
    DEFAULT_MIGRATIONS_DIR.into()
}

fn default_changelog_table() -> ConfigValue {
    DEFAULT_CHANGELOG_TABLE.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            migrations_dir: default_migrations_dir(),
            changelog_table: default_changelog_table(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn parse(content: &str) -> CoreResult<Self> {
        // An empty file is a valid config with every default applied
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for tidemark.yml or tidemark.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join(DEFAULT_CONFIG_FILE_NAME);
        let yaml_path = dir.join(ALT_CONFIG_FILE_NAME);

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Resolve where the config file lives.
    ///
    /// An explicit path is used as given (relative paths resolve against the
    /// working directory); otherwise the default file name inside `project_dir`.
    pub fn config_path(project_dir: &Path, explicit: Option<&str>) -> PathBuf {
        match explicit {
            Some(path) => PathBuf::from(path),
            None => project_dir.join(DEFAULT_CONFIG_FILE_NAME),
        }
    }

    /// Fail if a config file is already present at `path`
    pub fn should_not_exist(path: &Path) -> CoreResult<()> {
        if path.exists() {
            return Err(CoreError::ConfigExists {
                path: path.display().to_string(),
            });
        }
        Ok(())
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        // Env-backed values are checked when resolved
        if let ConfigValue::Literal(table) = &self.changelog_table {
            validate_table_name(table)?;
        }
        if let ConfigValue::Literal(dir) = &self.migrations_dir {
            if dir.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "migrations_dir cannot be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Database path, with an optional override (CLI `--target`) taking precedence
    pub fn database_path(&self, target: Option<&str>) -> CoreResult<String> {
        let path = match target {
            Some(path) => path.to_string(),
            None => self.database.path.resolve("database.path")?,
        };
        if path.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "No database path defined in config file".to_string(),
            });
        }
        Ok(path)
    }

    /// Get the absolute migrations directory relative to a project root
    pub fn migrations_dir_absolute(&self, root: &Path) -> CoreResult<PathBuf> {
        let dir = self.migrations_dir.resolve("migrations_dir")?;
        Ok(root.join(dir))
    }

    /// Get the validated changelog table name
    pub fn changelog_table(&self) -> CoreResult<String> {
        let table = self.changelog_table.resolve("changelog_table")?;
        validate_table_name(&table)?;
        Ok(table)
    }
}

/// Check that `name` is `ident` or `schema.ident` made of ASCII letters,
/// digits and underscores, not starting with a digit.
pub fn validate_table_name(name: &str) -> CoreResult<()> {
    let parts: Vec<&str> = name.split('.').collect();
    let valid = parts.len() <= 2
        && parts.iter().all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if valid {
        Ok(())
    } else {
        Err(CoreError::ConfigInvalid {
            message: format!("changelog_table '{}' is not a valid table name", name),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
