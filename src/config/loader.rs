//! Configuration loader with environment variable expansion

use super::{
    Config, ConfigError, StorageConfig, UploadConfig, ENV_BASE_PATH, ENV_BUCKET, ENV_ENDPOINT,
    ENV_PATH_STYLE, ENV_REGION,
};
use std::collections::HashMap;
use std::path::Path;

/// Dotenv file read from the working directory by [`ConfigLoader::from_env`]
pub const DOTENV_FILE: &str = ".env";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let expanded = Self::expand_env_vars(&content)?;
        let config: Config = serde_yaml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the process environment
    ///
    /// Variables missing from the environment fall back to `.env` in the
    /// working directory, when that file exists.
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_env_with_dotenv(DOTENV_FILE)
    }

    /// Load configuration from the process environment and a dotenv file
    ///
    /// Real environment variables take precedence over file entries. A
    /// missing file is skipped; an unreadable one is logged and skipped.
    pub fn from_env_with_dotenv<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file_vars = read_dotenv(path.as_ref());
        Self::from_lookup(|name| {
            std::env::var(name)
                .ok()
                .or_else(|| file_vars.get(name).cloned())
        })
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let force_path_style = match non_blank(ENV_PATH_STYLE) {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "{} must be a boolean, got '{}'",
                    ENV_PATH_STYLE, value
                ))
            })?,
            None => false,
        };

        let config = Config {
            storage: StorageConfig {
                bucket: lookup(ENV_BUCKET).unwrap_or_default(),
                region: lookup(ENV_REGION).unwrap_or_default(),
                endpoint: non_blank(ENV_ENDPOINT),
                force_path_style,
            },
            upload: match lookup(ENV_BASE_PATH) {
                Some(base_path) => UploadConfig { base_path },
                None => UploadConfig::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Expand `${VAR}` and `${VAR:-default}`
    ///
    /// Placeholders with no value and no default are left as written.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        let mut last_match = 0;
        let mut result = String::with_capacity(content.len());

        for cap in re.captures_iter(content) {
            let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
                continue;
            };

            result.push_str(&content[last_match..full_match.start()]);

            match std::env::var(var_name.as_str()) {
                Ok(value) => result.push_str(&value),
                Err(_) => match cap.get(2) {
                    Some(default) => result.push_str(default.as_str()),
                    None => result.push_str(full_match.as_str()),
                },
            }

            last_match = full_match.end();
        }

        result.push_str(&content[last_match..]);
        Ok(result)
    }
}

fn read_dotenv(path: &Path) -> HashMap<String, String> {
    if !path.is_file() {
        return HashMap::new();
    }

    let entries = dotenvy::from_path_iter(path)
        .and_then(|iter| iter.collect::<Result<HashMap<_, _>, _>>());

    match entries {
        Ok(vars) => {
            tracing::debug!(path = %path.display(), count = vars.len(), "Loaded dotenv file");
            vars
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable dotenv file");
            HashMap::new()
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Some(true),
        "false" | "f" | "0" => Some(false),
        _ => None,
    }
}
