//! Credential store: loads and validates environment credentials from TOML

use crate::api::constants::{Platform, DEFAULT_PLATFORM_HOST};
use crate::api::models::{EnvironmentCredential, Region};
use crate::api::resilience::ResilienceConfig;
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to determine the configuration directory")]
    NoConfigDir,

    #[error("Configuration file not found: {path:?} (run 'pingone-forms init' to create one)")]
    NotFound { path: PathBuf },

    #[error("Failed to read configuration file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write configuration file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration file already exists: {path:?}")]
    AlreadyExists { path: PathBuf },

    #[error("Failed to parse configuration file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid environment '{name}': {message}")]
    InvalidEnvironment { name: String, message: String },

    #[error("Environment '{name}' not found (configured: {available})")]
    UnknownEnvironment { name: String, available: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    platform: PlatformSection,
    #[serde(default)]
    retry: RetrySection,
    #[serde(default)]
    environments: Vec<EnvironmentEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlatformSection {
    #[serde(default = "default_host")]
    host: String,
    auth_url: Option<String>,
    api_url: Option<String>,
}

fn default_host() -> String {
    DEFAULT_PLATFORM_HOST.to_string()
}

impl Default for PlatformSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            auth_url: None,
            api_url: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RetrySection {
    max_retries: Option<u32>,
    base_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnvironmentEntry {
    name: String,
    tenant_id: String,
    client_id: String,
    client_secret: Option<String>,
    client_secret_env: Option<String>,
    region: String,
}

/// Loaded and validated configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub path: PathBuf,
    pub platform: Platform,
    pub resilience: ResilienceConfig,
    pub environments: Vec<EnvironmentCredential>,
}

const EXAMPLE_CONFIG: &str = r#"# pingone-forms configuration
#
# Each [[environments]] entry describes one PingOne environment that forms can
# be exported from or imported into. The worker application needs a role that
# allows reading and creating forms.

# [platform]
# host = "pingone"

# [retry]
# max_retries = 3
# base_delay_ms = 1000

[[environments]]
name = "Development"
tenant_id = "00000000-0000-0000-0000-000000000000"
client_id = "00000000-0000-0000-0000-000000000000"
# Either put the secret here or name an environment variable holding it
client_secret_env = "PINGONE_DEV_CLIENT_SECRET"
# One of: com, eu, ca, asia, com.au, sg
region = "com"
"#;

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join("pingone-forms")
        } else {
            dirs::home_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join(".pingone-forms")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or from the default location
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        debug!("Loading config from: {:?}", path);

        if !path.exists() {
            return Err(ConfigError::NotFound { path });
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let config = Self::parse(&content, &path, |var| std::env::var(var).ok())?;
        info!(
            "Loaded config with {} environments from {:?}",
            config.environments.len(),
            config.path
        );
        Ok(config)
    }

    /// Parse and validate TOML content. `lookup_env` resolves `client_secret_env`.
    pub fn parse(
        content: &str,
        path: &Path,
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let environments = file
            .environments
            .into_iter()
            .map(|entry| validate_entry(entry, &lookup_env))
            .collect::<Result<Vec<_>, _>>()?;

        let platform = Platform {
            host: file.platform.host,
            auth_url: file.platform.auth_url,
            api_url: file.platform.api_url,
        };

        let mut resilience = ResilienceConfig::default();
        if let Some(max_retries) = file.retry.max_retries {
            resilience.retry.max_retries = max_retries;
        }
        if let Some(base_delay_ms) = file.retry.base_delay_ms {
            resilience.retry.base_delay = Duration::from_millis(base_delay_ms);
        }

        Ok(Self {
            path: path.to_path_buf(),
            platform,
            resilience,
            environments,
        })
    }

    /// Write a commented example configuration; refuses to overwrite
    pub fn write_example(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, EXAMPLE_CONFIG).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Wrote example config to {:?}", path);
        Ok(())
    }

    pub fn environment_names(&self) -> Vec<String> {
        self.environments.iter().map(|e| e.name.clone()).collect()
    }

    pub fn find_environment(&self, name: &str) -> Result<&EnvironmentCredential, ConfigError> {
        self.environments
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                name: name.to_string(),
                available: self.environment_names().join(", "),
            })
    }
}

fn validate_entry(
    entry: EnvironmentEntry,
    lookup_env: &impl Fn(&str) -> Option<String>,
) -> Result<EnvironmentCredential, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidEnvironment {
        name: entry.name.clone(),
        message,
    };

    if entry.name.trim().is_empty() {
        return Err(invalid("name must not be empty".to_string()));
    }

    let tenant_id = Uuid::parse_str(entry.tenant_id.trim())
        .map_err(|e| invalid(format!("tenant_id is not a UUID: {}", e)))?;
    let client_id = Uuid::parse_str(entry.client_id.trim())
        .map_err(|e| invalid(format!("client_id is not a UUID: {}", e)))?;
    let region: Region = entry.region.parse().map_err(invalid)?;

    let client_secret = match (&entry.client_secret, &entry.client_secret_env) {
        (Some(_), Some(_)) => {
            return Err(invalid(
                "set either client_secret or client_secret_env, not both".to_string(),
            ));
        }
        (Some(secret), None) => secret.clone(),
        (None, Some(var)) => lookup_env(var)
            .ok_or_else(|| invalid(format!("environment variable {} is not set", var)))?,
        (None, None) => {
            return Err(invalid(
                "missing client_secret (or client_secret_env)".to_string(),
            ));
        }
    };

    if client_secret.is_empty() {
        return Err(invalid("client secret is empty".to_string()));
    }

    Ok(EnvironmentCredential {
        name: entry.name.clone(),
        tenant_id: tenant_id.hyphenated().to_string(),
        client_id: client_id.hyphenated().to_string(),
        client_secret,
        region,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TENANT: &str = "11111111-2222-3333-4444-555555555555";
    const CLIENT: &str = "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee";

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn parse(content: &str) -> Result<Config, ConfigError> {
        Config::parse(content, Path::new("config.toml"), no_env)
    }

    fn environment(extra: &str) -> String {
        format!(
            "[[environments]]\nname = \"Dev US\"\ntenant_id = \"{}\"\nclient_id = \"{}\"\n{}\n",
            TENANT, CLIENT, extra
        )
    }

    #[test]
    fn test_parse_valid_config() {
        let content = format!(
            "[platform]\nhost = \"pingone\"\n\n[retry]\nmax_retries = 2\nbase_delay_ms = 250\n\n{}",
            environment("client_secret = \"s3cret\"\nregion = \"com.au\"")
        );
        let config = parse(&content).unwrap();

        assert_eq!(config.environments.len(), 1);
        let dev = config.find_environment("Dev US").unwrap();
        assert_eq!(dev.tenant_id, TENANT);
        assert_eq!(dev.region, Region::Australia);
        assert_eq!(dev.client_secret, "s3cret");
        assert_eq!(config.resilience.retry.max_retries, 2);
        assert_eq!(config.resilience.retry.base_delay, Duration::from_millis(250));
        assert_eq!(config.platform, Platform::default());
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = parse(&environment("client_secret = \"x\"\nregion = \"eu\"")).unwrap();
        assert_eq!(config.resilience.retry.max_retries, 3);
        assert_eq!(config.platform.host, "pingone");
    }

    #[test]
    fn test_secret_from_environment_variable() {
        let content = environment("client_secret_env = \"DEV_SECRET\"\nregion = \"eu\"");
        let config = Config::parse(&content, Path::new("c.toml"), |var| {
            (var == "DEV_SECRET").then(|| "from-env".to_string())
        })
        .unwrap();
        assert_eq!(config.environments[0].client_secret, "from-env");

        let error = parse(&content).unwrap_err();
        assert!(error.to_string().contains("DEV_SECRET is not set"));
    }

    #[test]
    fn test_invalid_entries() {
        let bad_region = parse(&environment("client_secret = \"x\"\nregion = \"us\"")).unwrap_err();
        assert!(bad_region.to_string().contains("Invalid environment 'Dev US'"));
        assert!(bad_region.to_string().contains("unknown region 'us'"));

        let no_secret = parse(&environment("region = \"eu\"")).unwrap_err();
        assert!(no_secret.to_string().contains("missing client_secret"));

        let bad_uuid = parse(
            "[[environments]]\nname = \"X\"\ntenant_id = \"nope\"\nclient_id = \"nope\"\nclient_secret = \"s\"\nregion = \"eu\"\n",
        )
        .unwrap_err();
        assert!(bad_uuid.to_string().contains("tenant_id is not a UUID"));

        let unknown_key = parse("[platform]\nhots = \"x\"\n").unwrap_err();
        assert!(matches!(unknown_key, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_unknown_environment_lists_available() {
        let config = parse(&environment("client_secret = \"x\"\nregion = \"eu\"")).unwrap();
        let error = config.find_environment("Prod").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Environment 'Prod' not found (configured: Dev US)"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let error = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(error, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_example_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::write_example(&path).unwrap();
        assert!(matches!(
            Config::write_example(&path),
            Err(ConfigError::AlreadyExists { .. })
        ));

        let content = fs::read_to_string(&path).unwrap();
        let config = Config::parse(&content, &path, |_| Some("secret".to_string())).unwrap();
        assert_eq!(config.environment_names(), vec!["Development".to_string()]);
    }
}
