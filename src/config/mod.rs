use crate::error::{ForgeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR_NAME: &str = ".insightforge";
const CONFIG_FILE_NAME: &str = "config.yaml";
const DEFAULT_DATA_DIR: &str = "data";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sgis: SgisConfig,

    #[serde(default)]
    pub naver: NaverConfig,

    #[serde(default)]
    pub data: DataConfig,
}

/// SGIS OpenAPI credentials (consumer key / secret pair)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SgisConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_key: Option<String>,
}

/// Naver open-API application credentials
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NaverConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

/// Where collected/converted JSON files live
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl Config {
    /// Get the configuration directory path
    pub fn config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| ForgeError::Config("Could not determine home directory".to_string()))?;

        Ok(home_dir.join(CONFIG_DIR_NAME))
    }

    /// Get the configuration file full path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_path()?.join(CONFIG_FILE_NAME))
    }

    /// Initialize configuration directory and file
    pub fn initialize() -> Result<()> {
        let config_dir = Self::config_path()?;

        // Credentials live here, so keep permissions tight on Unix
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|e| {
                ForgeError::Config(format!("Failed to create config directory: {}", e))
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let permissions = fs::Permissions::from_mode(0o700);
                fs::set_permissions(&config_dir, permissions).map_err(|e| {
                    ForgeError::Config(format!("Failed to set directory permissions: {}", e))
                })?;
            }
        }

        let config_file = Self::config_file_path()?;

        if !config_file.exists() {
            let default_config = Self::default();
            let yaml = serde_yaml::to_string(&default_config)
                .map_err(|e| ForgeError::Config(format!("Failed to serialize config: {}", e)))?;

            fs::write(&config_file, yaml)
                .map_err(|e| ForgeError::Config(format!("Failed to write config file: {}", e)))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let permissions = fs::Permissions::from_mode(0o600);
                fs::set_permissions(&config_file, permissions).map_err(|e| {
                    ForgeError::Config(format!("Failed to set file permissions: {}", e))
                })?;
            }
        }

        Ok(())
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::initialize()?;

        let config_file = Self::config_file_path()?;
        let contents = fs::read_to_string(&config_file)
            .map_err(|e| ForgeError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_yaml::from_str(&contents)
            .map_err(|e| ForgeError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        Self::initialize()?;

        let config_file = Self::config_file_path()?;
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| ForgeError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_file, yaml)
            .map_err(|e| ForgeError::Config(format!("Failed to write config file: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&config_file, permissions)
                .map_err(|e| ForgeError::Config(format!("Failed to set file permissions: {}", e)))?;
        }

        Ok(())
    }

    /// Get the SGIS credential pair, erroring when either half is missing
    pub fn sgis_credentials(&self) -> Result<(String, String)> {
        match (&self.sgis.service_id, &self.sgis.security_key) {
            (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => {
                Ok((id.clone(), key.clone()))
            }
            _ => Err(ForgeError::NoSgisCredentials),
        }
    }

    /// Get the Naver credential pair, erroring when either half is missing
    pub fn naver_credentials(&self) -> Result<(String, String)> {
        match (&self.naver.client_id, &self.naver.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Ok((id.clone(), secret.clone()))
            }
            _ => Err(ForgeError::NoNaverCredentials),
        }
    }

    /// Resolve the data directory (collected/converted JSON lands here)
    pub fn data_dir(&self) -> PathBuf {
        self.data
            .dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Set a configuration value by key path
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "sgis.service_id" => self.sgis.service_id = Some(value.to_string()),
            "sgis.security_key" => self.sgis.security_key = Some(value.to_string()),
            "naver.client_id" => self.naver.client_id = Some(value.to_string()),
            "naver.client_secret" => self.naver.client_secret = Some(value.to_string()),
            "data.dir" => self.data.dir = Some(value.to_string()),
            _ => {
                return Err(ForgeError::Config(format!(
                    "Unknown configuration key: {}",
                    key
                )));
            }
        }

        self.save()?;
        Ok(())
    }

    /// Get a configuration value by key path
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "sgis.service_id" => self.sgis.service_id.clone(),
            "sgis.security_key" => self.sgis.security_key.clone(),
            "naver.client_id" => self.naver.client_id.clone(),
            "naver.client_secret" => self.naver.client_secret.clone(),
            "data.dir" => self.data.dir.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rejects_unknown_key() {
        let mut config = Config::default();
        // set() persists on success, so only the failure path is safe to
        // exercise without touching the real config file
        assert!(config.set("sgis.unknown", "x").is_err());
        assert!(config.set("law.key", "x").is_err());
    }

    #[test]
    fn test_get_known_keys() {
        let config = Config {
            sgis: SgisConfig {
                service_id: Some("abc".to_string()),
                security_key: Some("def".to_string()),
            },
            ..Default::default()
        };

        assert_eq!(config.get("sgis.service_id"), Some("abc".to_string()));
        assert_eq!(config.get("sgis.security_key"), Some("def".to_string()));
        assert_eq!(config.get("naver.client_id"), None);
        assert_eq!(config.get("nope"), None);
    }

    #[test]
    fn test_credentials_require_both_halves() {
        let mut config = Config::default();
        assert!(config.sgis_credentials().is_err());

        config.sgis.service_id = Some("id-only".to_string());
        assert!(config.sgis_credentials().is_err());

        config.sgis.security_key = Some("key".to_string());
        let (id, key) = config.sgis_credentials().unwrap();
        assert_eq!(id, "id-only");
        assert_eq!(key, "key");
    }

    #[test]
    fn test_default_data_dir() {
        let config = Config::default();
        assert_eq!(config.data_dir(), PathBuf::from("data"));

        let config = Config {
            data: DataConfig {
                dir: Some("/tmp/forge-data".to_string()),
            },
            ..Default::default()
        };
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/forge-data"));
    }
}
