use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_file: PathBuf,
    pub backup_corrupt: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("attendance.json"),
            backup_corrupt: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Data file to use, honoring a command-line override
    pub fn data_file(&self, override_path: Option<&PathBuf>) -> PathBuf {
        override_path
            .cloned()
            .unwrap_or_else(|| self.storage.data_file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.storage.data_file, PathBuf::from("attendance.json"));
        assert!(config.storage.backup_corrupt);
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rollcall.yml");
        fs::write(
            &path,
            "log_level: debug\nstorage:\n  data_file: /var/lib/rollcall/students.json\n  backup_corrupt: false\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.storage.data_file, PathBuf::from("/var/lib/rollcall/students.json"));
        assert!(!config.storage.backup_corrupt);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rollcall.yml");
        fs::write(&path, "storage:\n  data_file: class.json\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.storage.data_file, PathBuf::from("class.json"));
        assert!(config.storage.backup_corrupt);
        assert_eq!(config.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_invalid_yaml_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rollcall.yml");
        fs::write(&path, "storage: [unclosed").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_data_file_override() {
        let config = Config::default();
        assert_eq!(config.data_file(None), PathBuf::from("attendance.json"));

        let custom = PathBuf::from("/tmp/other.json");
        assert_eq!(config.data_file(Some(&custom)), custom);
    }
}
