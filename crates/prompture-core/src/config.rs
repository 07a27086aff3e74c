use crate::error::Result;
use crate::io;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_retention_days() -> u32 {
    30
}

fn default_temp_extensions() -> Vec<String> {
    vec!["tmp".to_string(), "temp".to_string(), "bak".to_string()]
}

/// Settings read from `ai-docs/config.yaml`. Every field has a default, so a
/// missing or partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Days after which the active context and summary weeks are archived.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Extensions (without the dot) removed by `clean --clean-temp`.
    #[serde(default = "default_temp_extensions")]
    pub temp_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            temp_extensions: default_temp_extensions(),
        }
    }
}

impl Config {
    pub fn load(docs: &Path) -> Result<Self> {
        let path = paths::config_path(docs);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = io::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, docs: &Path) -> Result<()> {
        let path = paths::config_path(docs);
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&path, data.as_bytes())
    }

    pub fn is_temp_file(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .map(|ext| {
                self.temp_extensions
                    .iter()
                    .any(|t| ext.eq_ignore_ascii_case(t.trim_start_matches('.')))
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(paths::config_path(dir.path()), "retention_days: 14\n").unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.retention_days, 14);
        assert_eq!(cfg.temp_extensions, vec!["tmp", "temp", "bak"]);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            retention_days: 7,
            temp_extensions: vec!["swp".to_string()],
        };
        cfg.save(dir.path()).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(paths::config_path(dir.path()), "retention_days: [oops").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }

    #[test]
    fn temp_file_matching() {
        let cfg = Config::default();
        assert!(cfg.is_temp_file("draft.tmp"));
        assert!(cfg.is_temp_file("old.BAK"));
        assert!(!cfg.is_temp_file("notes.md"));
        assert!(!cfg.is_temp_file("tmp"));
    }
}
