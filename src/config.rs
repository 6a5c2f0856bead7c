use crate::storage::{StoreConfig, DEFAULT_DATABASE_FILE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Port the HTTP API listens on when nothing else is configured
pub const DEFAULT_PORT: u16 = 8501;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BizmanConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
}

impl BizmanConfig {
    /// Store configuration, with an explicit override taking precedence
    pub fn store_config(&self, database_override: Option<&Path>) -> StoreConfig {
        let path = database_override
            .map(Path::to_path_buf)
            .or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE));
        StoreConfig::new(path)
    }

    pub fn port(&self, port_override: Option<u16>) -> u16 {
        port_override.or(self.port).unwrap_or(DEFAULT_PORT)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("bizman.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<BizmanConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: BizmanConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &BizmanConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("bizman.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bizman.toml");
        let config = BizmanConfig {
            database: Some("data/records.db".into()),
            port: Some(9000),
        };

        write_config(&path, &config, false).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(config.clone()));

        // refuses to clobber without force
        assert!(write_config(&path, &BizmanConfig::default(), false).is_err());
        write_config(&path, &BizmanConfig::default(), true).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(BizmanConfig::default()));
    }

    #[test]
    fn test_precedence() {
        let config = BizmanConfig {
            database: Some("from_config.db".into()),
            port: Some(9000),
        };
        assert_eq!(config.store_config(None).path, PathBuf::from("from_config.db"));
        assert_eq!(
            config.store_config(Some(Path::new("flag.db"))).path,
            PathBuf::from("flag.db")
        );
        assert_eq!(
            BizmanConfig::default().store_config(None).path,
            PathBuf::from(DEFAULT_DATABASE_FILE)
        );
        assert_eq!(config.port(None), 9000);
        assert_eq!(config.port(Some(8080)), 8080);
        assert_eq!(BizmanConfig::default().port(None), DEFAULT_PORT);
    }

    #[test]
    fn test_ensure_db_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("deeper").join("records.db");
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
