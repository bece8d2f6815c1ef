use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::codec::{TextClassifier, DEFAULT_MAX_NUL_RATIO};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VaultConfig {
    pub database: Option<String>,
    pub max_nul_ratio: Option<f64>,
}

impl VaultConfig {
    /// Classifier for the configured ratio, or the default one
    pub fn classifier(&self) -> anyhow::Result<TextClassifier> {
        let ratio = self.max_nul_ratio.unwrap_or(DEFAULT_MAX_NUL_RATIO);
        if !(0.0..=1.0).contains(&ratio) {
            anyhow::bail!("max_nul_ratio must be between 0.0 and 1.0 (got {})", ratio);
        }
        Ok(TextClassifier::new(ratio))
    }

    /// Database path: explicit override, then config, then the default
    pub fn database_path(&self, cli_override: Option<&Path>, base: &Path) -> PathBuf {
        if let Some(path) = cli_override {
            return path.to_path_buf();
        }
        match &self.database {
            Some(db) => PathBuf::from(db),
            None => default_database_path_in(base),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("filevault.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".filevault").join("vault.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<VaultConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: VaultConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &VaultConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
