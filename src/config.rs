use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::model::asset::{px_std_column, volume_column, volume_std_column};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub matrix: MatrixConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

/// Assets and window lengths for one design-matrix build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatrixConfig {
    pub x_cryptos: Vec<String>,
    pub y_crypto: String,
    #[serde(default)]
    pub x_assets: Vec<String>,
    pub n_rolling_price: usize,
    pub n_rolling_volume: usize,
    pub n_std_window: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub db_path: PathBuf,
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl MatrixConfig {
    /// Trim every symbol and check the settings, consuming `self`.
    pub fn validated(mut self) -> Result<Self, ConfigurationError> {
        self.y_crypto = self.y_crypto.trim().to_string();
        self.x_cryptos = self.x_cryptos.iter().map(|s| s.trim().to_string()).collect();
        self.x_assets = self.x_assets.iter().map(|s| s.trim().to_string()).collect();

        if self.y_crypto.is_empty() {
            return Err(ConfigurationError::EmptyTarget);
        }
        if self.x_cryptos.is_empty() {
            return Err(ConfigurationError::EmptyExplanatory);
        }
        if self.x_cryptos.iter().any(String::is_empty) {
            return Err(ConfigurationError::EmptySymbol { field: "x_cryptos" });
        }
        if self.x_assets.iter().any(String::is_empty) {
            return Err(ConfigurationError::EmptySymbol { field: "x_assets" });
        }

        for (name, value) in [
            ("n_rolling_price", self.n_rolling_price),
            ("n_rolling_volume", self.n_rolling_volume),
            ("n_std_window", self.n_std_window),
        ] {
            if value == 0 {
                return Err(ConfigurationError::InvalidWindow { name, value });
            }
        }

        if self.x_cryptos.contains(&self.y_crypto) {
            return Err(ConfigurationError::TargetInExplanatory(self.y_crypto.clone()));
        }

        if let Some(dup) = first_duplicate(self.all_symbols().map(str::to_string)) {
            return Err(ConfigurationError::DuplicateSymbol(dup));
        }
        if let Some(column) = first_duplicate(self.output_columns().into_iter()) {
            return Err(ConfigurationError::ColumnCollision(column));
        }

        Ok(self)
    }

    /// Target first, then the explanatory cryptos in configured order.
    pub fn cryptos(&self) -> Vec<&str> {
        std::iter::once(self.y_crypto.as_str())
            .chain(self.x_cryptos.iter().map(String::as_str))
            .collect()
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.y_crypto.as_str())
            .chain(self.x_cryptos.iter().map(String::as_str))
            .chain(self.x_assets.iter().map(String::as_str))
    }

    /// Column names of the finished matrix, in table order.
    pub fn output_columns(&self) -> Vec<String> {
        let mut out = Vec::new();
        for sym in self.cryptos() {
            out.push(sym.to_string());
            out.push(volume_column(sym));
        }
        for sym in &self.x_assets {
            out.push(sym.clone());
        }
        out.push(px_std_column(&self.y_crypto));
        out.push(volume_std_column(&self.y_crypto));
        out
    }
}

fn first_duplicate(items: impl Iterator<Item = String>) -> Option<String> {
    let mut seen = HashSet::new();
    items.into_iter().find(|item| !seen.insert(item.clone()))
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Read a TOML config, apply `DESIGN_MATRIX_DB` / `DESIGN_MATRIX_OUTPUT`
    /// overrides from the environment (or `.env`), and validate `[matrix]`.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if let Ok(db_path) = std::env::var("DESIGN_MATRIX_DB") {
            config.data.db_path = PathBuf::from(db_path);
        }
        if let Ok(output_path) = std::env::var("DESIGN_MATRIX_OUTPUT") {
            config.data.output_path = Some(PathBuf::from(output_path));
        }

        config.matrix = config
            .matrix
            .validated()
            .context("[matrix] section is invalid")?;

        Ok(config)
    }
}
