use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use zonecraft_shared::constants::{
    DEFAULT_PALETTE_COLUMNS, DEFAULT_PALETTE_ROWS, DEFAULT_ZONE_HEIGHT, DEFAULT_ZONE_WIDTH,
    MAX_BRUSH_SIZE, MAX_PALETTE_DIMENSION, MAX_ZONE_DIMENSION, MIN_BRUSH_SIZE,
    MIN_PALETTE_DIMENSION, MIN_ZONE_DIMENSION,
};

pub const DEFAULT_CONFIG_PATH: &str = "zonecraft.toml";
pub const API_URL_ENV: &str = "ZONECRAFT_API_URL";

#[derive(Resource, Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub api: Api,
    pub palette: PaletteDefaults,
    pub zone: ZoneDefaults,
    pub brush: BrushDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Api {
    pub base_url: String,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaletteDefaults {
    pub rows: u32,
    pub columns: u32,
}

impl Default for PaletteDefaults {
    fn default() -> Self {
        Self {
            rows: DEFAULT_PALETTE_ROWS,
            columns: DEFAULT_PALETTE_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ZoneDefaults {
    pub width: u32,
    pub height: u32,
}

impl Default for ZoneDefaults {
    fn default() -> Self {
        Self {
            width: DEFAULT_ZONE_WIDTH,
            height: DEFAULT_ZONE_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BrushDefaults {
    pub size: u32,
}

impl Default for BrushDefaults {
    fn default() -> Self {
        Self { size: MIN_BRUSH_SIZE }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl EditorConfig {
    /// Load `path` (defaults when it doesn't exist), then apply `.env` and
    /// `ZONECRAFT_API_URL`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if dotenvy::dotenv().is_ok() {
            debug!("Loaded .env");
        }

        let config = if path.exists() {
            let config_str = fs::read_to_string(path)
                .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
            Self::from_toml_str(&config_str)?
        } else {
            info!("No config at {}, using defaults", path.display());
            Self::default()
        };

        let config = config.with_api_url_override(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        info!("Configuration loaded (api: {})", config.api.base_url);
        Ok(config)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(config_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            info!("API url overridden by {}", API_URL_ENV);
            self.api.base_url = url.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".to_string()));
        }

        let palette_range = MIN_PALETTE_DIMENSION..=MAX_PALETTE_DIMENSION;
        if !palette_range.contains(&self.palette.rows) || !palette_range.contains(&self.palette.columns) {
            return Err(ConfigError::Invalid(format!(
                "palette size must be within {}..={}",
                MIN_PALETTE_DIMENSION, MAX_PALETTE_DIMENSION
            )));
        }

        let zone_range = MIN_ZONE_DIMENSION..=MAX_ZONE_DIMENSION;
        if !zone_range.contains(&self.zone.width) || !zone_range.contains(&self.zone.height) {
            return Err(ConfigError::Invalid(format!(
                "zone size must be within {}..={}",
                MIN_ZONE_DIMENSION, MAX_ZONE_DIMENSION
            )));
        }

        if !(MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE).contains(&self.brush.size) {
            return Err(ConfigError::Invalid(format!(
                "brush.size must be within {}..={}",
                MIN_BRUSH_SIZE, MAX_BRUSH_SIZE
            )));
        }

        if self.api.base_url.starts_with("http://") && !self.api.base_url.contains("localhost") {
            warn!("Catalog API is not using https: {}", self.api.base_url);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = EditorConfig::from_toml_str(
            r#"
            [palette]
            rows = 8

            [brush]
            size = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.palette.rows, 8);
        assert_eq!(config.palette.columns, DEFAULT_PALETTE_COLUMNS);
        assert_eq!(config.brush.size, 3);
        assert_eq!(config.zone, ZoneDefaults::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override() {
        let config = EditorConfig::default()
            .with_api_url_override(Some(" https://content.example/api ".to_string()));
        assert_eq!(config.api.base_url, "https://content.example/api");

        let config = EditorConfig::default().with_api_url_override(Some("  ".to_string()));
        assert_eq!(config.api, Api::default());
    }

    #[test]
    fn test_validation() {
        let mut config = EditorConfig::default();
        config.palette.columns = 21;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EditorConfig::default();
        config.brush.size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EditorConfig::default();
        config.zone.height = 300;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = EditorConfig::from_toml_str("[palette\nrows = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = EditorConfig::load("does/not/exist/zonecraft.toml").unwrap();
        assert_eq!(config.palette, PaletteDefaults::default());
        assert_eq!(config.zone, ZoneDefaults::default());
    }
}
