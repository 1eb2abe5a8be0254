//! Runtime configuration from `.env` files and `QRSNAP_*` environment variables.
//!
//! Loaded once at start-up and managed as Tauri state.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CAPTURE_PADDING: u32 = 48;
pub const DEFAULT_CLOSE_DELAY_MS: u64 = 200;
pub const DEFAULT_CROP_SHORTCUT: &str = "ctrl+shift+q";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Extra rows captured below a selection.
    pub capture_padding: u32,
    /// How long a crop window stays open after codes were found.
    pub close_delay: Duration,
    pub copy_to_clipboard: bool,
    /// Downsample captures to this size before decoding (0 = never).
    pub decode_max_dim: u32,
    /// Global shortcut that opens a crop window.
    pub crop_shortcut: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capture_padding: DEFAULT_CAPTURE_PADDING,
            close_delay: Duration::from_millis(DEFAULT_CLOSE_DELAY_MS),
            copy_to_clipboard: true,
            decode_max_dim: 0,
            crop_shortcut: Some(DEFAULT_CROP_SHORTCUT.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{key}: expected an unsigned integer, got '{value}'")]
    NotANumber { key: &'static str, value: String },

    #[error("{key}: expected true/false, got '{value}'")]
    NotABool { key: &'static str, value: String },
}

impl AppConfig {
    /// Reads `.env` files, then the process environment.
    ///
    /// Variables already set in the environment win over `.env` entries.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::info!("[CONFIG] loaded {}", path.display());
        }
        if let Some(path) = user_env_file().filter(|p| p.exists()) {
            match dotenvy::from_path(&path) {
                Ok(()) => log::info!("[CONFIG] loaded {}", path.display()),
                Err(e) => log::warn!("[CONFIG] ignoring {}: {}", path.display(), e),
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from a variable lookup; unset keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("QRSNAP_CAPTURE_PADDING") {
            config.capture_padding = parse_number("QRSNAP_CAPTURE_PADDING", &v)?;
        }
        if let Some(v) = lookup("QRSNAP_CLOSE_DELAY_MS") {
            config.close_delay = Duration::from_millis(parse_number("QRSNAP_CLOSE_DELAY_MS", &v)?);
        }
        if let Some(v) = lookup("QRSNAP_COPY_TO_CLIPBOARD") {
            config.copy_to_clipboard = parse_bool("QRSNAP_COPY_TO_CLIPBOARD", &v)?;
        }
        if let Some(v) = lookup("QRSNAP_DECODE_MAX_DIM") {
            config.decode_max_dim = parse_number("QRSNAP_DECODE_MAX_DIM", &v)?;
        }
        if let Some(v) = lookup("QRSNAP_CROP_SHORTCUT") {
            let v = v.trim();
            config.crop_shortcut = (!v.is_empty()).then(|| v.to_string());
        }

        Ok(config)
    }
}

/// `<config dir>/qrsnap/.env`
fn user_env_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("qrsnap").join(".env"))
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::NotANumber {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::NotABool {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]).unwrap(), AppConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("QRSNAP_CAPTURE_PADDING", "0"),
            ("QRSNAP_CLOSE_DELAY_MS", " 500 "),
            ("QRSNAP_COPY_TO_CLIPBOARD", "off"),
            ("QRSNAP_DECODE_MAX_DIM", "1920"),
            ("QRSNAP_CROP_SHORTCUT", "alt+q"),
        ])
        .unwrap();

        assert_eq!(config.capture_padding, 0);
        assert_eq!(config.close_delay, Duration::from_millis(500));
        assert!(!config.copy_to_clipboard);
        assert_eq!(config.decode_max_dim, 1920);
        assert_eq!(config.crop_shortcut.as_deref(), Some("alt+q"));
    }

    #[test]
    fn empty_shortcut_disables_it() {
        let config = config_from(&[("QRSNAP_CROP_SHORTCUT", "  ")]).unwrap();
        assert_eq!(config.crop_shortcut, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[("QRSNAP_CAPTURE_PADDING", "-3")]),
            Err(ConfigError::NotANumber { key: "QRSNAP_CAPTURE_PADDING", .. })
        ));
        assert!(matches!(
            config_from(&[("QRSNAP_COPY_TO_CLIPBOARD", "maybe")]),
            Err(ConfigError::NotABool { .. })
        ));
    }
}
