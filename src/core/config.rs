//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.herald/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::filter::DEFAULT_THRESHOLD;
use crate::core::notice::DEFAULT_TRANSIENT_SECONDS;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HeraldConfig {
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub app_store: AppStoreConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NotificationsConfig {
    pub transient_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchConfig {
    pub threshold: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AppStoreConfig {
    pub lookup_url: Option<String>,
    pub cache_minutes: Option<u64>,
    pub bundle_id: Option<String>,
    pub current_version: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOOKUP_URL: &str = "https://itunes.apple.com/lookup";
pub const DEFAULT_CACHE_MINUTES: u64 = 30;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub transient_seconds: u64,
    pub search_threshold: f64,
    pub lookup_url: String,
    pub cache_ttl: Duration,
    pub bundle_id: Option<String>,
    pub current_version: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.herald/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".herald").join("config.toml"))
}

/// Load config from `~/.herald/config.toml`.
pub fn load_config() -> Result<HeraldConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(HeraldConfig::default())
        }
    }
}

/// Load config from an explicit path.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `HeraldConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<HeraldConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(HeraldConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: HeraldConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Herald Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [notifications]
# transient_seconds = 5              # How long info/success notices stay up

# [search]
# threshold = 0.45                   # 0.0 = exact only, 1.0 = anything

# [app_store]
# lookup_url = "https://itunes.apple.com/lookup"   # Or HERALD_LOOKUP_URL
# cache_minutes = 30
# bundle_id = "com.example.app"      # Or HERALD_BUNDLE_ID
# current_version = "1.0.0"          # Or HERALD_CURRENT_VERSION
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// CLI overrides (None = flag not given).
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub bundle_id: Option<&'a str>,
    pub current_version: Option<&'a str>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &HeraldConfig, cli: &CliOverrides<'_>) -> ResolvedConfig {
    // Lookup URL: env → config → default
    let lookup_url = std::env::var("HERALD_LOOKUP_URL")
        .ok()
        .or_else(|| config.app_store.lookup_url.clone())
        .unwrap_or_else(|| DEFAULT_LOOKUP_URL.to_string());

    // Bundle id: CLI → env → config
    let bundle_id = cli
        .bundle_id
        .map(|s| s.to_string())
        .or_else(|| std::env::var("HERALD_BUNDLE_ID").ok())
        .or_else(|| config.app_store.bundle_id.clone());

    // Current version: CLI → env → config
    let current_version = cli
        .current_version
        .map(|s| s.to_string())
        .or_else(|| std::env::var("HERALD_CURRENT_VERSION").ok())
        .or_else(|| config.app_store.current_version.clone());

    let search_threshold = match config.search.threshold {
        Some(t) if (0.0..=1.0).contains(&t) => t,
        Some(t) => {
            warn!("Search threshold {} outside 0.0..=1.0, using default", t);
            DEFAULT_THRESHOLD
        }
        None => DEFAULT_THRESHOLD,
    };

    ResolvedConfig {
        transient_seconds: config
            .notifications
            .transient_seconds
            .unwrap_or(DEFAULT_TRANSIENT_SECONDS),
        search_threshold,
        lookup_url,
        cache_ttl: resolve_cache_ttl(config.app_store.cache_minutes),
        bundle_id,
        current_version,
    }
}

/// Cache TTL from minutes; values too large to express in seconds fall back to the default.
fn resolve_cache_ttl(minutes: Option<u64>) -> Duration {
    let minutes = minutes.unwrap_or(DEFAULT_CACHE_MINUTES);
    match minutes.checked_mul(60) {
        Some(secs) => Duration::from_secs(secs),
        None => {
            warn!("Cache duration of {} minutes is too large, using default", minutes);
            Duration::from_secs(DEFAULT_CACHE_MINUTES * 60)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = HeraldConfig::default();
        assert!(config.app_store.bundle_id.is_none());
        assert!(config.search.threshold.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve(&HeraldConfig::default(), &CliOverrides::default());
        assert_eq!(resolved.transient_seconds, DEFAULT_TRANSIENT_SECONDS);
        assert_eq!(resolved.search_threshold, DEFAULT_THRESHOLD);
        assert_eq!(resolved.cache_ttl, Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = HeraldConfig {
            notifications: NotificationsConfig {
                transient_seconds: Some(3),
            },
            search: SearchConfig {
                threshold: Some(0.3),
            },
            app_store: AppStoreConfig {
                cache_minutes: Some(5),
                ..Default::default()
            },
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.transient_seconds, 3);
        assert_eq!(resolved.search_threshold, 0.3);
        assert_eq!(resolved.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_out_of_range_threshold_falls_back() {
        let config = HeraldConfig {
            search: SearchConfig {
                threshold: Some(45.0),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.search_threshold, DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_oversized_cache_minutes_falls_back() {
        let config = HeraldConfig {
            app_store: AppStoreConfig {
                cache_minutes: Some(u64::MAX),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(
            resolved.cache_ttl,
            Duration::from_secs(DEFAULT_CACHE_MINUTES * 60)
        );
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = HeraldConfig {
            app_store: AppStoreConfig {
                bundle_id: Some("com.example.config".to_string()),
                current_version: Some("1.0.0".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            bundle_id: Some("com.example.cli"),
            current_version: Some("2.0.0"),
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.bundle_id.as_deref(), Some("com.example.cli"));
        assert_eq!(resolved.current_version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[app_store]
bundle_id = "com.example.app"
"#;
        let config: HeraldConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.app_store.bundle_id.as_deref(), Some("com.example.app"));
        assert!(config.app_store.lookup_url.is_none());
        assert!(config.notifications.transient_seconds.is_none());
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = std::env::temp_dir().join(format!("herald-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.app_store.bundle_id.is_none());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Herald Configuration"));

        // The generated file is all comments, so it loads as defaults too
        let reloaded = load_config_from(&path).unwrap();
        assert!(reloaded.search.threshold.is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("herald-test-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[search\nthreshold = ").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_dir_all(dir);
    }
}
