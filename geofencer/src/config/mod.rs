//! Configuration file handling.
//!
//! Settings live in an INI file under the user config directory
//! (`geofencer/config.ini`). The file carries the demo fence definition,
//! session deadlines, and logging settings; the [`ConfigKey`] enum powers
//! the CLI `config get/set/list` commands.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::fence::{FenceError, GeofenceSpec, TransitionMask, TriggerAction};
use crate::service::ServiceConfig;

/// Default fence id (the Tokyo Skytree demo fence).
pub const DEFAULT_FENCE_ID: &str = "tokyo_skytree";
/// Default fence center latitude.
pub const DEFAULT_FENCE_LATITUDE: f64 = 35.710057714926265;
/// Default fence center longitude.
pub const DEFAULT_FENCE_LONGITUDE: f64 = 139.81071829999996;
/// Default fence radius in meters.
pub const DEFAULT_FENCE_RADIUS: f32 = 200.0;
/// Default URI opened when the fence is entered.
pub const DEFAULT_TRIGGER_URL: &str = "http://www.tokyo-skytree.jp/";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 60;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config directory could not be determined.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// Reading or parsing the config file failed.
    #[error("failed to load {}: {reason}", path.display())]
    LoadFailed { path: PathBuf, reason: String },

    /// Writing the config file failed.
    #[error("failed to save {}: {reason}", path.display())]
    SaveFailed { path: PathBuf, reason: String },

    /// A value could not be parsed for its key.
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// The configured fence definition is invalid.
    #[error("invalid fence configuration: {0}")]
    InvalidFence(#[from] FenceError),
}

/// Fence definition section.
#[derive(Debug, Clone, PartialEq)]
pub struct FenceSettings {
    /// Fence request id.
    pub id: String,
    /// Center latitude in degrees.
    pub latitude: f64,
    /// Center longitude in degrees.
    pub longitude: f64,
    /// Radius in meters.
    pub radius: f32,
    /// URI opened when the fence is entered.
    pub trigger_url: String,
}

impl Default for FenceSettings {
    fn default() -> Self {
        Self {
            id: DEFAULT_FENCE_ID.to_string(),
            latitude: DEFAULT_FENCE_LATITUDE,
            longitude: DEFAULT_FENCE_LONGITUDE,
            radius: DEFAULT_FENCE_RADIUS,
            trigger_url: DEFAULT_TRIGGER_URL.to_string(),
        }
    }
}

/// Session deadline section.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Connect deadline in seconds.
    pub connect_timeout: u64,
    /// Operation deadline in seconds.
    pub operation_timeout: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT_SECS,
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log filter level (e.g. `info`, `geofencer=debug`).
    pub level: String,
    /// Directory for log files; empty disables file logging.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            directory: None,
        }
    }
}

/// Path to the configuration file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join("geofencer").join("config.ini"))
}

/// Loaded configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// `[fence]` section.
    pub fence: FenceSettings,
    /// `[session]` section.
    pub session: SessionSettings,
    /// `[logging]` section.
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default config path.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path()?)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("fence")) {
            if let Some(id) = section.get("id") {
                config.fence.id = id.to_string();
            }
            if let Some(value) = section.get("latitude") {
                config.fence.latitude = parse_value("fence.latitude", value)?;
            }
            if let Some(value) = section.get("longitude") {
                config.fence.longitude = parse_value("fence.longitude", value)?;
            }
            if let Some(value) = section.get("radius") {
                config.fence.radius = parse_value("fence.radius", value)?;
            }
            if let Some(url) = section.get("trigger_url") {
                config.fence.trigger_url = url.to_string();
            }
        }

        if let Some(section) = ini.section(Some("session")) {
            if let Some(value) = section.get("connect_timeout") {
                config.session.connect_timeout = parse_value("session.connect_timeout", value)?;
            }
            if let Some(value) = section.get("operation_timeout") {
                config.session.operation_timeout =
                    parse_value("session.operation_timeout", value)?;
            }
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(level) = section.get("level") {
                config.logging.level = level.to_string();
            }
            if let Some(dir) = section.get("directory") {
                if !dir.is_empty() {
                    config.logging.directory = Some(PathBuf::from(dir));
                }
            }
        }

        Ok(config)
    }

    /// Save to the default config path, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path()?)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("fence"))
            .set("id", self.fence.id.clone())
            .set("latitude", self.fence.latitude.to_string())
            .set("longitude", self.fence.longitude.to_string())
            .set("radius", self.fence.radius.to_string())
            .set("trigger_url", self.fence.trigger_url.clone());
        ini.with_section(Some("session"))
            .set("connect_timeout", self.session.connect_timeout.to_string())
            .set(
                "operation_timeout",
                self.session.operation_timeout.to_string(),
            );
        ini.with_section(Some("logging"))
            .set("level", self.logging.level.clone())
            .set(
                "directory",
                self.logging
                    .directory
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );

        ini.write_to_file(path).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            reason: e.to_string(),
        })
    }

    /// Build the configured fence specification (enter-only, never
    /// expires, opens the trigger URL).
    pub fn fence_spec(&self) -> Result<GeofenceSpec, ConfigError> {
        let spec = GeofenceSpec::builder(self.fence.id.clone())
            .with_center(self.fence.latitude, self.fence.longitude)
            .with_radius_meters(self.fence.radius)
            .with_transitions(TransitionMask::ENTER)
            .with_trigger(TriggerAction::open_uri(self.fence.trigger_url.clone()))
            .build()?;
        Ok(spec)
    }

    /// Build the session service configuration.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::default()
            .with_connect_timeout(Duration::from_secs(self.session.connect_timeout))
            .with_operation_timeout(Duration::from_secs(self.session.operation_timeout))
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Addressable configuration keys for the CLI `config` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    FenceId,
    FenceLatitude,
    FenceLongitude,
    FenceRadius,
    FenceTriggerUrl,
    SessionConnectTimeout,
    SessionOperationTimeout,
    LoggingLevel,
    LoggingDirectory,
}

impl ConfigKey {
    /// All keys, grouped by section for listing.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::FenceId,
            ConfigKey::FenceLatitude,
            ConfigKey::FenceLongitude,
            ConfigKey::FenceRadius,
            ConfigKey::FenceTriggerUrl,
            ConfigKey::SessionConnectTimeout,
            ConfigKey::SessionOperationTimeout,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingDirectory,
        ]
    }

    /// Section this key belongs to.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::FenceId
            | ConfigKey::FenceLatitude
            | ConfigKey::FenceLongitude
            | ConfigKey::FenceRadius
            | ConfigKey::FenceTriggerUrl => "fence",
            ConfigKey::SessionConnectTimeout | ConfigKey::SessionOperationTimeout => "session",
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::FenceId => "id",
            ConfigKey::FenceLatitude => "latitude",
            ConfigKey::FenceLongitude => "longitude",
            ConfigKey::FenceRadius => "radius",
            ConfigKey::FenceTriggerUrl => "trigger_url",
            ConfigKey::SessionConnectTimeout => "connect_timeout",
            ConfigKey::SessionOperationTimeout => "operation_timeout",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Fully qualified `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Read this key's value from the config.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::FenceId => config.fence.id.clone(),
            ConfigKey::FenceLatitude => config.fence.latitude.to_string(),
            ConfigKey::FenceLongitude => config.fence.longitude.to_string(),
            ConfigKey::FenceRadius => config.fence.radius.to_string(),
            ConfigKey::FenceTriggerUrl => config.fence.trigger_url.clone(),
            ConfigKey::SessionConnectTimeout => config.session.connect_timeout.to_string(),
            ConfigKey::SessionOperationTimeout => config.session.operation_timeout.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }

    /// Write this key's value into the config.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        match self {
            ConfigKey::FenceId => config.fence.id = value.to_string(),
            ConfigKey::FenceLatitude => {
                config.fence.latitude = parse_value(&self.name(), value)?;
            }
            ConfigKey::FenceLongitude => {
                config.fence.longitude = parse_value(&self.name(), value)?;
            }
            ConfigKey::FenceRadius => {
                config.fence.radius = parse_value(&self.name(), value)?;
            }
            ConfigKey::FenceTriggerUrl => config.fence.trigger_url = value.to_string(),
            ConfigKey::SessionConnectTimeout => {
                config.session.connect_timeout = parse_value(&self.name(), value)?;
            }
            ConfigKey::SessionOperationTimeout => {
                config.session.operation_timeout = parse_value(&self.name(), value)?;
            }
            ConfigKey::LoggingLevel => config.logging.level = value.to_string(),
            ConfigKey::LoggingDirectory => {
                config.logging.directory = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .find(|key| key.name() == s)
            .copied()
            .ok_or(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_demo_fence() {
        let config = ConfigFile::default();
        assert_eq!(config.fence.id, "tokyo_skytree");
        assert_eq!(config.fence.latitude, 35.710057714926265);
        assert_eq!(config.fence.longitude, 139.81071829999996);
        assert_eq!(config.fence.radius, 200.0);
        assert_eq!(config.fence.trigger_url, "http://www.tokyo-skytree.jp/");
        assert_eq!(config.session.connect_timeout, 30);
        assert_eq!(config.session.operation_timeout, 60);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.fence.id = "office".to_string();
        config.fence.latitude = 51.5074;
        config.session.connect_timeout = 10;
        config.logging.level = "debug".to_string();
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.ini");
        assert!(matches!(
            ConfigFile::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[fence]\nid = somewhere\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.fence.id, "somewhere");
        // Unset keys fall back to defaults.
        assert_eq!(config.fence.radius, DEFAULT_FENCE_RADIUS);
        assert_eq!(config.session.connect_timeout, 30);
    }

    #[test]
    fn test_invalid_number_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[fence]\nlatitude = north\n").unwrap();

        assert!(matches!(
            ConfigFile::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_fence_spec_from_defaults() {
        let spec = ConfigFile::default().fence_spec().unwrap();
        assert_eq!(spec.request_id(), "tokyo_skytree");
        assert_eq!(spec.radius_meters(), 200.0);
        assert_eq!(spec.trigger().uri(), "http://www.tokyo-skytree.jp/");
    }

    #[test]
    fn test_fence_spec_rejects_invalid_settings() {
        let mut config = ConfigFile::default();
        config.fence.radius = -1.0;
        assert!(matches!(
            config.fence_spec(),
            Err(ConfigError::InvalidFence(_))
        ));
    }

    #[test]
    fn test_config_key_parse_and_name() {
        let key: ConfigKey = "fence.latitude".parse().unwrap();
        assert_eq!(key, ConfigKey::FenceLatitude);
        assert_eq!(key.name(), "fence.latitude");
        assert!("fence.unknown".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_config_key_get_set() {
        let mut config = ConfigFile::default();
        let key = ConfigKey::SessionConnectTimeout;

        key.set(&mut config, "15").unwrap();
        assert_eq!(config.session.connect_timeout, 15);
        assert_eq!(key.get(&config), "15");

        assert!(key.set(&mut config, "soon").is_err());
    }

    #[test]
    fn test_service_config_translation() {
        let mut config = ConfigFile::default();
        config.session.connect_timeout = 5;
        config.session.operation_timeout = 9;

        let service = config.service_config();
        assert_eq!(service.connect_timeout, Duration::from_secs(5));
        assert_eq!(service.operation_timeout, Duration::from_secs(9));
    }
}
