//! Configuration schema, defaults, and layered loading.
//!
//! Precedence: defaults < config file < environment < CLI
use anyhow::{ensure, Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const MAX_SHUTDOWN_GRACE_SECS: u64 = 300;
const DEFAULT_PRODUCT: &str = "QRshare";
const DEFAULT_SERVICE_TYPE: &str = "_http._tcp.local.";

pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "qrshare")
        .map(|p| p.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("qrshare.toml"))
}

/// Identity published in the service advertisement record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub product: String,
    pub vendor: String,
    pub service_type: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            product: DEFAULT_PRODUCT.to_string(),
            vendor: DEFAULT_PRODUCT.to_string(),
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSettings {
    /// Icon themes searched in order.
    pub themes: Vec<String>,
    /// Preferred raster size in pixels.
    pub size: u32,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            themes: ["Adwaita", "gnome", "Humanity", "hicolor"]
                .into_iter()
                .map(String::from)
                .collect(),
            size: 48,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub show_qr: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { show_qr: true }
    }
}

/// Fully resolved application configuration after all layers merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listen port; 0 picks an OS-assigned ephemeral port on every start.
    pub port: u16,
    pub advertise: bool,
    pub shutdown_grace_secs: u64,
    pub service: ServiceSettings,
    pub icons: IconSettings,
    pub ui: UiSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 0,
            advertise: true,
            shutdown_grace_secs: 5,
            service: ServiceSettings::default(),
            icons: IconSettings::default(),
            ui: UiSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.shutdown_grace_secs <= MAX_SHUTDOWN_GRACE_SECS,
            "Invalid config: shutdown_grace_secs must be <= {MAX_SHUTDOWN_GRACE_SECS}"
        );
        ensure!(
            !self.service.product.trim().is_empty(),
            "Invalid config: service.product must not be empty"
        );
        ensure!(
            self.service.service_type.starts_with('_')
                && self.service.service_type.ends_with("._tcp.local."),
            "Invalid config: service.service_type must look like _name._tcp.local."
        );
        ensure!(self.icons.size > 0, "Invalid config: icons.size must be > 0");
        Ok(())
    }
}

/// Values supplied on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertise: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_qr: Option<bool>,
}

/// Loads config from defaults/file/env, then applies CLI overrides.
pub fn load_config(overrides: &ConfigOverrides) -> Result<AppConfig> {
    let path = config_path();

    let config: AppConfig = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("QRSHARE_").split("__"))
        .extract()
        .context("Failed to load configuration")?;

    let config = apply_overrides(config, overrides);
    config.validate()?;

    Ok(config)
}

pub fn apply_overrides(mut config: AppConfig, overrides: &ConfigOverrides) -> AppConfig {
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if let Some(advertise) = overrides.advertise {
        config.advertise = advertise;
    }
    if let Some(show_qr) = overrides.show_qr {
        config.ui.show_qr = show_qr;
    }
    config
}

/// Resolved config rendered the way it would be written to disk.
pub fn to_toml(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        AppConfig::default().validate().expect("defaults are valid");
    }

    #[test]
    fn rejects_non_tcp_service_type() {
        let mut config = AppConfig::default();
        config.service.service_type = "_http._udp.local.".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn overrides_only_touch_supplied_fields() {
        let overrides = ConfigOverrides {
            port: Some(8080),
            ..Default::default()
        };
        let config = apply_overrides(AppConfig::default(), &overrides);
        assert_eq!(config.port, 8080);
        assert!(config.advertise);
        assert!(config.ui.show_qr);
    }
}
