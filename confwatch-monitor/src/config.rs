//! Monitor configuration.
//!
//! Loaded once before the first event is dispatched and read-only for the
//! lifetime of the session. The JSON shape matches the deployment config
//! file the application ships (`appId`/`appSecret` issued by the monitoring
//! service, plus optional reporting knobs).

use std::path::Path;

use serde::Deserialize;

use stats_client::{BackendOptions, Credentials};

use crate::error::{MonitorError, Result};

fn default_application_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_gateway_label() -> String {
    "gateway".to_string()
}

/// Configuration for a [`crate::ConferenceMonitor`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorConfig {
    /// Application identifier issued by the monitoring service.
    pub app_id: String,

    /// Application secret issued by the monitoring service.
    pub app_secret: String,

    /// Enable verbose diagnostic logging.
    pub debug: bool,

    /// Application version reported with the session.
    /// Default: this crate's version.
    pub application_version: String,

    /// Ask the backend not to install its own page-unload handler.
    /// Default: false
    pub disable_unload_handler: bool,

    /// Remote-peer identity reported when registering relayed connections.
    /// Default: "gateway"
    pub gateway_label: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_secret: String::new(),
            debug: false,
            application_version: default_application_version(),
            disable_unload_handler: false,
            gateway_label: default_gateway_label(),
        }
    }
}

impl MonitorConfig {
    /// Create a configuration from an application id/secret pair.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| MonitorError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Validate the configuration and return any issues.
    pub fn validate(&self) -> Result<()> {
        if self.app_id.is_empty() {
            return Err(MonitorError::Configuration(
                "appId must not be empty".to_string(),
            ));
        }
        if self.app_secret.is_empty() {
            return Err(MonitorError::Configuration(
                "appSecret must not be empty".to_string(),
            ));
        }
        if self.gateway_label.is_empty() {
            return Err(MonitorError::Configuration(
                "gatewayLabel must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Credentials to initialize the backend with.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.app_id.clone(), self.app_secret.clone())
    }

    /// Session options forwarded to the backend on initialize.
    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            application_version: self.application_version.clone(),
            disable_unload_handler: self.disable_unload_handler,
        }
    }

    /// Builder pattern methods for fluent configuration

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_application_version(mut self, version: impl Into<String>) -> Self {
        self.application_version = version.into();
        self
    }

    pub fn with_gateway_label(mut self, label: impl Into<String>) -> Self {
        self.gateway_label = label.into();
        self
    }

    pub fn with_unload_handler_disabled(mut self, disabled: bool) -> Self {
        self.disable_unload_handler = disabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_fills_reporting_knobs() {
        let config = MonitorConfig::default();
        assert_eq!(config.gateway_label, "gateway");
        assert_eq!(config.application_version, env!("CARGO_PKG_VERSION"));
        assert!(!config.debug);
        assert!(!config.disable_unload_handler);
    }

    #[test]
    fn validation_requires_credentials() {
        assert!(MonitorConfig::default().validate().is_err());
        assert!(MonitorConfig::new("app", "").validate().is_err());
        assert!(MonitorConfig::new("", "secret").validate().is_err());
        assert!(MonitorConfig::new("app", "secret").validate().is_ok());
    }

    #[test]
    fn decodes_deployment_json_shape() {
        let json = r#"{
            "appId": "123456",
            "appSecret": "sekrit",
            "debug": true,
            "gatewayLabel": "relay-1"
        }"#;

        let config: MonitorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.app_id, "123456");
        assert_eq!(config.app_secret, "sekrit");
        assert!(config.debug);
        assert_eq!(config.gateway_label, "relay-1");
        // Omitted fields keep their defaults.
        assert_eq!(config.application_version, env!("CARGO_PKG_VERSION"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = MonitorConfig::new("app", "secret")
            .with_debug(true)
            .with_application_version("1.4.0")
            .with_gateway_label("relay-2")
            .with_unload_handler_disabled(true);

        assert!(config.debug);
        assert_eq!(config.application_version, "1.4.0");
        assert_eq!(config.gateway_label, "relay-2");
        assert!(config.disable_unload_handler);

        let options = config.backend_options();
        assert_eq!(options.application_version, "1.4.0");
        assert!(options.disable_unload_handler);
    }
}
