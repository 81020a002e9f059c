//! CLI configuration: the server origin plus the local notification
//! toggles, stored as one JSON file under the user config dir.

use serde::{Deserialize, Serialize};

/// Notification preference toggles.
///
/// The account service has no settings endpoint for these, so they live
/// client-side only; toggling changes what the profile screen shows and
/// nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPrefs {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
    pub security: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            push: true,
            security: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub notifications: NotificationPrefs,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            notifications: NotificationPrefs::default(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("kabinet").join("config.json");
            if config_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&config_path) {
                    if let Ok(config) = serde_json::from_str(&content) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(config_dir) = dirs::config_dir() {
            let app_dir = config_dir.join("kabinet");
            std::fs::create_dir_all(&app_dir)?;
            let config_path = app_dir.join("config.json");
            let content = serde_json::to_string_pretty(self)?;
            std::fs::write(config_path, content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_a_partial_config_file() {
        let config: Config = serde_json::from_str(
            r#"{ "notifications": { "sms": true } }"#,
        )
        .expect("parse partial config");
        assert_eq!(config.server_url, "http://localhost:3000");
        assert!(config.notifications.sms);
        assert!(config.notifications.email);
    }
}
