//! Push-notification configuration.

use serde::{Deserialize, Serialize};

/// Push-notification settings.
///
/// The device token is what the push provider issued to this device. It is
/// registered against the principal at login, once notification permission
/// has been granted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Device token (or environment variable reference below).
    #[serde(default)]
    pub device_token: Option<String>,

    /// Environment variable containing the device token.
    #[serde(default)]
    pub device_token_env: Option<String>,
}

impl NotificationsConfig {
    /// Get the device token, checking device_token_env first.
    pub fn resolve_device_token(&self) -> Option<String> {
        if let Some(env_var) = &self.device_token_env
            && let Ok(token) = std::env::var(env_var)
            && !token.is_empty()
        {
            return Some(token);
        }
        self.device_token.clone().filter(|t| !t.is_empty())
    }
}
