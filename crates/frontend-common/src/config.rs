//! Frontend configuration

use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// Turnstile integration constants
pub struct TurnstileConfig;

impl TurnstileConfig {
    /// Interval between checks for `window.turnstile`, in milliseconds
    pub const POLL_INTERVAL_MS: u32 = 100;

    /// How long to wait for the provider script before giving up
    pub const POLL_TIMEOUT_MS: u32 = 10_000;

    /// Cached tokens are trusted for 4 minutes; Turnstile itself honours them for 5
    pub const TOKEN_TTL_MS: u64 = 240_000;

    /// Local storage key holding the last solved token
    pub const TOKEN_KEY: &'static str = "turnstile_token";

    /// Local storage key holding the token creation time (ms since epoch)
    pub const TOKEN_TIME_KEY: &'static str = "turnstile_token_time";

    pub const WIDGET_CONTAINER_ID: &'static str = "turnstile-container";
    pub const GATE_CONTAINER_ID: &'static str = "turnstile-protection-container";
}

/// Backend API constants
pub struct ApiConfig;

impl ApiConfig {
    /// Articles requested per page
    pub const ARTICLE_PAGE_SIZE: u32 = 10;

    pub const ARTICLE_PAGE_PATH: &'static str = "/article";
    pub const SITE_CONFIG_PATH: &'static str = "/config";
}

/// Verification settings handed to the widget and the gate.
///
/// A missing site key disables verification entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerificationConfig {
    pub site_key: Option<String>,
    pub theme: Theme,
}

impl VerificationConfig {
    pub fn new(site_key: Option<String>, theme: Theme) -> Self {
        let site_key = site_key.filter(|key| !key.trim().is_empty());
        Self { site_key, theme }
    }

    pub fn is_enabled(&self) -> bool {
        self.site_key.is_some()
    }
}

/// Site-wide settings served by the backend `/config` endpoint
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub other: OtherSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherSettings {
    #[serde(default)]
    pub turnstile_site_key: Option<String>,
}

impl SiteConfig {
    /// Site key from the backend, falling back to one baked in at build time
    pub fn turnstile_site_key(&self, fallback: Option<&str>) -> Option<String> {
        self.other
            .turnstile_site_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| fallback.map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_site_key_disables_verification() {
        assert!(!VerificationConfig::new(Some("  ".into()), Theme::Light).is_enabled());
        assert!(!VerificationConfig::new(None, Theme::Dark).is_enabled());
        assert!(VerificationConfig::new(Some("0x4AAA".into()), Theme::Dark).is_enabled());
    }

    #[test]
    fn site_config_tolerates_missing_sections() {
        let config: SiteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.turnstile_site_key(None), None);
        assert_eq!(config.turnstile_site_key(Some("fallback")), Some("fallback".into()));

        let config: SiteConfig =
            serde_json::from_str(r#"{"other":{"turnstile_site_key":"0x4AAA"}}"#).unwrap();
        assert_eq!(config.turnstile_site_key(Some("fallback")), Some("0x4AAA".into()));
    }
}
