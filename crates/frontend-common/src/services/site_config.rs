//! Site configuration API

use super::{ApiError, base_url, get_json};
use crate::config::{ApiConfig, SiteConfig};

/// Loads the site configuration served by the backend
#[derive(Clone, Debug, Default)]
pub struct SiteConfigService {
    base_url: String,
}

impl SiteConfigService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn from_window() -> Self {
        Self::new(base_url())
    }

    pub async fn fetch(&self) -> Result<SiteConfig, ApiError> {
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            ApiConfig::SITE_CONFIG_PATH
        );
        get_json(&url, &[]).await
    }
}
