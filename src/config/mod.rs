use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

use crate::services::workers_ai::{DEFAULT_API_BASE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000")
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Cloudflare account ID
    pub cf_account_id: String,

    /// Cloudflare Workers AI API token
    pub cf_api_token: String,

    /// Workers AI model used for origin reports
    #[serde(default = "default_cf_model")]
    pub cf_model: String,

    /// Workers AI API root
    #[serde(default = "default_cf_api_base")]
    pub cf_api_base: String,

    /// Upper bound on generated report tokens
    #[serde(default = "default_max_report_tokens")]
    pub max_report_tokens: u32,

    /// Carry the embedded photo in the shareable report link
    #[serde(default)]
    pub include_photo_in_shareable_link: bool,

    /// Externally visible base URL, used for QR code links
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// QR code image service
    #[serde(default = "default_qr_service_url")]
    pub qr_service_url: String,

    /// Reverse image search target for the scan page
    #[serde(default = "default_reverse_image_search_url")]
    pub reverse_image_search_url: String,

    /// Zone used when displaying collection timestamps, in minutes east of UTC
    #[serde(default = "default_display_utc_offset_minutes")]
    pub display_utc_offset_minutes: i32,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_cf_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_cf_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_max_report_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_public_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_qr_service_url() -> String {
    "https://api.qrserver.com/v1/create-qr-code/".to_string()
}

fn default_reverse_image_search_url() -> String {
    "https://www.google.com/searchbyimage".to_string()
}

fn default_display_utc_offset_minutes() -> i32 {
    330
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn report_settings(&self) -> Result<ReportSettings, ConfigError> {
        let display_offset = FixedOffset::east_opt(self.display_utc_offset_minutes * 60)
            .ok_or(ConfigError::InvalidOffset(self.display_utc_offset_minutes))?;

        Ok(ReportSettings {
            include_photo_in_shareable_link: self.include_photo_in_shareable_link,
            public_base_url: self.public_base_url.clone(),
            qr_service_url: self.qr_service_url.clone(),
            reverse_image_search_url: self.reverse_image_search_url.clone(),
            display_offset,
        })
    }
}

/// Presentation and link settings shared by the page handlers.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub include_photo_in_shareable_link: bool,
    pub public_base_url: String,
    pub qr_service_url: String,
    pub reverse_image_search_url: String,
    pub display_offset: FixedOffset,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            include_photo_in_shareable_link: false,
            public_base_url: default_public_base_url(),
            qr_service_url: default_qr_service_url(),
            reverse_image_search_url: default_reverse_image_search_url(),
            display_offset: FixedOffset::east_opt(default_display_utc_offset_minutes() * 60)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DISPLAY_UTC_OFFSET_MINUTES out of range: {0}")]
    InvalidOffset(i32),
}
