//! Runtime configuration handed to the core by the shell.
//!
//! Every field has a default, so a shell can send a partial JSON document and
//! only override what differs in its environment.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::form::media_format;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_IMAGES_PATH: &str = "/api/images";
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
pub const TITLE_MIN_CHARS: usize = 2;
pub const TITLE_MAX_CHARS: usize = 20;
pub const DESCRIPTION_MAX_CHARS: usize = 65;
pub const ACCEPTED_MEDIA_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GalleryConfig {
    pub api_base_url: String,
    pub images_path: String,
    pub max_image_bytes: u64,
    pub title_min_chars: usize,
    pub title_max_chars: usize,
    pub description_max_chars: usize,
    pub accepted_media_types: Vec<String>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            images_path: DEFAULT_IMAGES_PATH.into(),
            max_image_bytes: MAX_IMAGE_BYTES,
            title_min_chars: TITLE_MIN_CHARS,
            title_max_chars: TITLE_MAX_CHARS,
            description_max_chars: DESCRIPTION_MAX_CHARS,
            accepted_media_types: ACCEPTED_MEDIA_TYPES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl GalleryConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;

        if !self.images_path.starts_with('/') {
            return Err(ConfigError::InvalidLimit {
                name: "images_path",
                reason: format!("'{}' must start with '/'", self.images_path),
            });
        }
        if self.max_image_bytes == 0 {
            return Err(ConfigError::InvalidLimit {
                name: "max_image_bytes",
                reason: "must be greater than zero".into(),
            });
        }
        if self.title_min_chars > self.title_max_chars {
            return Err(ConfigError::InvalidLimit {
                name: "title_min_chars",
                reason: format!(
                    "{} is greater than title_max_chars {}",
                    self.title_min_chars, self.title_max_chars
                ),
            });
        }
        if self.accepted_media_types.is_empty() {
            return Err(ConfigError::InvalidLimit {
                name: "accepted_media_types",
                reason: "at least one media type is required".into(),
            });
        }
        if let Some(unknown) = self
            .accepted_media_types
            .iter()
            .find(|m| media_format(m).is_none())
        {
            return Err(ConfigError::InvalidLimit {
                name: "accepted_media_types",
                reason: format!("unknown image media type '{unknown}'"),
            });
        }
        Ok(())
    }

    /// Parsed base URL. Only absolute `http`/`https` URLs with a host are accepted.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            reason,
        };

        let url = Url::parse(self.api_base_url.trim()).map_err(|e| invalid(e.to_string()))?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme '{other}'"))),
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".into()));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(invalid("credentials in URL are not allowed".into()));
        }
        Ok(url)
    }

    /// Absolute URL of the images collection endpoint.
    pub fn images_url(&self) -> Result<Url, ConfigError> {
        let base = self.base_url()?;
        base.join(&self.images_path)
            .map_err(|e| ConfigError::InvalidBaseUrl {
                url: self.api_base_url.clone(),
                reason: e.to_string(),
            })
    }
}

/// Size limit as shown to users, rounded up: whole megabytes, or kilobytes below 1 MiB.
#[must_use]
pub fn size_label(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;

    if bytes >= MIB {
        format!("{}MB", bytes.div_ceil(MIB))
    } else {
        format!("{}KB", bytes.div_ceil(KIB).max(1))
    }
}
