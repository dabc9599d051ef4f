use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::config::GalleryConfig;
use crate::form::SubmissionForm;
use crate::pagination::PaginationController;
use crate::preview::PreviewSelection;
use crate::toast::ToastQueue;

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(ImageId);
typed_id!(Cursor);

/// An image as served by the image service. Read-only on the client.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: ImageId,
    pub title: String,
    pub description: String,
    pub url: String,
    /// Milliseconds since the epoch.
    #[serde(rename = "ts", alias = "timestamp", deserialize_with = "lenient_millis")]
    pub timestamp: i64,
}

/// Accepts any JSON number; fractional milliseconds are rounded.
fn lenient_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Millis {
        Int(i64),
        Float(f64),
    }

    match Millis::deserialize(deserializer)? {
        Millis::Int(ms) => Ok(ms),
        #[allow(clippy::cast_possible_truncation)]
        Millis::Float(ms) if ms.is_finite() => Ok(ms.round() as i64),
        Millis::Float(_) => Err(de::Error::custom("timestamp is not a finite number")),
    }
}

/// One response of `GET /api/images`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Page {
    #[serde(rename = "data", default)]
    pub items: Vec<ImageRecord>,
    #[serde(rename = "after", default)]
    pub next_cursor: Option<Cursor>,
}

impl Page {
    #[must_use]
    pub fn new(items: Vec<ImageRecord>, next_cursor: Option<Cursor>) -> Self {
        Self { items, next_cursor }
    }

    /// Cursor for the page after this one. An empty cursor counts as "no more pages".
    #[must_use]
    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.next_cursor.as_ref().filter(|c| !c.0.is_empty())
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next_cursor().is_none()
    }
}

/// Body of `POST /api/images`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateImageRequest {
    pub title: String,
    pub description: String,
    pub url: String,
}

/// Metadata the file picker reports for the chosen file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub media_type: String,
    #[serde(default)]
    pub local_preview_url: Option<String>,
}

#[derive(Debug, Default)]
pub struct Model {
    pub config: GalleryConfig,
    pub feed: PaginationController,
    pub preview: PreviewSelection,
    pub add_image_open: bool,
    pub form: SubmissionForm,
    pub toasts: ToastQueue,
}

impl Model {
    #[must_use]
    pub fn new(config: GalleryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}
