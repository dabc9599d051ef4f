use serde::{Deserialize, Serialize};

use crate::config::GalleryConfig;
use crate::error::NetworkError;
use crate::model::{ImageId, Page, SelectedFile};
use crate::pagination::PageRequest;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub enum Event {
    #[default]
    Noop,

    AppStarted,
    ConfigUpdated(GalleryConfig),

    // Feed
    RefreshRequested,
    LoadMoreRequested,
    LoadMoreRetried,

    // Gallery & preview
    ViewImageRequested {
        id: ImageId,
    },
    PreviewClosed,

    // Add-image modal
    AddImageOpened,
    AddImageClosed,
    ImageSelected(SelectedFile),
    ImageUploaded {
        url: String,
    },
    ImageUploadFailed {
        reason: String,
    },
    TitleChanged(String),
    DescriptionChanged(String),
    SubmitRequested,

    DismissToast {
        id: u64,
    },

    // Capability responses, never sent by the shell
    #[serde(skip)]
    PageFetched {
        request: PageRequest,
        result: Box<Result<Page, NetworkError>>,
    },
    #[serde(skip)]
    ImageSubmitted(Box<Result<(), NetworkError>>),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::AppStarted => "app_started",
            Self::ConfigUpdated(_) => "config_updated",
            Self::RefreshRequested => "refresh_requested",
            Self::LoadMoreRequested => "load_more_requested",
            Self::LoadMoreRetried => "load_more_retried",
            Self::ViewImageRequested { .. } => "view_image_requested",
            Self::PreviewClosed => "preview_closed",
            Self::AddImageOpened => "add_image_opened",
            Self::AddImageClosed => "add_image_closed",
            Self::ImageSelected(_) => "image_selected",
            Self::ImageUploaded { .. } => "image_uploaded",
            Self::ImageUploadFailed { .. } => "image_upload_failed",
            Self::TitleChanged(_) => "title_changed",
            Self::DescriptionChanged(_) => "description_changed",
            Self::SubmitRequested => "submit_requested",
            Self::DismissToast { .. } => "dismiss_toast",
            Self::PageFetched { .. } => "page_fetched",
            Self::ImageSubmitted(_) => "image_submitted",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::RefreshRequested
                | Self::LoadMoreRequested
                | Self::LoadMoreRetried
                | Self::ViewImageRequested { .. }
                | Self::PreviewClosed
                | Self::AddImageOpened
                | Self::AddImageClosed
                | Self::ImageSelected(_)
                | Self::TitleChanged(_)
                | Self::DescriptionChanged(_)
                | Self::SubmitRequested
                | Self::DismissToast { .. }
        )
    }
}
