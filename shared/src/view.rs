use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorSeverity, ValidationError};
use crate::form::{FormField, FormPhase, SubmissionForm, UploadState};
use crate::model::{ImageId, ImageRecord, Model};
use crate::pagination::{FeedStatus, PaginationController};
use crate::preview::{overlay, PreviewOverlay};
use crate::toast::{ToastKind, ToastMessage};

pub const LOAD_MORE_LABEL: &str = "Load more";
pub const LOADING_LABEL: &str = "Loading...";
pub const RETRY_LABEL: &str = "Try again";
pub const SUBMIT_LABEL: &str = "Submit";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserFacingError {
    pub message: String,
    pub is_transient: bool,
    pub is_retryable: bool,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            is_transient: e.severity == ErrorSeverity::Transient,
            is_retryable: e.is_retryable(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastView {
    pub id: u64,
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
    pub duration_ms: u64,
}

impl From<&ToastMessage> for ToastView {
    fn from(t: &ToastMessage) -> Self {
        Self {
            id: t.id,
            kind: t.kind,
            title: t.title.clone(),
            description: t.description.clone(),
            duration_ms: t.duration_ms,
        }
    }
}

/// One card in the gallery. The shell sends `ViewImageRequested { id }` from it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardView {
    pub id: ImageId,
    pub title: String,
    pub description: String,
    pub url: String,
    pub timestamp: i64,
}

impl From<&ImageRecord> for CardView {
    fn from(r: &ImageRecord) -> Self {
        Self {
            id: r.id.clone(),
            title: r.title.clone(),
            description: r.description.clone(),
            url: r.url.clone(),
            timestamp: r.timestamp,
        }
    }
}

/// The "load more" button. `is_retry` means it re-sends the page that failed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadMoreView {
    pub label: String,
    pub enabled: bool,
    pub is_loading: bool,
    pub is_retry: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GalleryView {
    Loading,
    Error {
        error: UserFacingError,
    },
    Ready {
        cards: Vec<CardView>,
        load_more: Option<LoadMoreView>,
        load_more_error: Option<UserFacingError>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormView {
    pub phase: FormPhase,
    pub title: String,
    pub description: String,
    pub image_preview_url: Option<String>,
    pub image_url: Option<String>,
    pub is_uploading: bool,
    pub image_error: Option<String>,
    pub title_error: Option<String>,
    pub description_error: Option<String>,
    pub is_submitting: bool,
    pub submit_label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub gallery: GalleryView,
    pub preview: Option<PreviewOverlay>,
    pub add_image: Option<FormView>,
    pub toasts: Vec<ToastView>,
}

fn user_error(e: &crate::error::NetworkError) -> UserFacingError {
    UserFacingError::from(&AppError::from(e.clone()))
}

fn load_more(feed: &PaginationController) -> Option<LoadMoreView> {
    if !feed.has_next_page() {
        return None;
    }
    let is_loading = feed.is_fetching_more();
    let is_retry = !is_loading && feed.load_more_error().is_some();
    let label = if is_loading {
        LOADING_LABEL
    } else if is_retry {
        RETRY_LABEL
    } else {
        LOAD_MORE_LABEL
    };

    Some(LoadMoreView {
        label: label.into(),
        enabled: !is_loading,
        is_loading,
        is_retry,
    })
}

#[must_use]
pub fn gallery(feed: &PaginationController) -> GalleryView {
    match feed.status() {
        FeedStatus::Loading => GalleryView::Loading,
        FeedStatus::Error => match feed.error() {
            Some(e) => GalleryView::Error { error: user_error(e) },
            None => GalleryView::Loading,
        },
        FeedStatus::Ready | FeedStatus::FetchingMore => GalleryView::Ready {
            cards: feed.items().map(CardView::from).collect(),
            load_more: load_more(feed),
            load_more_error: feed.load_more_error().map(user_error),
        },
    }
}

fn field_error(form: &SubmissionForm, field: FormField) -> Option<String> {
    form.errors().get(field).map(ValidationError::to_string)
}

#[must_use]
pub fn form(form: &SubmissionForm) -> FormView {
    let is_submitting = form.phase() == FormPhase::Submitting;
    FormView {
        phase: form.phase(),
        title: form.title().to_string(),
        description: form.description().to_string(),
        image_preview_url: form.file().and_then(|f| f.local_preview_url.clone()),
        image_url: form.image_url().map(str::to_owned),
        is_uploading: *form.upload() == UploadState::Uploading,
        image_error: field_error(form, FormField::Image),
        title_error: field_error(form, FormField::Title),
        description_error: field_error(form, FormField::Description),
        is_submitting,
        submit_label: if is_submitting { LOADING_LABEL } else { SUBMIT_LABEL }.into(),
    }
}

#[must_use]
pub fn build(model: &Model) -> ViewModel {
    ViewModel {
        gallery: gallery(&model.feed),
        preview: overlay(&model.preview),
        add_image: model.add_image_open.then(|| form(&model.form)),
        toasts: model.toasts.iter().map(ToastView::from).collect(),
    }
}
