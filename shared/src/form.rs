//! The "add image" form: field rules, upload precondition and the submit state machine.
//!
//! ```text
//! Editing ──▶ Validating ──▶ Submitting ──▶ Success ──▶ Editing
//!    ▲            │                   └───▶ Failure ──▶ Editing
//!    └────────────┘ (invalid fields or image not uploaded yet)
//! ```
//!
//! Both terminal states reset the form; the caller closes the modal.

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::config::{size_label, GalleryConfig};
use crate::error::{PreconditionError, TransitionError, ValidationError};
use crate::model::{CreateImageRequest, SelectedFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Image,
    Title,
    Description,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Image => "Image",
            Self::Title => "Title",
            Self::Description => "Description",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    #[default]
    Editing,
    Validating,
    Submitting,
    Success,
    Failure,
}

impl FormPhase {
    #[must_use]
    pub const fn valid_transitions(self) -> &'static [Self] {
        match self {
            Self::Editing => &[Self::Validating],
            Self::Validating => &[Self::Submitting, Self::Editing],
            Self::Submitting => &[Self::Success, Self::Failure],
            Self::Success | Self::Failure => &[Self::Editing],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        self.valid_transitions().contains(&to)
    }

    pub fn validate_transition(self, to: Self) -> Result<(), TransitionError> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from: self, to })
        }
    }

    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Validating | Self::Submitting)
    }
}

/// Progress of the externally performed file upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UploadState {
    #[default]
    Empty,
    Uploading,
    Uploaded { url: String },
    Failed { reason: String },
}

/// Limits applied to the form fields, derived from [`GalleryConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRules {
    pub max_image_bytes: u64,
    pub accepted_formats: Vec<ImageFormat>,
    pub title_min_chars: usize,
    pub title_max_chars: usize,
    pub description_max_chars: usize,
}

impl From<&GalleryConfig> for FormRules {
    fn from(config: &GalleryConfig) -> Self {
        let mut accepted_formats = Vec::new();
        for format in config.accepted_media_types.iter().filter_map(|m| media_format(m)) {
            if !accepted_formats.contains(&format) {
                accepted_formats.push(format);
            }
        }

        Self {
            max_image_bytes: config.max_image_bytes,
            accepted_formats,
            title_min_chars: config.title_min_chars,
            title_max_chars: config.title_max_chars,
            description_max_chars: config.description_max_chars,
        }
    }
}

impl Default for FormRules {
    fn default() -> Self {
        Self::from(&GalleryConfig::default())
    }
}

/// Resolves a reported media type such as `image/PNG; charset=binary`.
#[must_use]
pub fn media_format(media_type: &str) -> Option<ImageFormat> {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    ImageFormat::from_mime_type(essence.to_ascii_lowercase())
}

/// Joins format names for messages: `PNG, JPEG and GIF`.
#[must_use]
pub fn format_list(formats: &[ImageFormat]) -> String {
    let names: Vec<String> = formats
        .iter()
        .map(|f| format!("{f:?}").to_ascii_uppercase())
        .collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
    }
}

pub fn validate_image(file: Option<&SelectedFile>, rules: &FormRules) -> Result<(), ValidationError> {
    let file = file.ok_or(ValidationError::Required {
        field: FormField::Image,
    })?;

    if file.size_bytes > rules.max_image_bytes {
        return Err(ValidationError::FileTooLarge {
            size_bytes: file.size_bytes,
            max_bytes: rules.max_image_bytes,
            limit: size_label(rules.max_image_bytes),
        });
    }

    match media_format(&file.media_type) {
        Some(format) if rules.accepted_formats.contains(&format) => Ok(()),
        _ => Err(ValidationError::UnsupportedMediaType {
            media_type: file.media_type.clone(),
            accepted: format_list(&rules.accepted_formats),
        }),
    }
}

fn validate_text(
    field: FormField,
    value: &str,
    min: Option<usize>,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    let len = value.chars().count();
    if let Some(min) = min {
        if len < min {
            return Err(ValidationError::TooShort { field, len, min });
        }
    }
    if len > max {
        return Err(ValidationError::TooLong { field, len, max });
    }
    Ok(())
}

pub fn validate_title(title: &str, rules: &FormRules) -> Result<(), ValidationError> {
    validate_text(
        FormField::Title,
        title,
        Some(rules.title_min_chars),
        rules.title_max_chars,
    )
}

pub fn validate_description(description: &str, rules: &FormRules) -> Result<(), ValidationError> {
    validate_text(
        FormField::Description,
        description,
        None,
        rules.description_max_chars,
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub image: Option<ValidationError>,
    pub title: Option<ValidationError>,
    pub description: Option<ValidationError>,
}

impl FieldErrors {
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&ValidationError> {
        match field {
            FormField::Image => self.image.as_ref(),
            FormField::Title => self.title.as_ref(),
            FormField::Description => self.description.as_ref(),
        }
    }

    pub fn set(&mut self, field: FormField, error: Option<ValidationError>) {
        match field {
            FormField::Image => self.image = error,
            FormField::Title => self.title = error,
            FormField::Description => self.description = error,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.title.is_none() && self.description.is_none()
    }
}

/// Result of pressing "submit".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// A submission is already running.
    Busy,
    /// At least one field failed validation; errors are on the form.
    Invalid(FieldErrors),
    /// Fields are fine but the upload has not produced a URL yet.
    NotReady(PreconditionError),
    /// Send this to the image service.
    Ready(CreateImageRequest),
}

#[derive(Debug, Default)]
pub struct SubmissionForm {
    phase: FormPhase,
    file: Option<SelectedFile>,
    upload: UploadState,
    title: String,
    description: String,
    errors: FieldErrors,
}

impl SubmissionForm {
    #[must_use]
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    #[must_use]
    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    #[must_use]
    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Hosted URL of the uploaded image, once the upload finished.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match &self.upload {
            UploadState::Uploaded { url } if !url.is_empty() => Some(url),
            _ => None,
        }
    }

    fn transition(&mut self, to: FormPhase) -> Result<(), TransitionError> {
        self.phase.validate_transition(to)?;
        debug!(from = ?self.phase, to = ?to, "form transition");
        self.phase = to;
        Ok(())
    }

    /// Records the picked file and validates it right away.
    ///
    /// A valid file moves the upload to [`UploadState::Uploading`]; the shell's
    /// upload widget reports back through [`Self::upload_completed`].
    pub fn select_file(&mut self, file: SelectedFile, rules: &FormRules) -> Result<(), ValidationError> {
        let verdict = validate_image(Some(&file), rules);
        self.file = Some(file);
        self.upload = if verdict.is_ok() {
            UploadState::Uploading
        } else {
            UploadState::Empty
        };
        self.errors.image = verdict.clone().err();
        verdict
    }

    pub fn upload_completed(&mut self, url: impl Into<String>) -> bool {
        if self.upload != UploadState::Uploading {
            return false;
        }
        let url = url.into();
        if url.is_empty() {
            return false;
        }
        self.upload = UploadState::Uploaded { url };
        true
    }

    pub fn upload_failed(&mut self, reason: impl Into<String>) -> bool {
        if self.upload != UploadState::Uploading {
            return false;
        }
        let reason = reason.into();
        self.errors.image = Some(ValidationError::UploadFailed {
            reason: reason.clone(),
        });
        self.upload = UploadState::Failed { reason };
        true
    }

    pub fn set_title(&mut self, title: impl Into<String>, rules: &FormRules) {
        self.title = title.into();
        if self.errors.title.is_some() {
            self.errors.title = validate_title(&self.title, rules).err();
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>, rules: &FormRules) {
        self.description = description.into();
        if self.errors.description.is_some() {
            self.errors.description = validate_description(&self.description, rules).err();
        }
    }

    fn validate_all(&mut self, rules: &FormRules) -> bool {
        let upload_error = match &self.upload {
            UploadState::Failed { reason } => Some(ValidationError::UploadFailed {
                reason: reason.clone(),
            }),
            _ => None,
        };

        self.errors = FieldErrors {
            image: validate_image(self.file.as_ref(), rules).err().or(upload_error),
            title: validate_title(&self.title, rules).err(),
            description: validate_description(&self.description, rules).err(),
        };
        self.errors.is_empty()
    }

    pub fn begin_submit(&mut self, rules: &FormRules) -> Result<SubmitAttempt, TransitionError> {
        if self.phase != FormPhase::Editing {
            return Ok(SubmitAttempt::Busy);
        }
        self.transition(FormPhase::Validating)?;

        if !self.validate_all(rules) {
            self.transition(FormPhase::Editing)?;
            return Ok(SubmitAttempt::Invalid(self.errors.clone()));
        }

        let Some(url) = self.image_url().map(str::to_owned) else {
            self.transition(FormPhase::Editing)?;
            return Ok(SubmitAttempt::NotReady(PreconditionError::ImageNotUploaded));
        };

        self.transition(FormPhase::Submitting)?;
        Ok(SubmitAttempt::Ready(CreateImageRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            url,
        }))
    }

    /// Moves through `Success`/`Failure` back to `Editing`, clearing every field either way.
    pub fn finish_submit(&mut self, succeeded: bool) -> Result<(), TransitionError> {
        let terminal = if succeeded {
            FormPhase::Success
        } else {
            FormPhase::Failure
        };
        self.transition(terminal)?;
        self.transition(FormPhase::Editing)?;
        self.clear_fields();
        Ok(())
    }

    /// Drops whatever the user entered. Ignored while a submission is running.
    pub fn discard(&mut self) -> bool {
        if self.phase.is_busy() {
            warn!(phase = ?self.phase, "discard ignored while submitting");
            return false;
        }
        self.clear_fields();
        true
    }

    fn clear_fields(&mut self) {
        self.file = None;
        self.upload = UploadState::Empty;
        self.title.clear();
        self.description.clear();
        self.errors = FieldErrors::default();
    }
}
