use tracing::{debug, info, warn};

use crate::capabilities::{create_image, fetch_page, Capabilities};
use crate::config::GalleryConfig;
use crate::error::{AppError, NetworkError};
use crate::event::Event;
use crate::form::{FormPhase, FormRules, SubmitAttempt};
use crate::model::{CreateImageRequest, ImageId, Model, Page};
use crate::pagination::{Applied, PageRequest};
use crate::toast::ToastKind;
use crate::view::{self, ViewModel};

pub const NOT_ADDED_TITLE: &str = "Image not added";
pub const SUBMIT_SUCCESS_TITLE: &str = "Image registered";
pub const SUBMIT_SUCCESS_DESCRIPTION: &str = "Your image was registered successfully.";
pub const SUBMIT_FAILURE_TITLE: &str = "Registration failed";
pub const SUBMIT_FAILURE_DESCRIPTION: &str = "An error occurred while registering your image.";
pub const LOAD_MORE_FAILURE_TITLE: &str = "Could not load more images";

#[derive(Default)]
pub struct App;

impl App {
    fn send_page_request(model: &mut Model, caps: &Capabilities, request: PageRequest) {
        if let Err(e) = fetch_page(&caps.http, &model.config, request.clone()) {
            Self::handle_page(model, &request, Err(e));
        }
    }

    fn handle_page(model: &mut Model, request: &PageRequest, result: Result<Page, NetworkError>) {
        let error = result.as_ref().err().cloned();
        match model.feed.apply(request, result) {
            Applied::NextPageFailed => {
                if let Some(e) = error {
                    let app_error = AppError::from(e);
                    model.toasts.push(
                        ToastKind::Warning,
                        LOAD_MORE_FAILURE_TITLE,
                        app_error.user_facing_message(),
                    );
                }
            }
            Applied::Stale => {
                debug!(generation = request.generation, "ignored page response");
            }
            Applied::FirstPage | Applied::NextPage | Applied::FirstPageFailed => {}
        }
    }

    fn view_image(model: &mut Model, id: &ImageId) {
        match model.feed.find(id) {
            Some(record) => {
                let url = record.url.clone();
                debug!(id = %id, "preview opened");
                model.preview.view(url);
            }
            None => warn!(id = %id, "view requested for unknown image"),
        }
    }

    fn update_config(model: &mut Model, config: GalleryConfig) {
        match config.validate() {
            Ok(()) => {
                info!(api_base_url = %config.api_base_url, "config updated");
                model.config = config;
            }
            Err(e) => {
                let e = AppError::from(e);
                warn!(code = e.code(), error = %e, "config rejected, keeping previous");
            }
        }
    }

    fn submit(model: &mut Model, caps: &Capabilities) {
        let rules = FormRules::from(&model.config);
        let attempt = match model.form.begin_submit(&rules) {
            Ok(attempt) => attempt,
            Err(e) => {
                let e = AppError::from(e);
                warn!(code = e.code(), error = %e, "submit rejected");
                return;
            }
        };

        match attempt {
            SubmitAttempt::Busy => debug!("submit ignored, already submitting"),
            SubmitAttempt::Invalid(errors) => {
                debug!(
                    image = errors.image.is_some(),
                    title = errors.title.is_some(),
                    description = errors.description.is_some(),
                    "submit blocked by field errors"
                );
            }
            SubmitAttempt::NotReady(e) => {
                info!("submit before upload finished");
                let e = AppError::from(e);
                model
                    .toasts
                    .push(ToastKind::Info, NOT_ADDED_TITLE, e.user_facing_message());
            }
            SubmitAttempt::Ready(body) => Self::send_create(model, caps, &body),
        }
    }

    fn send_create(model: &mut Model, caps: &Capabilities, body: &CreateImageRequest) {
        info!(title = %body.title, "submitting image");
        if let Err(e) = create_image(&caps.http, &model.config, body) {
            Self::handle_submitted(model, caps, Err(e));
        }
    }

    fn handle_submitted(model: &mut Model, caps: &Capabilities, result: Result<(), NetworkError>) {
        if model.form.phase() != FormPhase::Submitting {
            warn!(phase = ?model.form.phase(), "submit response without a pending submission");
            return;
        }

        let succeeded = result.is_ok();
        match result {
            Ok(()) => {
                info!("image registered");
                model.toasts.push(
                    ToastKind::Success,
                    SUBMIT_SUCCESS_TITLE,
                    SUBMIT_SUCCESS_DESCRIPTION,
                );
                let request = model.feed.invalidate();
                Self::send_page_request(model, caps, request);
            }
            Err(e) => {
                warn!(error = %e, "image registration failed");
                model.toasts.push(
                    ToastKind::Error,
                    SUBMIT_FAILURE_TITLE,
                    SUBMIT_FAILURE_DESCRIPTION,
                );
            }
        }

        if let Err(e) = model.form.finish_submit(succeeded) {
            warn!(error = %e, "form could not be reset");
        }
        model.add_image_open = false;
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(event = event.name(), user = event.is_user_initiated(), "event");

        match event {
            Event::Noop => return,

            Event::AppStarted => {
                if !model.feed.has_started() {
                    let request = model.feed.fetch_first();
                    Self::send_page_request(model, caps, request);
                }
            }

            Event::ConfigUpdated(config) => Self::update_config(model, config),

            Event::RefreshRequested => {
                let request = model.feed.fetch_first();
                Self::send_page_request(model, caps, request);
            }

            Event::LoadMoreRequested => match model.feed.fetch_next() {
                Some(request) => Self::send_page_request(model, caps, request),
                None => debug!("load more ignored"),
            },

            Event::LoadMoreRetried => match model.feed.retry_next() {
                Some(request) => Self::send_page_request(model, caps, request),
                None => debug!("nothing to retry"),
            },

            Event::PageFetched { request, result } => {
                Self::handle_page(model, &request, *result);
            }

            Event::ViewImageRequested { id } => Self::view_image(model, &id),

            Event::PreviewClosed => model.preview.close(),

            Event::AddImageOpened => model.add_image_open = true,

            Event::AddImageClosed => {
                if model.form.discard() {
                    model.add_image_open = false;
                }
            }

            Event::ImageSelected(file) => {
                let rules = FormRules::from(&model.config);
                if let Err(e) = model.form.select_file(file, &rules) {
                    debug!(error = %e, "selected file rejected");
                }
            }

            Event::ImageUploaded { url } => {
                if !model.form.upload_completed(url) {
                    warn!("upload completion ignored");
                }
            }

            Event::ImageUploadFailed { reason } => {
                if !model.form.upload_failed(reason.clone()) {
                    warn!(reason = %reason, "upload failure ignored");
                }
            }

            Event::TitleChanged(title) => {
                let rules = FormRules::from(&model.config);
                model.form.set_title(title, &rules);
            }

            Event::DescriptionChanged(description) => {
                let rules = FormRules::from(&model.config);
                model.form.set_description(description, &rules);
            }

            Event::SubmitRequested => Self::submit(model, caps),

            Event::ImageSubmitted(result) => Self::handle_submitted(model, caps, *result),

            Event::DismissToast { id } => {
                if !model.toasts.dismiss(id) {
                    debug!(id, "toast already gone");
                }
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        view::build(model)
    }
}
