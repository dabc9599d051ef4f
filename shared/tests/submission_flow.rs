use crux_core::testing::AppTester;
use shared::app::{NOT_ADDED_TITLE, SUBMIT_FAILURE_TITLE, SUBMIT_SUCCESS_TITLE};
use shared::error::NetworkError;
use shared::form::FormPhase;
use shared::model::{Cursor, ImageId, ImageRecord, Page, SelectedFile};
use shared::pagination::{FeedStatus, PageRequest};
use shared::toast::ToastKind;
use shared::{App, Effect, Event, Model};

const MIB: u64 = 1024 * 1024;
const HOSTED_URL: &str = "https://cdn.example.com/uploads/cat.png";

fn file(media_type: &str, size_bytes: u64) -> SelectedFile {
    SelectedFile {
        name: "cat.png".into(),
        size_bytes,
        media_type: media_type.into(),
        local_preview_url: Some("blob:local/cat".into()),
    }
}

fn http_requests(effects: &[Effect]) -> Vec<(String, String, Vec<u8>)> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Http(request) => Some((
                request.operation.method.clone(),
                request.operation.url.clone(),
                request.operation.body.clone(),
            )),
            _ => None,
        })
        .collect()
}

/// App with a loaded gallery and an open "add image" modal.
fn ready_with_modal() -> (AppTester<App, Effect>, Model) {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::AppStarted, &mut model);
    app.update(
        Event::PageFetched {
            request: PageRequest {
                generation: model.feed.generation(),
                cursor: None,
            },
            result: Box::new(Ok(Page::new(
                vec![ImageRecord {
                    id: ImageId::new("1"),
                    title: "Dog".into(),
                    description: "A dog".into(),
                    url: "https://cdn.example.com/dog.png".into(),
                    timestamp: 1,
                }],
                Some(Cursor::new("1")),
            ))),
        },
        &mut model,
    );
    app.update(Event::AddImageOpened, &mut model);
    (app, model)
}

fn fill_valid(app: &AppTester<App, Effect>, model: &mut Model) {
    app.update(Event::ImageSelected(file("image/png", 2 * MIB)), model);
    app.update(Event::ImageUploaded { url: HOSTED_URL.into() }, model);
    app.update(Event::TitleChanged("Cat".into()), model);
    app.update(Event::DescriptionChanged("Sleeping on the sofa".into()), model);
}

#[test]
fn successful_submission_invalidates_feed_and_closes_modal() {
    let (app, mut model) = ready_with_modal();
    fill_valid(&app, &mut model);
    let generation_before = model.feed.generation();

    let update = app.update(Event::SubmitRequested, &mut model);
    let requests = http_requests(&update.effects);
    assert_eq!(requests.len(), 1);
    let (method, url, body) = &requests[0];
    assert_eq!(method, "POST");
    assert_eq!(url, "http://localhost:3000/api/images");
    let body: serde_json::Value = serde_json::from_slice(body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "title": "Cat",
            "description": "Sleeping on the sofa",
            "url": HOSTED_URL,
        })
    );
    assert_eq!(model.form.phase(), FormPhase::Submitting);
    assert!(app.view(&model).add_image.unwrap().is_submitting);

    let update = app.update(Event::ImageSubmitted(Box::new(Ok(()))), &mut model);

    let refetch = http_requests(&update.effects);
    assert_eq!(refetch.len(), 1);
    assert_eq!(refetch[0].0, "GET");
    assert_eq!(refetch[0].1, "http://localhost:3000/api/images");
    assert!(model.feed.generation() > generation_before);
    assert_eq!(model.feed.status(), FeedStatus::Loading);

    assert!(!model.add_image_open);
    assert_eq!(model.form.phase(), FormPhase::Editing);
    assert_eq!(model.form.title(), "");
    assert_eq!(model.form.description(), "");
    assert_eq!(model.form.image_url(), None);

    let view = app.view(&model);
    assert!(view.add_image.is_none());
    let toast = view.toasts.last().unwrap();
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.title, SUBMIT_SUCCESS_TITLE);
}

#[test]
fn failed_submission_resets_and_closes_without_refetch() {
    let (app, mut model) = ready_with_modal();
    fill_valid(&app, &mut model);
    app.update(Event::SubmitRequested, &mut model);
    let generation = model.feed.generation();

    let update = app.update(
        Event::ImageSubmitted(Box::new(Err(NetworkError::Status { code: 500 }))),
        &mut model,
    );

    assert!(http_requests(&update.effects).is_empty());
    assert_eq!(model.feed.generation(), generation);
    assert!(!model.add_image_open);
    assert_eq!(model.form.title(), "");
    assert_eq!(model.form.image_url(), None);

    let toast = app.view(&model).toasts.last().cloned().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.title, SUBMIT_FAILURE_TITLE);
}

#[test]
fn submit_without_upload_shows_notice_and_keeps_form() {
    let (app, mut model) = ready_with_modal();
    app.update(Event::ImageSelected(file("image/jpeg", MIB)), &mut model);
    app.update(Event::TitleChanged("Cat".into()), &mut model);
    app.update(Event::DescriptionChanged("Still uploading".into()), &mut model);

    let update = app.update(Event::SubmitRequested, &mut model);

    assert!(http_requests(&update.effects).is_empty());
    assert!(model.add_image_open);
    assert_eq!(model.form.phase(), FormPhase::Editing);
    assert_eq!(model.form.title(), "Cat");

    let view = app.view(&model);
    let toast = view.toasts.last().unwrap();
    assert_eq!(toast.kind, ToastKind::Info);
    assert_eq!(toast.title, NOT_ADDED_TITLE);
    assert!(view.add_image.unwrap().is_uploading);
}

#[test]
fn short_title_blocks_submission() {
    let (app, mut model) = ready_with_modal();
    fill_valid(&app, &mut model);
    app.update(Event::TitleChanged("C".into()), &mut model);

    let update = app.update(Event::SubmitRequested, &mut model);

    assert!(http_requests(&update.effects).is_empty());
    let form = app.view(&model).add_image.unwrap();
    assert_eq!(
        form.title_error.as_deref(),
        Some("Title must be at least 2 characters")
    );
    assert_eq!(form.phase, FormPhase::Editing);
    assert!(model.toasts.is_empty());

    app.update(Event::TitleChanged("Ca".into()), &mut model);
    assert!(app.view(&model).add_image.unwrap().title_error.is_none());
}

#[test]
fn missing_fields_are_all_reported() {
    let (app, mut model) = ready_with_modal();

    let update = app.update(Event::SubmitRequested, &mut model);

    assert!(http_requests(&update.effects).is_empty());
    let form = app.view(&model).add_image.unwrap();
    assert_eq!(form.image_error.as_deref(), Some("Image is required"));
    assert_eq!(form.title_error.as_deref(), Some("Title is required"));
    assert_eq!(
        form.description_error.as_deref(),
        Some("Description is required")
    );
}

#[test]
fn oversized_and_unsupported_files_are_rejected() {
    let (app, mut model) = ready_with_modal();

    app.update(Event::ImageSelected(file("image/png", 11 * MIB)), &mut model);
    assert_eq!(
        app.view(&model).add_image.unwrap().image_error.as_deref(),
        Some("The file must be smaller than 10MB")
    );

    app.update(Event::ImageSelected(file("image/bmp", 5 * MIB)), &mut model);
    assert_eq!(
        app.view(&model).add_image.unwrap().image_error.as_deref(),
        Some("Only PNG, JPEG and GIF files are accepted")
    );

    // No upload starts for a rejected file.
    assert!(!app.view(&model).add_image.unwrap().is_uploading);
}

#[test]
fn upload_failure_is_an_image_error() {
    let (app, mut model) = ready_with_modal();
    app.update(Event::ImageSelected(file("image/gif", MIB)), &mut model);
    app.update(
        Event::ImageUploadFailed {
            reason: "storage unavailable".into(),
        },
        &mut model,
    );

    let form = app.view(&model).add_image.unwrap();
    assert_eq!(form.image_error.as_deref(), Some("Image upload failed"));
    assert_eq!(form.image_url, None);
}

#[test]
fn new_file_clears_previous_upload() {
    let (app, mut model) = ready_with_modal();
    fill_valid(&app, &mut model);
    assert_eq!(model.form.image_url(), Some(HOSTED_URL));

    app.update(Event::ImageSelected(file("image/png", MIB)), &mut model);
    assert_eq!(model.form.image_url(), None);
}

#[test]
fn second_submit_while_submitting_is_ignored() {
    let (app, mut model) = ready_with_modal();
    fill_valid(&app, &mut model);
    app.update(Event::SubmitRequested, &mut model);

    let update = app.update(Event::SubmitRequested, &mut model);
    assert!(http_requests(&update.effects).is_empty());
    assert_eq!(model.form.phase(), FormPhase::Submitting);
}

#[test]
fn modal_cannot_be_closed_mid_submission() {
    let (app, mut model) = ready_with_modal();
    fill_valid(&app, &mut model);
    app.update(Event::SubmitRequested, &mut model);

    app.update(Event::AddImageClosed, &mut model);
    assert!(model.add_image_open);
    assert_eq!(model.form.title(), "Cat");
}

#[test]
fn closing_the_modal_discards_input() {
    let (app, mut model) = ready_with_modal();
    fill_valid(&app, &mut model);

    app.update(Event::AddImageClosed, &mut model);
    assert!(!model.add_image_open);
    assert_eq!(model.form.title(), "");
    assert_eq!(model.form.image_url(), None);
}

#[test]
fn stray_submit_response_is_ignored() {
    let (app, mut model) = ready_with_modal();
    app.update(Event::TitleChanged("Draft".into()), &mut model);

    app.update(Event::ImageSubmitted(Box::new(Ok(()))), &mut model);
    assert!(model.add_image_open);
    assert_eq!(model.form.title(), "Draft");
    assert!(model.toasts.is_empty());
}

#[test]
fn toasts_can_be_dismissed() {
    let (app, mut model) = ready_with_modal();
    app.update(Event::ImageSelected(file("image/png", MIB)), &mut model);
    app.update(Event::TitleChanged("Cat".into()), &mut model);
    app.update(Event::DescriptionChanged("Waiting".into()), &mut model);
    app.update(Event::SubmitRequested, &mut model);

    let id = app.view(&model).toasts[0].id;
    app.update(Event::DismissToast { id }, &mut model);
    assert!(app.view(&model).toasts.is_empty());
}

#[test]
fn configured_limits_drive_field_errors() {
    let (app, mut model) = ready_with_modal();
    let mut config = model.config.clone();
    config.max_image_bytes = 512 * 1024;
    config.accepted_media_types = vec!["image/png".into()];
    app.update(Event::ConfigUpdated(config), &mut model);

    app.update(Event::ImageSelected(file("image/png", 600 * 1024)), &mut model);
    assert_eq!(
        app.view(&model).add_image.unwrap().image_error.as_deref(),
        Some("The file must be smaller than 512KB")
    );

    app.update(Event::ImageSelected(file("image/gif", 100 * 1024)), &mut model);
    assert_eq!(
        app.view(&model).add_image.unwrap().image_error.as_deref(),
        Some("Only PNG files are accepted")
    );

    app.update(Event::ImageSelected(file("image/png", 100 * 1024)), &mut model);
    assert!(app.view(&model).add_image.unwrap().image_error.is_none());
}

#[test]
fn config_with_unknown_media_type_is_rejected() {
    let (app, mut model) = ready_with_modal();
    let mut config = model.config.clone();
    config.accepted_media_types = vec!["application/x-nothing".into()];
    app.update(Event::ConfigUpdated(config), &mut model);

    assert_eq!(model.config.accepted_media_types.len(), 3);
    app.update(Event::ImageSelected(file("image/gif", MIB)), &mut model);
    assert!(app.view(&model).add_image.unwrap().image_error.is_none());
}
