mod http;

pub use self::http::{
    ack_from_response, create_image, encode_create_body, fetch_page, list_images_url,
    page_from_response, HttpCapability, AFTER_PARAM, MAX_URL_LENGTH,
};

pub use crux_core::render::Render;
pub use crux_http::Http;

#[allow(unused_imports)]
use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
}
