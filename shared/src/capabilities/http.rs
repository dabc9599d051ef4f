//! Requests against the image service, sent through the Crux HTTP capability.

use crux_http::{Http, Response};
use tracing::debug;
use url::Url;

use crate::config::GalleryConfig;
use crate::error::NetworkError;
use crate::event::Event;
use crate::model::{CreateImageRequest, Cursor, Page};
use crate::pagination::PageRequest;

pub type HttpCapability = Http<Event>;

pub const MAX_URL_LENGTH: usize = 2048;
pub const AFTER_PARAM: &str = "after";

fn truncate_url(url: &str) -> String {
    if url.len() <= 100 {
        url.to_string()
    } else {
        let mut end = 100;
        while !url.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &url[..end])
    }
}

fn images_url(config: &GalleryConfig) -> Result<Url, NetworkError> {
    config
        .images_url()
        .map_err(|e| NetworkError::InvalidUrl(e.to_string()))
}

/// `GET {base}{images_path}?after=<cursor>`; the parameter is omitted for the first page.
pub fn list_images_url(config: &GalleryConfig, cursor: Option<&Cursor>) -> Result<Url, NetworkError> {
    let mut url = images_url(config)?;
    if let Some(cursor) = cursor {
        url.query_pairs_mut().append_pair(AFTER_PARAM, cursor.as_str());
    }
    if url.as_str().len() > MAX_URL_LENGTH {
        return Err(NetworkError::InvalidUrl(format!(
            "{} exceeds {MAX_URL_LENGTH} bytes",
            truncate_url(url.as_str())
        )));
    }
    Ok(url)
}

pub fn encode_create_body(body: &CreateImageRequest) -> Result<Vec<u8>, NetworkError> {
    serde_json::to_vec(body).map_err(|e| NetworkError::Decode(e.to_string()))
}

fn transport_error(e: &crux_http::Error) -> NetworkError {
    NetworkError::Transport(e.to_string())
}

/// Maps a list response to a page. Non-2xx statuses and missing bodies are errors.
pub fn page_from_response(result: crux_http::Result<Response<Page>>) -> Result<Page, NetworkError> {
    let mut response = result.map_err(|e| transport_error(&e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(NetworkError::Status {
            code: u16::from(status),
        });
    }
    response.take_body().ok_or(NetworkError::EmptyBody)
}

/// Maps a create response to success or failure; the body is not read.
pub fn ack_from_response(result: crux_http::Result<Response<Vec<u8>>>) -> Result<(), NetworkError> {
    let response = result.map_err(|e| transport_error(&e))?;
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(NetworkError::Status {
            code: u16::from(status),
        })
    }
}

/// Asks the shell for one page. The response comes back as [`Event::PageFetched`].
pub fn fetch_page(
    http: &HttpCapability,
    config: &GalleryConfig,
    request: PageRequest,
) -> Result<(), NetworkError> {
    let url = list_images_url(config, request.cursor.as_ref())?;
    debug!(url = %url, generation = request.generation, "fetching page");

    http.get(url.as_str())
        .expect_json::<Page>()
        .send(move |result| Event::PageFetched {
            request,
            result: Box::new(page_from_response(result)),
        });
    Ok(())
}

/// Posts a new image record. The outcome comes back as [`Event::ImageSubmitted`].
pub fn create_image(
    http: &HttpCapability,
    config: &GalleryConfig,
    body: &CreateImageRequest,
) -> Result<(), NetworkError> {
    let url = images_url(config)?;
    let bytes = encode_create_body(body)?;
    debug!(url = %url, bytes = bytes.len(), "submitting image");

    http.post(url.as_str())
        .header("Content-Type", "application/json")
        .body_bytes(bytes)
        .send(|result| Event::ImageSubmitted(Box::new(ack_from_response(result))));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_no_after_param() {
        let url = list_images_url(&GalleryConfig::default(), None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/images");
    }

    #[test]
    fn cursor_is_sent_as_after() {
        let url = list_images_url(&GalleryConfig::default(), Some(&Cursor::new("294"))).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/images?after=294");
    }

    #[test]
    fn cursor_is_percent_encoded() {
        let url = list_images_url(&GalleryConfig::default(), Some(&Cursor::new("a b&c"))).unwrap();
        assert_eq!(url.query(), Some("after=a+b%26c"));
    }

    #[test]
    fn oversized_cursor_is_refused() {
        let cursor = Cursor::new("x".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            list_images_url(&GalleryConfig::default(), Some(&cursor)),
            Err(NetworkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn bad_base_url_is_a_network_error() {
        let config = GalleryConfig {
            api_base_url: "not a url".into(),
            ..GalleryConfig::default()
        };
        assert!(matches!(
            list_images_url(&config, None),
            Err(NetworkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn create_body_is_json() {
        let body = CreateImageRequest {
            title: "Dog".into(),
            description: "Running".into(),
            url: "https://cdn.example.com/dog.gif".into(),
        };
        let bytes = encode_create_body(&body).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["url"], "https://cdn.example.com/dog.gif");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "é".repeat(80);
        let short = truncate_url(&long);
        assert!(short.ends_with("..."));
        assert!(short.len() <= 103);
    }
}
