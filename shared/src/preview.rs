use serde::{Deserialize, Serialize};

pub const OPEN_ORIGINAL_LABEL: &str = "Open original";

/// Which image the preview overlay shows. Closing keeps the last URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSelection {
    pub is_open: bool,
    pub selected_url: String,
}

impl PreviewSelection {
    pub fn view(&mut self, url: impl Into<String>) {
        self.selected_url = url.into();
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewOverlay {
    pub image_url: String,
    pub original_link: String,
    pub original_link_label: String,
}

/// Renders the overlay for `selection`, or nothing while it is closed.
#[must_use]
pub fn overlay(selection: &PreviewSelection) -> Option<PreviewOverlay> {
    selection.is_open.then(|| PreviewOverlay {
        image_url: selection.selected_url.clone(),
        original_link: selection.selected_url.clone(),
        original_link_label: OPEN_ORIGINAL_LABEL.into(),
    })
}
