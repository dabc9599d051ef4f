use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Info => 3000,
            Self::Success => 2000,
            Self::Warning => 4000,
            Self::Error => 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastMessage {
    pub id: u64,
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
    pub duration_ms: u64,
}

/// Bounded queue of notices; the oldest is dropped when full.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<ToastMessage>,
    next_id: u64,
}

impl ToastQueue {
    pub fn push(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> u64 {
        self.next_id += 1;
        let id = self.next_id;

        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(ToastMessage {
            id,
            kind,
            title: title.into(),
            description: description.into(),
            duration_ms: kind.default_duration_ms(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToastMessage> {
        self.toasts.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&ToastMessage> {
        self.toasts.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
