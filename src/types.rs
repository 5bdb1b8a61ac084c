use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Size of the browser viewport in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Current `window.innerWidth` x `window.innerHeight`
    pub fn current() -> Self {
        let window = gloo_utils::window();
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Self::new(width, height)
    }

    /// Pixel size for the drawing surface, never zero
    pub fn surface_size(&self) -> (u32, u32) {
        (
            self.width.max(1.0).round() as u32,
            self.height.max(1.0).round() as u32,
        )
    }
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[serde(alias = "bot")]
    Assistant,
}

/// One persisted chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Creation time in epoch milliseconds, as a string
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
}

impl ChatMessage {
    pub fn new(id: String, text: String, sender: Sender, timestamp: DateTime<Utc>, user_id: String) -> Self {
        Self {
            id,
            text,
            sender,
            timestamp,
            user_id,
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTab {
    Upload,
    Chat,
}

impl ActiveTab {
    pub fn toggled(self) -> Self {
        match self {
            ActiveTab::Upload => ActiveTab::Chat,
            ActiveTab::Chat => ActiveTab::Upload,
        }
    }
}
