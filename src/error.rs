use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised anywhere in the front end.
///
/// None of these are fatal: the component that hits one logs it and
/// degrades the single feature involved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// The drawing surface (canvas, adapter, device) could not be acquired
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A frame could not be encoded or presented
    #[error("render failed: {0}")]
    Render(String),

    /// The browser key-value store rejected a read or write
    #[error("storage error on '{key}': {message}")]
    Storage { key: String, message: String },

    /// A persisted or configured value did not parse
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Microphone or recorder could not be used
    #[error("media capture unavailable: {0}")]
    MediaCapture(String),

    /// A picked file was not an acceptable health report
    #[error("unsupported report: {0}")]
    InvalidReport(String),
}

impl AppError {
    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Wrap a thrown JS value as a media capture failure
    pub fn media(value: &JsValue) -> Self {
        Self::MediaCapture(describe_js(value))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Best-effort human readable text for a JS exception value.
pub fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

pub type AppResult<T> = Result<T, AppError>;
