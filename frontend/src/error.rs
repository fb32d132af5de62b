use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while wiring the page.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid site settings: {0}")]
    Settings(#[from] serde_json::Error),
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        SiteError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

/// Failures of the external send operation behind the contact form.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("could not encode request: {0}")]
    Encode(String),
    #[error("server responded with status {0}")]
    Status(u16),
}
