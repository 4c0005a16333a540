//! Error types
//!
//! Only construction can fail loudly. Everything after that degrades silently.

use thiserror::Error;

/// Errors raised by effect construction and platform bindings
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FxError {
    /// The drawing surface could not provide a 2D paint context
    #[error("drawing surface has no 2d context")]
    NoContext,
    /// A palette entry was not a `#rrggbb` color
    #[error("invalid color: {0}")]
    InvalidColor(String),
    /// An engine was given no colors to pick from
    #[error("palette is empty")]
    EmptyPalette,
    /// Audio synthesis is unsupported or blocked by the host
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),
    /// A browser call threw
    #[error("javascript error: {0}")]
    Js(String),
}

pub type Result<T> = std::result::Result<T, FxError>;

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for FxError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        FxError::Js(format!("{:?}", value))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<FxError> for wasm_bindgen::JsValue {
    fn from(err: FxError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
