use core::fmt;

use patchwork_core::HostError;
use wasm_bindgen::JsValue;

/// Failure raised while talking to the browser document.
#[derive(Debug, Clone)]
pub enum WebError {
    /// No `window` or `document`; the host is not running in a page.
    DomUnavailable,
    /// `mount` was given an id that matches no element.
    RootNotFound(String),
    /// A DOM call threw; holds the thrown value's text.
    Js(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DomUnavailable => f.write_str("no browser document to mount into"),
            Self::RootNotFound(id) => write!(f, "mount container `#{id}` not found"),
            Self::Js(thrown) => write!(f, "DOM call threw: {thrown}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<JsValue> for WebError {
    fn from(thrown: JsValue) -> Self {
        match thrown.as_string() {
            Some(message) => Self::Js(message),
            None => Self::Js(format!("{thrown:?}")),
        }
    }
}

impl From<WebError> for HostError {
    fn from(err: WebError) -> Self {
        HostError::Backend(err.to_string())
    }
}

/// Maps a thrown DOM exception straight to the reconciler's error type.
pub(crate) fn js_error(thrown: JsValue) -> HostError {
    WebError::from(thrown).into()
}
