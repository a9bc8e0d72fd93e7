use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures raised while wiring up the page. None of these are fatal to an individual component,
/// see [`crate::install`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A platform call rejected with a JS exception. Holds the debug rendering of the thrown
    /// value, since [`JsValue`] itself cannot leave the main thread.
    #[error("platform call failed: {0}")]
    Js(String),

    /// A global that must exist in a browser context (`window`, `document`, `<head>`) is absent.
    #[error("missing global: {0}")]
    MissingGlobal(&'static str),

    /// Configuration values break an ordering the controllers rely on.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Self::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{value:?}")),
        )
    }
}

impl From<Error> for JsValue {
    fn from(error: Error) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
