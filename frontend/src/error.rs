use thiserror::Error;
use wasm_bindgen::{JsCast, JsError, JsValue};

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("Failed to copy text: {0}")]
    ClipboardWriteFailed(String),
    #[error("DOM operation failed: {0}")]
    Dom(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Logger initialization failed: {0}")]
    Logger(String),
}

impl EnhanceError {
    pub fn dom(context: &str, err: JsValue) -> Self {
        EnhanceError::Dom(format!("{}: {}", context, describe(&err)))
    }
}

impl From<EnhanceError> for JsValue {
    fn from(err: EnhanceError) -> Self {
        JsError::new(&err.to_string()).into()
    }
}

/// Best-effort text for a thrown JS value (Error objects, strings, anything else).
pub fn describe(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    match err.dyn_ref::<js_sys::Error>() {
        Some(e) => String::from(e.message()),
        None => format!("{:?}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = EnhanceError::ClipboardWriteFailed("NotAllowedError".to_string());
        assert_eq!(err.to_string(), "Failed to copy text: NotAllowedError");

        let err = EnhanceError::InvalidConfig("unknown log level 'loud'".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: unknown log level 'loud'");
    }
}
