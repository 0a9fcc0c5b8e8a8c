use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

use crate::error::EnhanceError;

pub fn window() -> Result<Window, EnhanceError> {
    web_sys::window().ok_or_else(|| EnhanceError::Dom("no global window".to_string()))
}

pub fn document() -> Result<Document, EnhanceError> {
    window()?
        .document()
        .ok_or_else(|| EnhanceError::Dom("window has no document".to_string()))
}

/// All elements matching `selector`, in document order.
pub fn select_all(document: &Document, selector: &str) -> Result<Vec<Element>, EnhanceError> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(|e| EnhanceError::dom(&format!("querySelectorAll('{}')", selector), e))?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// First element matching `selector`, or None. Invalid selectors are reported.
pub fn select_one(document: &Document, selector: &str) -> Result<Option<Element>, EnhanceError> {
    document
        .query_selector(selector)
        .map_err(|e| EnhanceError::dom(&format!("querySelector('{}')", selector), e))
}

pub fn is_loading(document: &Document) -> bool {
    js_sys::Reflect::get(document, &"readyState".into())
        .ok()
        .and_then(|state| state.as_string())
        .map(|state| state == "loading")
        .unwrap_or(false)
}
