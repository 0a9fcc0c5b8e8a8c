use std::cell::Cell;

use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

pub mod anchor;
pub mod clipboard;
pub mod config;
pub mod dom;
pub mod error;
pub mod glow;
pub mod navbar;
pub mod reveal;

pub use clipboard::copy_code;
pub use config::SiteConfig;
pub use error::EnhanceError;

thread_local! {
    static INITIALIZED: Cell<bool> = Cell::new(false);
}

/// Attaches every page behavior. Each one is independent, so a failure in one
/// does not stop the others from attaching; the first failure is returned.
pub fn attach_all(
    window: &Window,
    document: &Document,
    config: &SiteConfig,
) -> Result<(), EnhanceError> {
    let results = [
        ("reveal", reveal::attach(document, config).map(|_| ())),
        ("glow", glow::attach(document, config).map(|_| ())),
        ("navbar", navbar::attach(window, document, config).map(|_| ())),
        ("anchors", anchor::attach(document, config).map(|_| ())),
    ];

    let mut first_err = None;
    for (behavior, result) in results {
        if let Err(e) = result {
            error!("Failed to attach {}: {}", behavior, e);
            first_err.get_or_insert(e);
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn expose_copy_helper(window: &Window) -> Result<(), EnhanceError> {
    let helper = Closure::wrap(Box::new(copy_code) as Box<dyn Fn(Element)>);
    js_sys::Reflect::set(window, &JsValue::from_str("copyCode"), helper.as_ref())
        .map_err(|e| EnhanceError::dom("window.copyCode", e))?;
    helper.forget();
    Ok(())
}

fn attach_when_ready(
    window: Window,
    document: Document,
    config: SiteConfig,
) -> Result<(), EnhanceError> {
    if !dom::is_loading(&document) {
        return attach_all(&window, &document, &config);
    }

    let target = document.clone();
    let on_ready: Closure<dyn FnMut()> = Closure::once(move || {
        if let Err(e) = attach_all(&window, &document, &config) {
            error!("Page enhancement incomplete: {}", e);
        }
    });
    target
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
        .map_err(|e| EnhanceError::dom("DOMContentLoaded listener", e))?;
    on_ready.forget();
    info!("Waiting for DOMContentLoaded");
    Ok(())
}

/// One-time page setup. Call once from the page, optionally with a partial
/// `SiteConfig` object; repeated calls are ignored.
#[wasm_bindgen(js_name = initSite)]
pub fn init(options: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    if INITIALIZED.with(|done| done.get()) {
        warn!("initSite called more than once, ignoring");
        return Ok(());
    }

    let config = SiteConfig::from_js(options)?;
    console_log::init_with_level(config.level()?).map_err(|e| EnhanceError::Logger(e.to_string()))?;
    INITIALIZED.with(|done| done.set(true));

    info!("Starting site enhancements");
    clipboard::configure(config.clone());

    let window = dom::window()?;
    let document = dom::document()?;
    expose_copy_helper(&window)?;
    attach_when_ready(window, document, config)?;
    Ok(())
}
