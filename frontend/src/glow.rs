use log::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, MouseEvent};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::EnhanceError;

pub const X_VAR: &str = "--x";
pub const Y_VAR: &str = "--y";

/// Pointer position relative to an element's top-left corner, in CSS pixels.
/// Not clamped: at the edge of entry/exit it may be negative or exceed the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerOffset {
    pub x: f64,
    pub y: f64,
}

impl PointerOffset {
    pub fn relative_to(client_x: f64, client_y: f64, left: f64, top: f64) -> Self {
        Self {
            x: client_x - left,
            y: client_y - top,
        }
    }

    pub fn css_values(&self) -> (String, String) {
        (px(self.x), px(self.y))
    }
}

/// `clientX`/`clientY` as doubles. web-sys binds them as `i32`, which would
/// truncate fractional pointer positions, so they are read off the event object.
pub fn client_position(event: &JsValue) -> Option<(f64, f64)> {
    let coord = |name: &str| js_sys::Reflect::get(event, &JsValue::from_str(name)).ok()?.as_f64();
    Some((coord("clientX")?, coord("clientY")?))
}

fn px(value: f64) -> String {
    format!("{}px", value)
}

pub fn publish(card: &HtmlElement, offset: PointerOffset) -> Result<(), JsValue> {
    let (x, y) = offset.css_values();
    let style = card.style();
    style.set_property(X_VAR, &x)?;
    style.set_property(Y_VAR, &y)?;
    Ok(())
}

fn track(card: HtmlElement) -> Result<(), EnhanceError> {
    let target = card.clone();
    let on_move = Closure::wrap(Box::new(move |e: MouseEvent| {
        let (client_x, client_y) = client_position(&e)
            .unwrap_or_else(|| (f64::from(e.client_x()), f64::from(e.client_y())));
        let rect = card.get_bounding_client_rect();
        let offset = PointerOffset::relative_to(client_x, client_y, rect.left(), rect.top());
        if let Err(e) = publish(&card, offset) {
            debug!("Glow update skipped: {:?}", e);
        }
    }) as Box<dyn FnMut(MouseEvent)>);

    target
        .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())
        .map_err(|e| EnhanceError::dom("mousemove listener", e))?;
    on_move.forget();
    Ok(())
}

pub fn attach(document: &Document, config: &SiteConfig) -> Result<usize, EnhanceError> {
    let mut tracked = 0;
    for element in dom::select_all(document, &config.glow_selector)? {
        let Ok(card) = element.dyn_into::<HtmlElement>() else {
            continue;
        };
        track(card)?;
        tracked += 1;
    }
    info!("Hover glow tracking {} cards", tracked);
    Ok(tracked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_relative_to_top_left_corner() {
        let offset = PointerOffset::relative_to(130.0, 40.0, 100.0, 20.0);
        assert_eq!(offset, PointerOffset { x: 30.0, y: 20.0 });
        assert_eq!(offset.css_values(), ("30px".to_string(), "20px".to_string()));
    }

    #[test]
    fn offsets_are_not_clamped() {
        let offset = PointerOffset::relative_to(95.0, 10.5, 100.0, 20.0);
        assert_eq!(offset.css_values(), ("-5px".to_string(), "-9.5px".to_string()));
    }

    #[test]
    fn fractional_rect_keeps_fraction() {
        let offset = PointerOffset::relative_to(130.0, 40.0, 99.75, 20.0);
        assert_eq!(offset.x, 30.25);
        assert_eq!(px(offset.x), "30.25px");
    }
}
