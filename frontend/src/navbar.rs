use log::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::EnhanceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarTreatment {
    Top,
    Scrolled,
}

impl NavbarTreatment {
    /// Strictly greater than: sitting exactly on the threshold still counts as top.
    pub fn for_offset(scroll_y: f64, threshold: f64) -> Self {
        if scroll_y > threshold {
            NavbarTreatment::Scrolled
        } else {
            NavbarTreatment::Top
        }
    }

    /// (background, box-shadow)
    pub fn styles<'a>(&self, config: &'a SiteConfig) -> (&'a str, &'a str) {
        match self {
            NavbarTreatment::Scrolled => (
                config.navbar_scrolled_background.as_str(),
                config.navbar_scrolled_shadow.as_str(),
            ),
            NavbarTreatment::Top => (
                config.navbar_top_background.as_str(),
                config.navbar_top_shadow.as_str(),
            ),
        }
    }
}

pub fn apply(
    navbar: &HtmlElement,
    treatment: NavbarTreatment,
    config: &SiteConfig,
) -> Result<(), JsValue> {
    let (background, shadow) = treatment.styles(config);
    let style = navbar.style();
    style.set_property("background", background)?;
    style.set_property("box-shadow", shadow)?;
    Ok(())
}

pub fn attach(
    window: &Window,
    document: &Document,
    config: &SiteConfig,
) -> Result<bool, EnhanceError> {
    let navbar = match dom::select_one(document, &config.navbar_selector)? {
        Some(element) => match element.dyn_into::<HtmlElement>() {
            Ok(navbar) => navbar,
            Err(_) => {
                debug!("'{}' is not an HTML element, navbar left alone", config.navbar_selector);
                return Ok(false);
            }
        },
        None => {
            debug!("No '{}' on page, navbar left alone", config.navbar_selector);
            return Ok(false);
        }
    };

    let selector = config.navbar_selector.clone();
    let config = config.clone();
    let scroll_window = window.clone();
    let on_scroll = Closure::wrap(Box::new(move || {
        let scroll_y = scroll_window.scroll_y().unwrap_or(0.0);
        let treatment = NavbarTreatment::for_offset(scroll_y, config.navbar_scroll_threshold);
        if let Err(e) = apply(&navbar, treatment, &config) {
            debug!("Navbar update skipped: {:?}", e);
        }
    }) as Box<dyn FnMut()>);

    window
        .add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())
        .map_err(|e| EnhanceError::dom("scroll listener", e))?;
    on_scroll.forget();

    info!("Sticky navbar attached to '{}'", selector);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strictly_greater_than() {
        assert_eq!(NavbarTreatment::for_offset(51.0, 50.0), NavbarTreatment::Scrolled);
        assert_eq!(NavbarTreatment::for_offset(50.0, 50.0), NavbarTreatment::Top);
        assert_eq!(NavbarTreatment::for_offset(50.5, 50.0), NavbarTreatment::Scrolled);
        assert_eq!(NavbarTreatment::for_offset(0.0, 50.0), NavbarTreatment::Top);
    }

    #[test]
    fn treatment_depends_only_on_current_offset() {
        let offsets = [0.0, 400.0, 10.0, 51.0, 50.0];
        let treatments: Vec<_> = offsets
            .iter()
            .map(|y| NavbarTreatment::for_offset(*y, 50.0))
            .collect();
        assert_eq!(
            treatments,
            vec![
                NavbarTreatment::Top,
                NavbarTreatment::Scrolled,
                NavbarTreatment::Top,
                NavbarTreatment::Scrolled,
                NavbarTreatment::Top,
            ]
        );
    }

    #[test]
    fn styles_follow_config() {
        let config = SiteConfig::default();
        assert_eq!(
            NavbarTreatment::Scrolled.styles(&config),
            ("rgba(8, 8, 12, 0.85)", "0 4px 30px rgba(0, 0, 0, 0.1)")
        );
        assert_eq!(NavbarTreatment::Top.styles(&config), ("rgba(8, 8, 12, 0.7)", "none"));
    }
}
