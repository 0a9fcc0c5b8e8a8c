use log::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::EnhanceError;

const STATE_ATTR: &str = "data-reveal";

/// One-shot reveal tag carried by every observed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    Revealed,
}

/// What the observer callback has to do for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealAction {
    None,
    RevealAndUnobserve,
}

impl RevealState {
    pub fn as_str(self) -> &'static str {
        match self {
            RevealState::Pending => "pending",
            RevealState::Revealed => "revealed",
        }
    }

    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("revealed") => RevealState::Revealed,
            _ => RevealState::Pending,
        }
    }

    /// Revealed is terminal: later reports, intersecting or not, change nothing.
    pub fn on_intersection(self, is_intersecting: bool) -> (RevealState, RevealAction) {
        match (self, is_intersecting) {
            (RevealState::Pending, true) => {
                (RevealState::Revealed, RevealAction::RevealAndUnobserve)
            }
            (state, _) => (state, RevealAction::None),
        }
    }
}

fn state_of(element: &Element) -> RevealState {
    RevealState::parse(element.get_attribute(STATE_ATTR).as_deref())
}

fn handle_entry(
    entry: &IntersectionObserverEntry,
    observer: &IntersectionObserver,
    active_class: &str,
) -> Result<(), JsValue> {
    let target = entry.target();
    let (next, action) = state_of(&target).on_intersection(entry.is_intersecting());
    if action == RevealAction::RevealAndUnobserve {
        target.class_list().add_1(active_class)?;
        target.set_attribute(STATE_ATTR, next.as_str())?;
        observer.unobserve(&target);
    }
    Ok(())
}

pub fn attach(document: &Document, config: &SiteConfig) -> Result<usize, EnhanceError> {
    let targets = dom::select_all(document, &config.reveal_selector)?;
    if targets.is_empty() {
        debug!("No '{}' elements to reveal", config.reveal_selector);
        return Ok(0);
    }

    let active_class = config.active_class.clone();
    let on_entries = move |entries: js_sys::Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if let Err(e) = handle_entry(&entry, &observer, &active_class) {
                debug!("Reveal update skipped: {:?}", e);
            }
        }
    };
    let callback =
        Closure::wrap(Box::new(on_entries) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
    options.set_root_margin(&config.reveal_root_margin);

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .map_err(|e| EnhanceError::dom("IntersectionObserver", e))?;
    // Lives for the whole page; there is no teardown.
    callback.forget();

    let mut observed = 0;
    for target in &targets {
        if state_of(target) == RevealState::Revealed {
            continue;
        }
        target
            .set_attribute(STATE_ATTR, RevealState::Pending.as_str())
            .map_err(|e| EnhanceError::dom("reveal state", e))?;
        observer.observe(target);
        observed += 1;
    }

    info!("Reveal observer watching {} elements", observed);
    Ok(observed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_reveals_on_first_intersection() {
        let (state, action) = RevealState::Pending.on_intersection(true);
        assert_eq!(state, RevealState::Revealed);
        assert_eq!(action, RevealAction::RevealAndUnobserve);
    }

    #[test]
    fn pending_stays_pending_while_offscreen() {
        let (state, action) = RevealState::Pending.on_intersection(false);
        assert_eq!(state, RevealState::Pending);
        assert_eq!(action, RevealAction::None);
    }

    #[test]
    fn revealed_never_reverts_or_refires() {
        let mut state = RevealState::Pending;
        let mut reveals = 0;
        for intersecting in [true, false, true, true, false] {
            let (next, action) = state.on_intersection(intersecting);
            if action == RevealAction::RevealAndUnobserve {
                reveals += 1;
            }
            state = next;
            assert_eq!(state, RevealState::Revealed);
        }
        assert_eq!(reveals, 1);
    }

    #[test]
    fn attribute_round_trip() {
        assert_eq!(RevealState::parse(Some("revealed")), RevealState::Revealed);
        assert_eq!(RevealState::parse(Some("pending")), RevealState::Pending);
        assert_eq!(RevealState::parse(None), RevealState::Pending);
        assert_eq!(RevealState::parse(Some("bogus")), RevealState::Pending);
    }
}
