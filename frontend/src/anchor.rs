use log::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::EnhanceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorTarget {
    /// Bare "#": default navigation is suppressed and nothing else happens.
    Empty,
    Id(String),
}

impl AnchorTarget {
    pub fn from_href(href: &str) -> Option<Self> {
        let fragment = href.strip_prefix('#')?;
        if fragment.is_empty() {
            return Some(AnchorTarget::Empty);
        }
        let id = urlencoding::decode(fragment)
            .map(|id| id.into_owned())
            .unwrap_or_else(|_| fragment.to_string());
        Some(AnchorTarget::Id(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    Ignored,
    TargetMissing,
    Scrolled,
}

fn smooth_scroll_to(target: &Element) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Resolves an in-page href and scrolls to its target if there is one.
pub fn follow(document: &Document, href: &str) -> ScrollOutcome {
    let id = match AnchorTarget::from_href(href) {
        Some(AnchorTarget::Id(id)) => id,
        Some(AnchorTarget::Empty) | None => {
            debug!("Anchor '{}' has no target, ignoring", href);
            return ScrollOutcome::Ignored;
        }
    };
    match document.get_element_by_id(&id) {
        Some(target) => {
            smooth_scroll_to(&target);
            ScrollOutcome::Scrolled
        }
        None => {
            debug!("Anchor target '#{}' not found", id);
            ScrollOutcome::TargetMissing
        }
    }
}

fn intercept(document: &Document, anchor: &Element) -> Result<(), EnhanceError> {
    let document = document.clone();
    let link = anchor.clone();
    let on_click = Closure::wrap(Box::new(move |e: Event| {
        e.prevent_default();
        let href = link.get_attribute("href").unwrap_or_default();
        follow(&document, &href);
    }) as Box<dyn FnMut(Event)>);

    anchor
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .map_err(|e| EnhanceError::dom("click listener", e))?;
    on_click.forget();
    Ok(())
}

/// Only anchors present now are intercepted; links added later keep default behavior.
pub fn attach(document: &Document, config: &SiteConfig) -> Result<usize, EnhanceError> {
    let anchors = dom::select_all(document, &config.anchor_selector)?;
    for anchor in &anchors {
        intercept(document, anchor)?;
    }
    info!("Smooth scrolling {} in-page links", anchors.len());
    Ok(anchors.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hash_is_empty() {
        assert_eq!(AnchorTarget::from_href("#"), Some(AnchorTarget::Empty));
    }

    #[test]
    fn fragment_names_an_id() {
        assert_eq!(
            AnchorTarget::from_href("#quick-start"),
            Some(AnchorTarget::Id("quick-start".to_string()))
        );
    }

    #[test]
    fn fragment_is_percent_decoded() {
        assert_eq!(
            AnchorTarget::from_href("#getting%20started"),
            Some(AnchorTarget::Id("getting started".to_string()))
        );
    }

    #[test]
    fn non_fragment_hrefs_are_not_targets() {
        assert_eq!(AnchorTarget::from_href("/docs#intro"), None);
        assert_eq!(AnchorTarget::from_href(""), None);
    }
}
