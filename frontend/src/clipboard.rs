use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, HtmlElement};

use crate::config::SiteConfig;
use crate::error::{describe, EnhanceError};

#[wasm_bindgen]
extern "C" {
    // Throws synchronously when the Clipboard API is unavailable (insecure context).
    #[wasm_bindgen(catch, js_namespace = ["navigator", "clipboard"], js_name = writeText)]
    fn clipboard_write_text(text: &str) -> Result<js_sys::Promise, JsValue>;
}

thread_local! {
    static CONFIG: RefCell<Rc<SiteConfig>> = RefCell::new(Rc::new(SiteConfig::default()));
    static REVERTS: RefCell<PendingReverts<Element, Timeout>> = RefCell::new(PendingReverts::new());
}

pub fn configure(config: SiteConfig) {
    CONFIG.with(|c| *c.borrow_mut() = Rc::new(config));
}

fn current_config() -> Rc<SiteConfig> {
    CONFIG.with(|c| c.borrow().clone())
}

/// Glyph class and colour of a copy trigger's icon. An empty colour clears
/// the inline override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyIcon<'a> {
    pub class: &'a str,
    pub color: &'a str,
}

impl<'a> CopyIcon<'a> {
    pub fn idle(config: &'a SiteConfig) -> Self {
        Self {
            class: &config.copy_icon_class,
            color: "",
        }
    }

    pub fn confirmed(config: &'a SiteConfig) -> Self {
        Self {
            class: &config.copied_icon_class,
            color: &config.copied_icon_color,
        }
    }

    pub fn apply(&self, icon: &HtmlElement) -> Result<(), JsValue> {
        icon.set_class_name(self.class);
        if self.color.is_empty() {
            icon.style().remove_property("color")?;
        } else {
            icon.style().set_property("color", self.color)?;
        }
        Ok(())
    }
}

/// At most one pending revert per trigger control, keyed by the trigger itself.
/// Replacing an entry hands back the superseded handle so the caller can drop
/// (and thereby cancel) it. Each entry carries a generation so a fired handle
/// only removes itself, never a newer replacement.
#[derive(Debug)]
pub struct PendingReverts<K, T> {
    pending: Vec<(K, u64, T)>,
    next_generation: u64,
}

impl<K: PartialEq, T> PendingReverts<K, T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_generation: 0,
        }
    }

    pub fn next_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    pub fn replace(&mut self, key: K, generation: u64, handle: T) -> Option<T> {
        match self.pending.iter_mut().find(|(k, _, _)| *k == key) {
            Some(entry) => {
                entry.1 = generation;
                Some(std::mem::replace(&mut entry.2, handle))
            }
            None => {
                self.pending.push((key, generation, handle));
                None
            }
        }
    }

    /// Removes the entry for `key` if it is still the one started at `generation`.
    pub fn finish(&mut self, key: &K, generation: u64) -> Option<T> {
        let index = self
            .pending
            .iter()
            .position(|(k, g, _)| k == key && *g == generation)?;
        Some(self.pending.swap_remove(index).2)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.pending.len()
    }
}

impl<K: PartialEq, T> Default for PendingReverts<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

fn find_icon(trigger: &Element, config: &SiteConfig) -> Option<HtmlElement> {
    trigger
        .query_selector(&config.copy_icon_selector)
        .ok()
        .flatten()
        .and_then(|icon| icon.dyn_into::<HtmlElement>().ok())
}

fn show_confirmation(trigger: &Element, config: &Rc<SiteConfig>) -> Result<(), JsValue> {
    let Some(icon) = find_icon(trigger, config) else {
        debug!("Copy trigger has no '{}' icon", config.copy_icon_selector);
        return Ok(());
    };
    CopyIcon::confirmed(config).apply(&icon)?;

    let generation = REVERTS.with(|r| r.borrow_mut().next_generation());
    let revert_config = Rc::clone(config);
    let fired_trigger = trigger.clone();
    let revert = Timeout::new(config.copy_revert_ms, move || {
        if let Err(e) = CopyIcon::idle(&revert_config).apply(&icon) {
            debug!("Copy icon revert skipped: {:?}", e);
        }
        let finished = REVERTS.with(|r| r.borrow_mut().finish(&fired_trigger, generation));
        // This callback belongs to `finished`; release it once the callback has returned.
        spawn_local(async move { drop(finished) });
    });
    // Dropping the superseded timeout cancels it, so only the newest revert fires.
    let superseded = REVERTS.with(|r| r.borrow_mut().replace(trigger.clone(), generation, revert));
    drop(superseded);
    Ok(())
}

async fn write_text(text: &str) -> Result<(), EnhanceError> {
    let promise = clipboard_write_text(text)
        .map_err(|e| EnhanceError::ClipboardWriteFailed(describe(&e)))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| EnhanceError::ClipboardWriteFailed(describe(&e)))?;
    Ok(())
}

/// Copies the text of the element right before `trigger` and flashes a
/// checkmark on the trigger's icon. Failures are logged once and otherwise
/// leave the trigger untouched.
#[wasm_bindgen(js_name = copyCode)]
pub fn copy_code(trigger: Element) {
    let Some(code_block) = trigger.previous_element_sibling() else {
        debug!("Copy trigger has no preceding code block");
        return;
    };
    let text = code_block.text_content().unwrap_or_default();
    let config = current_config();

    spawn_local(async move {
        match write_text(&text).await {
            Ok(()) => {
                if let Err(e) = show_confirmation(&trigger, &config) {
                    debug!("Copy confirmation skipped: {:?}", e);
                }
            }
            Err(err) => error!("{}", err),
        }
    });
}
