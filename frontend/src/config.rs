use std::str::FromStr;

use log::Level;
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::EnhanceError;

/// Page markup hooks and presentation values used by the enhancement behaviors.
///
/// Every field has a default matching the stock site markup, so `initSite()` can be
/// called without options. Hosts embedding the script on differently structured
/// pages override individual fields from JS:
///
/// ```js
/// initSite({ navbar_selector: "#top", copy_revert_ms: 1500 });
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub reveal_selector: String,
    pub active_class: String,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,

    pub glow_selector: String,

    pub navbar_selector: String,
    pub navbar_scroll_threshold: f64,
    pub navbar_scrolled_background: String,
    pub navbar_scrolled_shadow: String,
    pub navbar_top_background: String,
    pub navbar_top_shadow: String,

    pub anchor_selector: String,

    pub copy_icon_selector: String,
    pub copy_icon_class: String,
    pub copied_icon_class: String,
    pub copied_icon_color: String,
    pub copy_revert_ms: u32,

    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            reveal_selector: ".reveal".to_string(),
            active_class: "active".to_string(),
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),

            glow_selector: ".hover-glowing".to_string(),

            navbar_selector: ".navbar".to_string(),
            navbar_scroll_threshold: 50.0,
            navbar_scrolled_background: "rgba(8, 8, 12, 0.85)".to_string(),
            navbar_scrolled_shadow: "0 4px 30px rgba(0, 0, 0, 0.1)".to_string(),
            navbar_top_background: "rgba(8, 8, 12, 0.7)".to_string(),
            navbar_top_shadow: "none".to_string(),

            anchor_selector: "a[href^=\"#\"]".to_string(),

            copy_icon_selector: "i".to_string(),
            copy_icon_class: "fa-regular fa-copy".to_string(),
            copied_icon_class: "fa-solid fa-check".to_string(),
            copied_icon_color: "#4ade80".to_string(), // green
            copy_revert_ms: 2000,

            log_level: "info".to_string(),
        }
    }
}

impl SiteConfig {
    /// Reads the optional options object handed to `initSite`.
    pub fn from_js(options: JsValue) -> Result<Self, EnhanceError> {
        if options.is_undefined() || options.is_null() {
            return Ok(Self::default());
        }
        let config: Self = serde_wasm_bindgen::from_value(options)
            .map_err(|e| EnhanceError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EnhanceError> {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(EnhanceError::InvalidConfig(format!(
                "reveal_threshold must be within 0..=1, got {}",
                self.reveal_threshold
            )));
        }
        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> Result<Level, EnhanceError> {
        Level::from_str(&self.log_level).map_err(|_| {
            EnhanceError::InvalidConfig(format!("unknown log level '{}'", self.log_level))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_markup() {
        let config = SiteConfig::default();
        assert_eq!(config.reveal_selector, ".reveal");
        assert_eq!(config.reveal_root_margin, "0px 0px -50px 0px");
        assert_eq!(config.navbar_scroll_threshold, 50.0);
        assert_eq!(config.copy_revert_ms, 2000);
        assert_eq!(config.level().unwrap(), Level::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_options_keep_remaining_defaults() {
        let config: SiteConfig = serde_json::from_str(
            r##"{ "navbar_selector": "#top", "copy_revert_ms": 1500, "log_level": "debug" }"##,
        )
        .unwrap();
        assert_eq!(config.navbar_selector, "#top");
        assert_eq!(config.copy_revert_ms, 1500);
        assert_eq!(config.level().unwrap(), Level::Debug);
        assert_eq!(config.glow_selector, ".hover-glowing");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = serde_json::from_str::<SiteConfig>(r#"{ "navbar_selectr": ".nav" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn bad_values_fail_validation() {
        let config = SiteConfig {
            log_level: "loud".to_string(),
            ..SiteConfig::default()
        };
        assert!(matches!(config.validate(), Err(EnhanceError::InvalidConfig(_))));

        let config = SiteConfig {
            reveal_threshold: 1.5,
            ..SiteConfig::default()
        };
        assert!(matches!(config.validate(), Err(EnhanceError::InvalidConfig(_))));
    }
}
