use serde::Deserialize;

use crate::error::SiteError;

#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3001"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL
}

/// Id of the optional `<script type="application/json">` block holding overrides.
pub const SETTINGS_ELEMENT_ID: &str = "site-settings";

/// Tunables for every interactive piece of the page.
///
/// Any key missing from a JSON override keeps its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Navbar gets `scrolled` past this offset.
    pub scrolled_offset: f64,
    /// Back-to-top control shows past this offset.
    pub back_to_top_offset: f64,
    /// A section counts as current this far before its top edge.
    pub section_lead: f64,
    /// Height of the fixed header cleared by smooth scrolling.
    pub header_offset: f64,
    /// The mobile menu closes when the viewport grows wider than this.
    pub menu_breakpoint: f64,
    pub scroll_throttle_ms: u32,
    pub resize_debounce_ms: u32,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub counter_threshold: f64,
    pub counter_duration_ms: f64,
    pub counter_frame_ms: f64,
    pub status_hide_ms: u32,
    pub simulated_send_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scrolled_offset: 50.0,
            back_to_top_offset: 300.0,
            section_lead: 100.0,
            header_offset: 70.0,
            menu_breakpoint: 768.0,
            scroll_throttle_ms: 10,
            resize_debounce_ms: 250,
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
            counter_threshold: 0.5,
            counter_duration_ms: 2000.0,
            counter_frame_ms: 16.0,
            status_hide_ms: 5000,
            simulated_send_ms: 1500,
        }
    }
}

impl Settings {
    pub fn from_json(raw: &str) -> Result<Self, SiteError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Resolves a form endpoint: relative paths go to the backend.
    pub fn endpoint_url(endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", get_backend_url(), endpoint)
        } else {
            endpoint.to_string()
        }
    }
}
