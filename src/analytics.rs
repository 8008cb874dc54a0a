//! Custom event tracking through Matomo.

use std::fmt;
use std::sync::Arc;

use leptos::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatomoEvent {
    pub event_category: &'static str,
    pub event_action: &'static str,
    pub event_name: &'static str,
}

pub trait AnalyticsTracker: Send + Sync {
    fn track(&self, event: &MatomoEvent);
}

/// Pushes events onto the page's `_paq` queue. The Matomo loader drains it
/// once it has loaded, so events tracked before that are not lost.
#[derive(Debug, Default, Clone, Copy)]
pub struct Matomo;

impl AnalyticsTracker for Matomo {
    fn track(&self, event: &MatomoEvent) {
        #[cfg(target_arch = "wasm32")]
        {
            use leptos::wasm_bindgen::prelude::wasm_bindgen;

            #[wasm_bindgen(
                inline_js = "export function track_event(category, action, name) { (window._paq = window._paq || []).push(['trackEvent', category, action, name]); }"
            )]
            extern "C" {
                fn track_event(category: &str, action: &str, name: &str);
            }

            track_event(event.event_category, event.event_action, event.event_name);
        }

        #[cfg(not(target_arch = "wasm32"))]
        tracing::debug!(
            category = event.event_category,
            action = event.event_action,
            name = event.event_name,
            "analytics event outside the browser"
        );
    }
}

/// Cloneable handle to the tracker in use.
#[derive(Clone)]
pub struct Analytics(Arc<dyn AnalyticsTracker>);

impl Analytics {
    pub fn new(tracker: impl AnalyticsTracker + 'static) -> Self {
        Self(Arc::new(tracker))
    }

    pub fn shared(tracker: Arc<dyn AnalyticsTracker>) -> Self {
        Self(tracker)
    }

    pub fn track(&self, event: &MatomoEvent) {
        self.0.track(event);
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new(Matomo)
    }
}

impl fmt::Debug for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Analytics").finish_non_exhaustive()
    }
}

pub fn provide_analytics(analytics: Analytics) {
    provide_context(analytics);
}

pub fn use_analytics() -> Analytics {
    use_context::<Analytics>().unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatomoConfig {
    /// Base URL of the Matomo instance, e.g. "https://matomo.example.org/"
    pub url: String,

    /// Matomo site id
    pub site_id: u32,
}

/// JSON string literal that is also safe inside a `<script>` element.
fn script_string(value: &str) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// The standard Matomo loader, queueing a page view.
pub fn matomo_snippet(config: &MatomoConfig) -> Result<String, serde_json::Error> {
    let base = if config.url.ends_with('/') {
        script_string(&config.url)?
    } else {
        script_string(&format!("{}/", config.url))?
    };

    Ok(format!(
        "var _paq = window._paq = window._paq || [];\
_paq.push(['trackPageView']);\
_paq.push(['enableLinkTracking']);\
(function() {{\
var u={base};\
_paq.push(['setTrackerUrl', u+'matomo.php']);\
_paq.push(['setSiteId', {site_id}]);\
var d=document, g=d.createElement('script'), s=d.getElementsByTagName('script')[0];\
g.async=true; g.src=u+'matomo.js'; s.parentNode.insertBefore(g,s);\
}})();",
        site_id = config.site_id,
    ))
}
