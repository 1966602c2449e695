//! Callout building: turns a validated config into an ordered list of
//! ready-to-send requests and pre-send error records.
//!
//! Candidate order is significant and preserved end to end: publisher
//! `urls` first, in array order, then vendor entries in document order.
//! The seen-URL set and the accepted-callout counter live only for one
//! build pass; nothing carries over between executions.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use shared::macros::{self, MacroMap};
use shared::urls;

use crate::config::RtcConfig;
use crate::errors::CalloutError;
use crate::vendors::VendorRegistry;

/// Hard cap on accepted callouts per execution. Rejected candidates
/// (duplicates, insecure URLs, unknown vendors) do not consume a slot.
pub const MAX_CALLOUTS: usize = 5;

/// One outbound request, fully expanded. `label` identifies the callout in
/// the result list: the lowercase vendor name for vendor entries, the
/// expanded URL for direct URLs.
#[derive(Clone, Debug, PartialEq)]
pub struct CalloutRequest {
    pub url: String,
    pub label: String,
}

/// Outcome of one RTC callout, pre-send rejections included.
///
/// At most one of `rtc_response`/`error` is set; both absent means the
/// callout succeeded with an empty body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalloutResponse {
    pub callout: String,
    pub rtc_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtc_response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CalloutError>,
}

impl CalloutResponse {
    pub fn success(callout: impl Into<String>, rtc_time: u64, rtc_response: Option<Value>) -> Self {
        Self {
            callout: callout.into(),
            rtc_time,
            rtc_response,
            error: None,
        }
    }

    pub fn error(callout: impl Into<String>, rtc_time: u64, error: CalloutError) -> Self {
        Self {
            callout: callout.into(),
            rtc_time,
            rtc_response: None,
            error: Some(error),
        }
    }
}

/// A candidate after the build pass: ready to send, or already settled as
/// an error. Slot order matches candidate order.
#[derive(Clone, Debug, PartialEq)]
pub enum CalloutSlot {
    Ready(CalloutRequest),
    Failed(CalloutResponse),
}

/// Walk all configured candidates and produce one slot per candidate.
pub fn build_callouts(
    config: &RtcConfig,
    network_macros: &MacroMap,
    registry: &VendorRegistry,
) -> Vec<CalloutSlot> {
    let mut builder = CalloutBuilder::new(registry, network_macros);
    for url in &config.urls {
        builder.push_url(url);
    }
    for (vendor, entry_macros) in &config.vendors {
        builder.push_vendor(vendor, entry_macros);
    }
    builder.slots
}

struct CalloutBuilder<'a> {
    registry: &'a VendorRegistry,
    network_macros: &'a MacroMap,
    seen_urls: HashSet<String>,
    accepted: usize,
    slots: Vec<CalloutSlot>,
}

impl<'a> CalloutBuilder<'a> {
    fn new(registry: &'a VendorRegistry, network_macros: &'a MacroMap) -> Self {
        Self {
            registry,
            network_macros,
            seen_urls: HashSet::new(),
            accepted: 0,
            slots: Vec::new(),
        }
    }

    fn push_url(&mut self, template: &str) {
        // Once the cap is hit the candidate is rejected unexpanded.
        if self.accepted >= MAX_CALLOUTS {
            self.reject(template, CalloutError::MaxCalloutsExceeded);
            return;
        }
        let allow_list = allow_list(self.network_macros);
        let expanded = macros::expand(template, self.network_macros, &allow_list);
        self.try_accept(expanded.clone(), expanded);
    }

    fn push_vendor(&mut self, vendor: &str, entry_macros: &MacroMap) {
        let vendor = vendor.to_ascii_lowercase();
        // Unknown vendors are reported as such even after the cap is hit.
        let Some(template) = self.registry.lookup(&vendor) else {
            self.reject(vendor, CalloutError::UnknownVendor);
            return;
        };
        if self.accepted >= MAX_CALLOUTS {
            self.reject(vendor, CalloutError::MaxCalloutsExceeded);
            return;
        }
        // Ad-network macros are applied last so they win on key collisions.
        let mut merged = entry_macros.clone();
        for (name, value) in self.network_macros {
            merged.insert(name.clone(), value.clone());
        }
        let expanded = macros::expand(template, &merged, &allow_list(&merged));
        self.try_accept(expanded, vendor);
    }

    fn try_accept(&mut self, url: String, label: String) {
        if !urls::is_secure(&url) {
            self.reject(label, CalloutError::InsecureUrl);
            return;
        }
        if self.seen_urls.contains(&url) {
            self.reject(label, CalloutError::DuplicateUrl);
            return;
        }
        self.seen_urls.insert(url.clone());
        self.accepted += 1;
        self.slots.push(CalloutSlot::Ready(CalloutRequest { url, label }));
    }

    fn reject(&mut self, callout: impl Into<String>, error: CalloutError) {
        let callout = callout.into();
        tracing::debug!(
            %callout,
            error = error.as_str(),
            "rtc callout rejected before dispatch"
        );
        self.slots
            .push(CalloutSlot::Failed(CalloutResponse::error(callout, 0, error)));
    }
}

fn allow_list(macros: &MacroMap) -> HashSet<&str> {
    macros.keys().map(String::as_str).collect()
}
