//! Real-time config (RTC) callout dispatch.
//!
//! Given a publisher-supplied configuration of direct URLs and/or named
//! vendor templates, this crate validates the config, expands macros into
//! concrete URLs, deduplicates and caps the call set, issues bounded-time
//! requests to each, and aggregates every outcome into one ordered result
//! list for the ad-request pipeline.
//!
//! # Flow
//!
//! ```text
//! raw attribute string
//!   → RtcConfig::parse        (validation, timeout clamping)
//!   → build_callouts          (vendor lookup, macro merge/expand,
//!                              secure-url check, dedup, cap)
//!   → Dispatcher::execute     (concurrent fan-out, per-callout timeout)
//!   → Vec<CalloutResponse>    (candidate order, never a top-level error)
//! ```
//!
//! Failures degrade, never abort: an invalid config disables RTC for this
//! ad with a warning, and per-callout failures come back as error-tagged
//! records in the result list.

pub mod callout;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod metrics_defs;
pub mod vendors;

use std::time::Duration;

pub use callout::{CalloutRequest, CalloutResponse, MAX_CALLOUTS, build_callouts};
pub use config::{DEFAULT_TIMEOUT_MS, RtcConfig};
pub use dispatcher::Dispatcher;
pub use errors::CalloutError;
pub use shared::macros::MacroMap;
pub use vendors::VendorRegistry;

/// RTC execution service: a vendor registry plus a shared HTTP client.
///
/// No per-execution state lives here; the seen-URL set and callout counter
/// are confined to each `execute` call.
#[derive(Clone, Default)]
pub struct RealTimeConfig {
    dispatcher: Dispatcher,
    registry: VendorRegistry,
}

impl RealTimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: VendorRegistry) -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            registry,
        }
    }

    pub fn with_dispatcher(registry: VendorRegistry, dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            registry,
        }
    }

    /// Run one RTC execution for an ad.
    ///
    /// `raw_config` is the JSON attribute value; `network_macros` are the
    /// ad network's substitutions, which win over publisher-declared macros
    /// on key collisions. Resolves to an empty list without any network
    /// activity when the config is invalid or yields no candidates.
    pub async fn execute(
        &self,
        raw_config: &str,
        network_macros: &MacroMap,
    ) -> Vec<CalloutResponse> {
        let Some(config) = RtcConfig::parse(raw_config) else {
            return Vec::new();
        };
        let slots = build_callouts(&config, network_macros, &self.registry);
        if slots.is_empty() {
            return Vec::new();
        }
        let budget = Duration::from_millis(config.timeout_millis);
        self.dispatcher.execute(slots, budget).await
    }
}
