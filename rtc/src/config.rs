//! RTC configuration parsing and validation.
//!
//! The configuration arrives as a JSON string read off a single host
//! attribute. Validation never fails outward: any malformed shape disables
//! RTC for this ad (the ad request proceeds without it) and leaves a
//! `tracing` warning for publisher troubleshooting.

use indexmap::IndexMap;
use serde_json::Value;
use shared::macros::MacroMap;

/// Upper bound on the per-callout time budget. A configured override may
/// only shrink it.
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

const KNOWN_KEYS: &[&str] = &["urls", "vendors", "timeoutMillis"];

/// A validated RTC configuration.
///
/// `vendors` preserves document order: vendor callouts are issued in the
/// order the publisher wrote them, after all direct `urls`.
#[derive(Clone, Debug, PartialEq)]
pub struct RtcConfig {
    pub urls: Vec<String>,
    pub vendors: IndexMap<String, MacroMap>,
    pub timeout_millis: u64,
}

impl RtcConfig {
    /// Parse and validate the raw attribute value.
    ///
    /// Returns `None` when RTC should be disabled: unparseable JSON, wrong
    /// shapes, or zero configured entries. Unknown top-level keys and
    /// invalid timeout overrides are warned about but tolerated.
    pub fn parse(raw: &str) -> Option<RtcConfig> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%error, "rtc config is not valid JSON, disabling rtc");
                return None;
            }
        };
        let Value::Object(fields) = value else {
            tracing::warn!("rtc config must be a JSON object, disabling rtc");
            return None;
        };

        for key in fields.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                tracing::warn!(%key, "unknown rtc config key");
            }
        }

        let urls = match fields.get("urls") {
            None => Vec::new(),
            Some(Value::Array(entries)) => {
                let mut urls = Vec::with_capacity(entries.len());
                for entry in entries {
                    let Value::String(url) = entry else {
                        tracing::warn!("rtc config urls must be strings, disabling rtc");
                        return None;
                    };
                    urls.push(url.clone());
                }
                urls
            }
            Some(_) => {
                tracing::warn!("rtc config urls must be an array, disabling rtc");
                return None;
            }
        };

        let vendors = match fields.get("vendors") {
            None => IndexMap::new(),
            Some(Value::Object(entries)) => {
                let mut vendors = IndexMap::with_capacity(entries.len());
                for (vendor, macros) in entries {
                    let Some(macros) = parse_macro_map(macros) else {
                        tracing::warn!(
                            %vendor,
                            "rtc vendor config must map macro names to scalar values, \
                             disabling rtc"
                        );
                        return None;
                    };
                    vendors.insert(vendor.clone(), macros);
                }
                vendors
            }
            Some(_) => {
                tracing::warn!("rtc config vendors must be an object, disabling rtc");
                return None;
            }
        };

        if urls.is_empty() && vendors.is_empty() {
            tracing::warn!("rtc config has no urls and no vendors, disabling rtc");
            return None;
        }

        let timeout_millis = resolve_timeout(fields.get("timeoutMillis"));

        Some(RtcConfig {
            urls,
            vendors,
            timeout_millis,
        })
    }
}

/// Macro values may be written as strings, numbers, or booleans; they are
/// all substituted as strings. Nested arrays/objects are rejected.
fn parse_macro_map(value: &Value) -> Option<MacroMap> {
    let Value::Object(entries) = value else {
        return None;
    };
    let mut macros = MacroMap::with_capacity(entries.len());
    for (name, value) in entries {
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        macros.insert(name.clone(), value);
    }
    Some(macros)
}

/// The override is honored iff it is an integer strictly between zero and
/// the default: it can shrink the budget but never extend it.
fn resolve_timeout(value: Option<&Value>) -> u64 {
    let Some(value) = value else {
        return DEFAULT_TIMEOUT_MS;
    };
    match value.as_u64() {
        Some(timeout) if timeout > 0 && timeout < DEFAULT_TIMEOUT_MS => timeout,
        Some(timeout) => {
            tracing::warn!(
                timeout,
                default = DEFAULT_TIMEOUT_MS,
                "rtc timeoutMillis may only shrink the default, using default"
            );
            DEFAULT_TIMEOUT_MS
        }
        None => {
            tracing::warn!(
                ?value,
                "rtc timeoutMillis is not a positive integer, using default"
            );
            DEFAULT_TIMEOUT_MS
        }
    }
}
