//! Vendor registry: named URL templates for known RTC providers.

use std::collections::HashMap;

/// Built-in vendor table. Keys are lowercase by convention; callers
/// lowercase the configured vendor name before lookup, so a key stored with
/// uppercase characters would be unreachable.
const BUILTIN_VENDORS: &[(&str, &str)] = &[
    (
        "indexexchange",
        "https://amp.casalemedia.com/amprtc?v=1&siteID=SITE_ID&w=WIDTH&h=HEIGHT",
    ),
    (
        "medianet",
        "https://prebid.media.net/rtb/getprebid?cid=CID&w=WIDTH&h=HEIGHT&url=CANONICAL_URL",
    ),
    (
        "aps",
        "https://aax.amazon-adsystem.com/e/dtb/bid?src=PUB_ID&pubid=PUB_UUID&w=WIDTH&h=HEIGHT",
    ),
];

/// Maps lowercase vendor names to URL templates containing macro
/// placeholders. Immutable after construction; shared freely across
/// concurrent executions.
#[derive(Clone, Debug)]
pub struct VendorRegistry {
    templates: HashMap<String, String>,
}

impl VendorRegistry {
    /// Build a registry from explicit entries. Used by embedders and tests;
    /// entries are stored as given, so callers should supply lowercase names.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let templates = entries
            .into_iter()
            .map(|(name, template)| (name.into(), template.into()))
            .collect();
        Self { templates }
    }

    /// Look up the URL template for a vendor. The caller lowercases the
    /// name first.
    pub fn lookup(&self, vendor: &str) -> Option<&str> {
        self.templates.get(vendor).map(String::as_str)
    }
}

impl Default for VendorRegistry {
    fn default() -> Self {
        Self::from_entries(BUILTIN_VENDORS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let registry = VendorRegistry::default();
        assert!(registry.lookup("medianet").unwrap().contains("WIDTH"));
        assert!(registry.lookup("indexexchange").is_some());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        // Callers lowercase before lookup; the registry itself does not.
        let registry = VendorRegistry::default();
        assert!(registry.lookup("MediaNet").is_none());
    }

    #[test]
    fn test_unknown_vendor() {
        let registry = VendorRegistry::default();
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    fn test_from_entries() {
        let registry = VendorRegistry::from_entries([("fakevendor", "https://fake.qqq/?s=SLOT_ID")]);
        assert_eq!(
            registry.lookup("fakevendor"),
            Some("https://fake.qqq/?s=SLOT_ID")
        );
    }
}
