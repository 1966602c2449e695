//! URL template macro expansion.
//!
//! A template is a plain string containing macro names (e.g. `SLOT_ID`).
//! Expansion substitutes each allow-listed macro with its value and leaves
//! everything else untouched. Substituted output is never re-scanned, so a
//! macro value containing another macro name is inserted verbatim.

use indexmap::IndexMap;
use std::collections::HashSet;

/// Macro name to value mapping. Insertion order is preserved and a repeated
/// insert overwrites the earlier value (last writer wins).
pub type MacroMap = IndexMap<String, String>;

/// Substitute allow-listed macros in `template`.
///
/// Only macros whose name appears in `allow_list` are eligible; a value for
/// a non-allow-listed name is ignored. Placeholders with no matching macro
/// are left as-is. Longer names are matched first so `SLOT_ID` is never
/// clobbered by a macro named `SLOT`.
pub fn expand(template: &str, macros: &MacroMap, allow_list: &HashSet<&str>) -> String {
    let mut substitutions: Vec<(&str, &str)> = macros
        .iter()
        .filter(|(name, _)| allow_list.contains(name.as_str()))
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    substitutions.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    'scan: while !rest.is_empty() {
        for (name, value) in &substitutions {
            if !name.is_empty() && rest.starts_with(name) {
                out.push_str(value);
                rest = &rest[name.len()..];
                continue 'scan;
            }
        }
        match rest.chars().next() {
            Some(ch) => {
                out.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
            None => break,
        }
    }
    out
}
