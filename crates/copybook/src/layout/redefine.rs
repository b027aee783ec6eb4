//! REDEFINES: alternate views over another field's storage.

use std::collections::HashMap;

use crate::types::Element;

/// One registered redefinition: `ALIAS REDEFINES TARGET`.
///
/// The alias element occupies the target's byte range. It owns no
/// bytes of its own — decoding through it re-reads the same range the
/// target occupies, possibly as a different type.
#[derive(Debug, Clone, PartialEq)]
pub struct Redefine {
    alias: String,
    target: String,
    element: Element,
}

impl Redefine {
    pub(crate) fn new(alias: String, target: String, element: Element) -> Self {
        Self {
            alias,
            target,
            element,
        }
    }

    /// The redefining name (the FOO in `FOO REDEFINES BAR`).
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The redefined field name (the BAR).
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The alternate element interpreting the target's bytes.
    pub fn element(&self) -> &Element {
        &self.element
    }
}

/// Registry of redefinitions, keyed by alias name.
///
/// Registration is lenient: nothing checks that the alternate element
/// fits within the target's byte range. An oversized alias simply runs
/// past the target and fails at decode time if it outruns the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedefineRegistry {
    entries: HashMap<String, Redefine>,
}

impl RedefineRegistry {
    pub(crate) fn register(&mut self, redefine: Redefine) {
        self.entries
            .insert(redefine.alias.to_ascii_uppercase(), redefine);
    }

    /// Look up a redefinition by alias name, case-insensitively.
    pub fn lookup(&self, alias: &str) -> Option<&Redefine> {
        self.entries.get(&alias.to_ascii_uppercase())
    }

    /// Number of registered redefinitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the copybook declared any redefinitions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all registered redefinitions.
    pub fn iter(&self) -> impl Iterator<Item = &Redefine> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlphaNumeric, Zoned};

    #[test]
    fn test_register_and_lookup() {
        let mut registry = RedefineRegistry::default();
        let element = Element::Zoned(Zoned::new("NUM".to_string(), 5, 1, 4, 0, false, None));
        registry.register(Redefine::new("NUM".to_string(), "RAW".to_string(), element));

        let found = registry.lookup("num").unwrap();
        assert_eq!(found.alias(), "NUM");
        assert_eq!(found.target(), "RAW");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_miss() {
        let registry = RedefineRegistry::default();
        assert!(registry.lookup("NOPE").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_no_fit_validation() {
        // An alias far larger than any plausible target registers fine.
        let mut registry = RedefineRegistry::default();
        let element =
            Element::AlphaNumeric(AlphaNumeric::new("BIG".to_string(), 5, 1, 10_000));
        registry.register(Redefine::new("BIG".to_string(), "TINY".to_string(), element));
        assert!(registry.lookup("BIG").is_some());
    }
}
