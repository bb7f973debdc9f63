//! Per route metadata flags.

use std::collections::BTreeMap;
use std::iter::FromIterator;

/// The flag marking routes that need an authenticated user.
pub const REQUIRES_AUTH: &str = "requiresAuth";

/// A set of named boolean flags attached to a route.
///
/// Flags that were never set read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    flags: BTreeMap<String, bool>,
}

impl Meta {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag.
    pub fn with(mut self, flag: &str, value: bool) -> Self {
        self.set(flag, value);
        self
    }

    /// Set a flag.
    pub fn set(&mut self, flag: &str, value: bool) {
        self.flags.insert(flag.to_owned(), value);
    }

    /// Read a flag.
    pub fn get(&self, flag: &str) -> bool {
        self.flags.get(flag).copied().unwrap_or(false)
    }

    /// Whether a flag was declared at all, as opposed to defaulting to `false`.
    pub fn contains(&self, flag: &str) -> bool {
        self.flags.contains_key(flag)
    }

    /// Whether no flags are declared.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Iterate over declared flags in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Combine these flags with the flags of a parent.
    ///
    /// A flag is set in the result if it is set here or in the parent. A child can add flags but
    /// can never clear one its parent set.
    pub fn inherit(&self, parent: &Meta) -> Meta {
        let mut flags = parent.flags.clone();
        for (flag, value) in &self.flags {
            let entry = flags.entry(flag.clone()).or_insert(false);
            *entry |= *value;
        }

        Meta { flags }
    }
}

impl<'a> FromIterator<(&'a str, bool)> for Meta {
    fn from_iter<I: IntoIterator<Item = (&'a str, bool)>>(iter: I) -> Self {
        let mut meta = Meta::new();
        for (flag, value) in iter {
            meta.set(flag, value);
        }
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flags_are_false() {
        let meta = Meta::new().with(REQUIRES_AUTH, true);
        assert!(meta.get(REQUIRES_AUTH));
        assert!(!meta.get("someOtherFlag"));
        assert!(!meta.contains("someOtherFlag"));
    }

    #[test]
    fn inherit_is_a_union() {
        let parent = Meta::new().with(REQUIRES_AUTH, true);
        let child = Meta::new()
            .with(REQUIRES_AUTH, false)
            .with("someOtherFlag", true);

        let effective = child.inherit(&parent);
        assert!(effective.get(REQUIRES_AUTH));
        assert!(effective.get("someOtherFlag"));
        assert_eq!(effective.iter().count(), 2);
    }

    #[test]
    fn inherit_from_nothing() {
        let child: Meta = vec![("a", true), ("b", false)].into_iter().collect();
        assert_eq!(child.inherit(&Meta::new()), child);
    }
}
