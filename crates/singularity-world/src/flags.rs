//! World and faction flag sets.

use std::collections::BTreeSet;

use singularity_types::FlagId;

/// An insertion-order-irrelevant set of opaque flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    flags: BTreeSet<FlagId>,
}

impl FlagSet {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self {
            flags: BTreeSet::new(),
        }
    }

    /// Whether `flag` is present.
    pub fn contains(&self, flag: &FlagId) -> bool {
        self.flags.contains(flag)
    }

    /// Raise `flag`. Returns `true` if it was not already present.
    pub fn insert(&mut self, flag: FlagId) -> bool {
        self.flags.insert(flag)
    }

    /// Iterate flags in key order.
    pub fn iter(&self) -> impl Iterator<Item = &FlagId> {
        self.flags.iter()
    }

    /// Number of raised flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether no flag is raised.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl FromIterator<FlagId> for FlagSet {
    fn from_iter<I: IntoIterator<Item = FlagId>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut flags = FlagSet::new();
        assert!(flags.is_empty());
        assert!(flags.insert(FlagId::from("agi_declared")));
        assert!(!flags.insert(FlagId::from("agi_declared")));
        assert_eq!(flags.len(), 1);
        assert!(!flags.is_empty());
    }

    #[test]
    fn iteration_is_sorted() {
        let flags: FlagSet = ["b", "a"].into_iter().map(FlagId::from).collect();
        let keys: Vec<&str> = flags.iter().map(FlagId::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
