//! Set membership with provenance.
//!
//! Both reconcilers diff a desired set against an observed kernel snapshot
//! keyed by canonical text (an `ip/prefix` or CIDR string). Observed entries
//! start as [`Presence::ObservedOnly`]; desired entries are marked
//! [`Presence::Kept`] as they are processed. Whatever is still observed-only
//! afterwards is extraneous and gets removed.

use std::collections::BTreeMap;

/// Provenance of a key in a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Seen in the kernel snapshot but not (yet) declared desired.
    ObservedOnly,
    /// Declared desired; either it was already observed or it has been added.
    Kept,
}

/// Symmetric-difference tracker keyed by canonical strings.
#[derive(Debug, Default)]
pub struct DiffSet {
    entries: BTreeMap<String, Presence>,
}

impl DiffSet {
    /// Build the tracker from an observed snapshot.
    pub fn observe<I, S>(observed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = observed
            .into_iter()
            .map(|key| (key.into(), Presence::ObservedOnly))
            .collect();
        Self { entries }
    }

    /// Mark a desired key as kept.
    ///
    /// Returns true when the key was already present, either observed or
    /// previously kept; the caller then skips the kernel add. A duplicate
    /// desired entry is therefore idempotent, not an error.
    pub fn keep(&mut self, key: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(presence) => {
                *presence = Presence::Kept;
                true
            }
            None => {
                self.entries.insert(key.to_string(), Presence::Kept);
                false
            }
        }
    }

    /// Observed keys that no desired entry claimed, in sorted order.
    pub fn extraneous(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, presence)| **presence == Presence::ObservedOnly)
            .map(|(key, _)| key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_missing_key_requires_add() {
        let mut set = DiffSet::observe(Vec::<String>::new());
        assert!(!set.keep("10.0.0.2/24"));
    }

    #[test]
    fn test_keep_observed_key_skips_add() {
        let mut set = DiffSet::observe(["10.0.0.2/24"]);
        assert!(set.keep("10.0.0.2/24"));
        assert_eq!(set.extraneous().count(), 0);
    }

    #[test]
    fn test_duplicate_desired_key_is_idempotent() {
        let mut set = DiffSet::observe(Vec::<String>::new());
        assert!(!set.keep("10.0.0.2/24"));
        assert!(set.keep("10.0.0.2/24"));
    }

    #[test]
    fn test_extraneous_is_sorted_and_excludes_kept() {
        let mut set = DiffSet::observe(["192.168.1.1/24", "10.0.0.2/24", "172.16.0.1/16"]);
        set.keep("10.0.0.2/24");
        let stale: Vec<&str> = set.extraneous().collect();
        assert_eq!(stale, vec!["172.16.0.1/16", "192.168.1.1/24"]);
    }

    #[test]
    fn test_empty() {
        let set = DiffSet::observe(Vec::<String>::new());
        assert!(set.is_empty());
    }
}
