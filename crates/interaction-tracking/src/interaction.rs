//! # Interactions & Interaction Sets
//!
//! An [`Interaction`] is an immutable, named and timestamped unit of causal
//! attribution ("button click"). An [`InteractionSet`] is the ordered stack of
//! interactions active at a point in the call tree, outermost first.
//!
//! ## Copy-on-extend
//!
//! Sets are never mutated. A nested span calls [`InteractionSet::extend`],
//! which copies the parent's interactions into a new set with one more at the
//! end, so a parent's view of its current interactions is unaffected by
//! whatever its children do. Extending costs one allocation and a copy of the
//! parent's entries; names are `Arc<str>` and are shared, not duplicated.
//! Cloning a set itself is a reference count bump.

use crate::registry::InteractionId;
use std::fmt;
use std::sync::Arc;

/// A named, timestamped unit of causal attribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    id: InteractionId,
    name: Arc<str>,
    timestamp: f64,
}

impl Interaction {
    pub(crate) fn new(id: InteractionId, name: Arc<str>, timestamp: f64) -> Self {
        Self { id, name, timestamp }
    }

    /// Unique, monotonically assigned id.
    pub fn id(&self) -> InteractionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Milliseconds, read from the installed [`Clock`](crate::Clock) when the
    /// interaction was tracked.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Ordered, immutable sequence of interactions (outermost first).
///
/// Equality compares the interactions element by element. Use
/// [`InteractionSet::ptr_eq`] to check whether two handles are the very same
/// snapshot.
#[derive(Debug, Clone)]
pub struct InteractionSet {
    interactions: Arc<[Interaction]>,
}

impl InteractionSet {
    /// Builds a set from interactions in nesting order.
    ///
    /// Returns `None` for an empty input: "no interactions" is expressed as the
    /// absence of a set, never as an empty one.
    pub fn from_interactions(interactions: Vec<Interaction>) -> Option<Self> {
        if interactions.is_empty() {
            return None;
        }
        Some(Self {
            interactions: interactions.into(),
        })
    }

    pub(crate) fn singleton(interaction: Interaction) -> Self {
        Self {
            interactions: Arc::from(vec![interaction]),
        }
    }

    /// Returns a new set with `interaction` appended. `self` is left untouched.
    pub(crate) fn extend(&self, interaction: Interaction) -> Self {
        let mut interactions = Vec::with_capacity(self.interactions.len() + 1);
        interactions.extend(self.interactions.iter().cloned());
        interactions.push(interaction);
        Self {
            interactions: interactions.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Always `false` for sets produced by this crate; kept for API symmetry
    /// with [`InteractionSet::len`].
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interaction> {
        self.interactions.iter()
    }

    pub fn as_slice(&self) -> &[Interaction] {
        &self.interactions
    }

    /// The innermost interaction.
    pub fn innermost(&self) -> Option<&Interaction> {
        self.interactions.last()
    }

    /// Interaction names in nesting order.
    pub fn names(&self) -> Vec<&str> {
        self.interactions.iter().map(Interaction::name).collect()
    }

    /// Whether both handles point at the same snapshot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.interactions, &other.interactions)
    }
}

impl PartialEq for InteractionSet {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.interactions[..] == other.interactions[..]
    }
}

impl<'a> IntoIterator for &'a InteractionSet {
    type Item = &'a Interaction;
    type IntoIter = std::slice::Iter<'a, Interaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for InteractionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction(id: InteractionId, name: &str) -> Interaction {
        Interaction::new(id, Arc::from(name), id as f64)
    }

    #[test]
    fn test_extend_leaves_parent_untouched() {
        let parent = InteractionSet::singleton(interaction(1, "outer"));
        let child = parent.extend(interaction(2, "inner"));

        assert_eq!(parent.names(), vec!["outer"]);
        assert_eq!(child.names(), vec!["outer", "inner"]);
        assert_eq!(child.innermost().map(Interaction::id), Some(2));
        assert!(!parent.ptr_eq(&child));
    }

    #[test]
    fn test_equality_is_structural() {
        let a = InteractionSet::singleton(interaction(7, "click"));
        let b = InteractionSet::from_interactions(vec![interaction(7, "click")]).unwrap();
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
    }

    #[test]
    fn test_empty_input_is_no_set() {
        assert!(InteractionSet::from_interactions(Vec::new()).is_none());
    }

    #[test]
    fn test_display_lists_names() {
        let set = InteractionSet::singleton(interaction(1, "a")).extend(interaction(2, "b"));
        assert_eq!(set.to_string(), "[a, b]");
    }
}
