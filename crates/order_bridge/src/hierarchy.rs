//! Explicit parent links between event types.
//!
//! A handler registered for a parent type also receives every descendant
//! type. Links are declared once at startup.

use crate::error::BridgeError;
use crate::event::EventTypeId;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct EventHierarchy {
    parents: HashMap<EventTypeId, EventTypeId>,
}

impl EventHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `parent` as the direct supertype of `child`.
    ///
    /// Re-declaring a child replaces its previous parent. Fails if the link
    /// would make `child` its own ancestor.
    pub fn declare(
        &mut self,
        child: impl Into<EventTypeId>,
        parent: impl Into<EventTypeId>,
    ) -> Result<(), BridgeError> {
        let child = child.into();
        let parent = parent.into();

        if self.lineage(&parent).iter().any(|ancestor| *ancestor == child) {
            return Err(BridgeError::HierarchyCycle { child, parent });
        }

        debug!("🌳 {} extends {}", child, parent);
        self.parents.insert(child, parent);
        Ok(())
    }

    pub fn parent_of(&self, event_type: &EventTypeId) -> Option<&EventTypeId> {
        self.parents.get(event_type)
    }

    /// The type itself followed by its ancestors, most specific first.
    pub fn lineage(&self, event_type: &EventTypeId) -> Vec<EventTypeId> {
        let mut lineage = vec![event_type.clone()];
        let mut current = event_type;
        while let Some(parent) = self.parents.get(current) {
            lineage.push(parent.clone());
            current = parent;
        }
        lineage
    }

    /// Every type mentioned in a declaration, sorted.
    pub fn known_types(&self) -> BTreeSet<EventTypeId> {
        self.parents
            .iter()
            .flat_map(|(child, parent)| [child.clone(), parent.clone()])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> EventTypeId {
        EventTypeId::new(name)
    }

    #[test]
    fn test_lineage_most_specific_first() {
        let mut hierarchy = EventHierarchy::new();
        hierarchy.declare("entity.player", "entity").unwrap();
        hierarchy.declare("entity.player.chat", "entity.player").unwrap();

        assert_eq!(
            hierarchy.lineage(&id("entity.player.chat")),
            vec![id("entity.player.chat"), id("entity.player"), id("entity")]
        );
        assert_eq!(hierarchy.lineage(&id("world")), vec![id("world")]);
        assert_eq!(hierarchy.parent_of(&id("entity.player")), Some(&id("entity")));
    }

    #[test]
    fn test_rejects_cycles() {
        let mut hierarchy = EventHierarchy::new();
        hierarchy.declare("b", "a").unwrap();
        hierarchy.declare("c", "b").unwrap();

        assert!(matches!(
            hierarchy.declare("a", "c"),
            Err(BridgeError::HierarchyCycle { .. })
        ));
        assert!(matches!(
            hierarchy.declare("a", "a"),
            Err(BridgeError::HierarchyCycle { .. })
        ));
        // The failed declarations must leave the hierarchy untouched
        assert_eq!(hierarchy.lineage(&id("a")), vec![id("a")]);
    }

    #[test]
    fn test_known_types() {
        let mut hierarchy = EventHierarchy::new();
        hierarchy.declare("world.load", "world").unwrap();
        let known: Vec<_> = hierarchy.known_types().into_iter().collect();
        assert_eq!(known, vec![id("world"), id("world.load")]);
    }
}
