use std::collections::{HashMap, HashSet};

use crate::api::types::EntityId;

/// Two-way tag index: tag -> entities and entity -> tags.
///
/// Both sides are updated together by every mutating call, so they never
/// disagree. Tags carry no behavior; they only scope queries and events.
#[derive(Debug, Default)]
pub struct TagIndex {
    by_tag: HashMap<String, HashSet<EntityId>>,
    by_entity: HashMap<EntityId, Vec<String>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `tag` to `id`. Returns `false` if it was already present.
    pub fn tag(&mut self, id: EntityId, tag: &str) -> bool {
        let inserted = self.by_tag.entry(tag.to_string()).or_default().insert(id);
        if inserted {
            self.by_entity.entry(id).or_default().push(tag.to_string());
        }
        inserted
    }

    /// Remove `tag` from `id`. Returns `false` if it was not present.
    pub fn untag(&mut self, id: EntityId, tag: &str) -> bool {
        let Some(set) = self.by_tag.get_mut(tag) else {
            return false;
        };
        if !set.remove(&id) {
            return false;
        }
        if set.is_empty() {
            self.by_tag.remove(tag);
        }
        if let Some(tags) = self.by_entity.get_mut(&id) {
            tags.retain(|t| t != tag);
            if tags.is_empty() {
                self.by_entity.remove(&id);
            }
        }
        true
    }

    pub fn has(&self, id: EntityId, tag: &str) -> bool {
        self.by_tag.get(tag).is_some_and(|set| set.contains(&id))
    }

    /// Tags of `id` in the order they were added.
    pub fn tags_of(&self, id: EntityId) -> &[String] {
        self.by_entity.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of entities currently carrying `tag`.
    pub fn count(&self, tag: &str) -> usize {
        self.by_tag.get(tag).map_or(0, HashSet::len)
    }

    /// Drop every tag of `id`.
    pub fn remove_entity(&mut self, id: EntityId) {
        let Some(tags) = self.by_entity.remove(&id) else {
            return;
        };
        for tag in tags {
            if let Some(set) = self.by_tag.get_mut(&tag) {
                set.remove(&id);
                if set.is_empty() {
                    self.by_tag.remove(&tag);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: u32) -> EntityId {
        EntityId { index, generation: 0 }
    }

    #[test]
    fn tag_and_query_both_sides() {
        let mut idx = TagIndex::new();
        assert!(idx.tag(id(1), "enemy"));
        assert!(!idx.tag(id(1), "enemy"));
        idx.tag(id(1), "flying");
        idx.tag(id(2), "enemy");

        assert!(idx.has(id(1), "enemy"));
        assert_eq!(idx.count("enemy"), 2);
        assert_eq!(idx.tags_of(id(1)), ["enemy".to_string(), "flying".to_string()]);
    }

    #[test]
    fn untag_keeps_sides_consistent() {
        let mut idx = TagIndex::new();
        idx.tag(id(1), "enemy");
        assert!(idx.untag(id(1), "enemy"));
        assert!(!idx.untag(id(1), "enemy"));
        assert!(!idx.has(id(1), "enemy"));
        assert!(idx.tags_of(id(1)).is_empty());
        assert_eq!(idx.count("enemy"), 0);
    }

    #[test]
    fn remove_entity_clears_every_tag() {
        let mut idx = TagIndex::new();
        idx.tag(id(1), "a");
        idx.tag(id(1), "b");
        idx.tag(id(2), "a");
        idx.remove_entity(id(1));
        assert!(idx.tags_of(id(1)).is_empty());
        assert_eq!(idx.count("a"), 1);
        assert_eq!(idx.count("b"), 0);
    }
}
