use serde_json::{Map, Value};

use crate::api::types::EntityId;
use crate::components::ComponentTable;

/// Everything the registry owns for one entity, apart from its tags.
pub struct EntityRecord {
    pub id: EntityId,
    pub hidden: bool,
    pub paused: bool,
    exists: bool,
    pub comps: ComponentTable,
    /// Free-form game data attached at creation or later.
    pub data: Map<String, Value>,
}

impl EntityRecord {
    fn new(id: EntityId) -> Self {
        Self {
            id,
            hidden: false,
            paused: false,
            exists: true,
            comps: ComponentTable::new(),
            data: Map::new(),
        }
    }

    pub fn exists(&self) -> bool {
        self.exists
    }
}

struct Slot {
    generation: u32,
    record: Option<EntityRecord>,
}

/// Arena of entity records with generation-checked handles.
///
/// `destroy` only tombstones a record (`exists = false`) and queues it; the
/// slot is freed by [`release`](Self::release) at the end-of-frame flush and
/// only then becomes available for reuse, under a bumped generation.
#[derive(Default)]
pub struct EntityRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Live and tombstoned ids in insertion order.
    order: Vec<EntityId>,
    pending: Vec<EntityId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                let id = EntityId {
                    index,
                    generation: slot.generation,
                };
                slot.record = Some(EntityRecord::new(id));
                id
            }
            None => {
                let index = self.slots.len() as u32;
                let id = EntityId { index, generation: 0 };
                self.slots.push(Slot {
                    generation: 0,
                    record: Some(EntityRecord::new(id)),
                });
                id
            }
        };
        self.order.push(id);
        id
    }

    /// Record for `id`, including tombstoned ones awaiting flush.
    pub fn record(&self, id: EntityId) -> Option<&EntityRecord> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.record.as_ref())
    }

    pub fn record_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.record.as_mut())
    }

    /// Record for a live entity.
    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.record(id).filter(|r| r.exists)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.record_mut(id).filter(|r| r.exists)
    }

    pub fn exists(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Tombstone `id` and queue it for the flush. Returns `false` if it was
    /// already destroyed or the handle is stale.
    pub fn mark_destroyed(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.exists = false;
                self.pending.push(id);
                true
            }
            None => false,
        }
    }

    pub fn take_pending(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Free the slot of a tombstoned entity and hand back its record.
    pub fn release(&mut self, id: EntityId) -> Option<EntityRecord> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)?;
        let record = slot.record.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.order.retain(|o| *o != id);
        Some(record)
    }

    /// Snapshot of live ids in insertion order.
    pub fn live(&self) -> Vec<EntityId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.exists(*id))
            .collect()
    }

    /// Move `id` to the end of the iteration order.
    pub fn move_to_back(&mut self, id: EntityId) -> bool {
        let Some(idx) = self.order.iter().position(|o| *o == id) else {
            return false;
        };
        self.order.remove(idx);
        self.order.push(id);
        true
    }

    /// Position of `id` in the iteration order.
    pub fn order_of(&self, id: EntityId) -> Option<usize> {
        self.order.iter().position(|o| *o == id)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.order.iter().filter(|id| self.exists(**id)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_assigns_distinct_ids() {
        let mut reg = EntityRegistry::new();
        let a = reg.spawn();
        let b = reg.spawn();
        assert_ne!(a, b);
        assert_eq!(reg.live(), vec![a, b]);
    }

    #[test]
    fn destroyed_entity_is_invisible_but_not_freed() {
        let mut reg = EntityRegistry::new();
        let a = reg.spawn();
        assert!(reg.mark_destroyed(a));
        assert!(!reg.exists(a));
        assert!(reg.live().is_empty());
        assert!(reg.record(a).is_some());
        assert!(!reg.mark_destroyed(a));
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut reg = EntityRegistry::new();
        let a = reg.spawn();
        reg.mark_destroyed(a);
        // not reusable before the flush
        let b = reg.spawn();
        assert_ne!(a.index, b.index);

        for id in reg.take_pending() {
            reg.release(id);
        }
        let c = reg.spawn();
        assert_eq!(c.index, a.index);
        assert_ne!(c.generation, a.generation);
        assert!(!reg.exists(a));
        assert!(reg.exists(c));
    }

    #[test]
    fn move_to_back_changes_order() {
        let mut reg = EntityRegistry::new();
        let a = reg.spawn();
        let b = reg.spawn();
        reg.move_to_back(a);
        assert_eq!(reg.live(), vec![b, a]);
        assert_eq!(reg.order_of(a), Some(1));
    }
}
