//! Named event subscriptions with lazy cancellation.
//!
//! Dispatch works on a snapshot of the subscriber list taken when a publish
//! starts, so handlers may subscribe, cancel or destroy freely: new handlers
//! wait for the next publish, and a cancelled handler is skipped from the
//! moment its flag is set. Cancelled entries are pruned on the next snapshot.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::api::types::{EntityId, EventArgs};
use crate::core::error::isolate;
use crate::core::scene::Scene;

/// Event handler. Receives the entity the event is about, if any.
pub type Handler = dyn FnMut(&mut Scene, Option<EntityId>, &EventArgs);

/// Which entities a subscription listens for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Fires once per publish, with no entity.
    Global,
    /// Fires once per matching entity carrying the tag.
    Tag(String),
    /// Fires only for one entity. Dropped when that entity is flushed.
    Entity(EntityId),
}

/// Revokes a subscription, timer or spatial registration.
///
/// Cancelling is idempotent and takes effect immediately, even from inside
/// the handler being cancelled.
#[derive(Debug, Clone, Default)]
pub struct EventCanceller {
    flag: Rc<Cell<bool>>,
}

impl EventCanceller {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.flag)
    }

    pub fn cancel(&self) {
        self.flag.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.get()
    }
}

pub(crate) struct Subscription {
    pub scope: Scope,
    handler: RefCell<Box<Handler>>,
    cancelled: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn new(scope: Scope, handler: Box<Handler>) -> (Self, EventCanceller) {
        let canceller = EventCanceller::new();
        let sub = Self {
            scope,
            handler: RefCell::new(handler),
            cancelled: canceller.flag(),
        };
        (sub, canceller)
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Run the handler unless it was cancelled or is already running further
    /// up the stack.
    pub fn invoke(&self, scene: &mut Scene, entity: Option<EntityId>, args: &EventArgs, event: &str) {
        if self.is_cancelled() {
            return;
        }
        let Ok(mut handler) = self.handler.try_borrow_mut() else {
            log::warn!("'{}' handler re-entered itself, skipping", event);
            return;
        };
        isolate(
            &|| match entity {
                Some(id) => format!("'{event}' handler for {id}"),
                None => format!("'{event}' handler"),
            },
            || (&mut **handler)(scene, entity, args),
        );
    }
}

/// Subscriber lists keyed by event name, in registration order.
#[derive(Default)]
pub struct EventDispatcher {
    subs: HashMap<String, Vec<Rc<Subscription>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, event: &str, scope: Scope, handler: Box<Handler>) -> EventCanceller {
        let (sub, canceller) = Subscription::new(scope, handler);
        self.subs
            .entry(event.to_string())
            .or_default()
            .push(Rc::new(sub));
        canceller
    }

    /// Live subscriptions for `event`, pruning cancelled ones first.
    pub(crate) fn snapshot(&mut self, event: &str) -> Vec<Rc<Subscription>> {
        match self.subs.get_mut(event) {
            Some(list) => {
                list.retain(|s| !s.is_cancelled());
                list.clone()
            }
            None => Vec::new(),
        }
    }

    /// Cancel every subscription scoped to `id`.
    pub fn cancel_entity(&mut self, id: EntityId) {
        for list in self.subs.values_mut() {
            list.retain(|s| {
                if s.scope == Scope::Entity(id) {
                    s.cancel();
                    false
                } else {
                    true
                }
            });
        }
    }

    /// Number of live subscriptions for `event`.
    pub fn count(&self, event: &str) -> usize {
        self.subs
            .get(event)
            .map_or(0, |l| l.iter().filter(|s| !s.is_cancelled()).count())
    }

    pub fn clear(&mut self) {
        for sub in self.subs.values().flatten() {
            sub.cancel();
        }
        self.subs.clear();
    }
}
