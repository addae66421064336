//! # Change Notifications
//!
//! Two narrow observer interfaces, kept apart:
//!
//! - [`StructureObserver`]: tree shape changes. Consumed by list/tree view adapters to
//!   perform incremental updates (or a full refresh on [`StructureEvent::StructureReset`]).
//! - [`ContentObserver`]: payload changes (title, content). Consumed by whatever owns the
//!   text editing surface.
//!
//! Delivery is synchronous and in-process. Observers receive `&StructureEvent` while the
//! outline is mutably borrowed, so an observer cannot call back into the store with a
//! mutation. An observer that smuggles the store in through shared ownership
//! (`Rc<RefCell<Outline>>`) gets a borrow panic instead of a reentrant mutation.

use crate::model::ArticleId;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureEvent {
    /// One event per inserted node, in sequence order.
    NodeInserted { position: usize, id: ArticleId },
    /// One event per removed node, in former sequence order. `position` and `child_rank`
    /// describe the node before the removal.
    NodeRemoved {
        id: ArticleId,
        position: usize,
        child_rank: usize,
    },
    IdentityChanged { old: ArticleId, new: ArticleId },
    /// The whole sequence was replaced; views should rebuild from scratch.
    StructureReset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEvent {
    DataChanged { id: ArticleId },
}

pub trait StructureObserver {
    fn on_structure_event(&mut self, event: &StructureEvent);
}

pub trait ContentObserver {
    fn on_content_event(&mut self, event: &ContentEvent);
}

/// Records every event it sees. Cloning shares the same log, so a test (or a simple
/// adapter) can keep one handle and give the other to the outline.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    structure: Rc<RefCell<Vec<StructureEvent>>>,
    content: Rc<RefCell<Vec<ContentEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structure_events(&self) -> Vec<StructureEvent> {
        self.structure.borrow().clone()
    }

    pub fn content_events(&self) -> Vec<ContentEvent> {
        self.content.borrow().clone()
    }

    pub fn clear(&self) {
        self.structure.borrow_mut().clear();
        self.content.borrow_mut().clear();
    }
}

impl StructureObserver for EventLog {
    fn on_structure_event(&mut self, event: &StructureEvent) {
        self.structure.borrow_mut().push(event.clone());
    }
}

impl ContentObserver for EventLog {
    fn on_content_event(&mut self, event: &ContentEvent) {
        self.content.borrow_mut().push(event.clone());
    }
}
