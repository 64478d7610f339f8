//! Selection bus: process-wide single-selection broadcast.
//!
//! Any module may [`SelectionBus::announce`] that an object kind is now the
//! sole selection. Every subscriber is told synchronously, in subscription
//! order, and must tear down its own affordances when the announced kind is
//! not its own. The bus is a plain in-process channel: it never sees DOM
//! events, so a handler that stops propagation cannot starve it.
//!
//! Subscribers may announce from inside a callback. Such nested events are
//! queued and delivered after the current event finishes, never re-entered.

#[cfg(test)]
#[path = "bus_test.rs"]
mod bus_test;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::object::ObjectKind;

/// What is currently selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    #[default]
    None,
    Text,
    Image,
}

impl From<ObjectKind> for SelectionKind {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Text => Self::Text,
            ObjectKind::Image => Self::Image,
        }
    }
}

impl SelectionKind {
    /// Lowercase name, as used in page attributes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Text => "text",
            Self::Image => "image",
        }
    }

    /// The object kind, if anything is selected.
    #[must_use]
    pub fn object_kind(self) -> Option<ObjectKind> {
        match self {
            Self::None => None,
            Self::Text => Some(ObjectKind::Text),
            Self::Image => Some(ObjectKind::Image),
        }
    }
}

/// An event delivered to bus subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// `kind` is now the only selected object kind.
    Selected(SelectionKind),
    /// Some object's geometry changed; derived UI should resync.
    LayoutChanged,
}

type Listener = Box<dyn FnMut(&BusEvent)>;

#[derive(Default)]
struct BusInner {
    selected: SelectionKind,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    queue: VecDeque<BusEvent>,
    dispatching: bool,
    dropped_during_dispatch: Vec<u64>,
}

/// Handle to the shared bus. Clones refer to the same channel.
#[derive(Clone, Default)]
pub struct SelectionBus {
    inner: Rc<RefCell<BusInner>>,
}

impl std::fmt::Debug for SelectionBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SelectionBus")
            .field("selected", &inner.selected)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    bus: Weak<RefCell<BusInner>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.bus.upgrade() else {
            return;
        };
        // A listener may drop its own subscription mid-dispatch.
        let Ok(mut inner) = inner.try_borrow_mut() else {
            return;
        };
        if inner.dispatching {
            inner.dropped_during_dispatch.push(self.id);
        } else {
            inner.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl SelectionBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for every future event.
    pub fn subscribe(&self, listener: impl FnMut(&BusEvent) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.listeners.push((id, Box::new(listener)));
        Subscription { id, bus: Rc::downgrade(&self.inner) }
    }

    /// The most recently announced selection.
    #[must_use]
    pub fn selected(&self) -> SelectionKind {
        self.inner.borrow().selected
    }

    /// Announce that `kind` is now the sole selection.
    pub fn announce(&self, kind: SelectionKind) {
        log::debug!("bus: select {kind:?}");
        self.publish(BusEvent::Selected(kind));
    }

    /// Tell subscribers that geometry changed.
    pub fn notify_layout_changed(&self) {
        self.publish(BusEvent::LayoutChanged);
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn publish(&self, event: BusEvent) {
        {
            let Ok(mut inner) = self.inner.try_borrow_mut() else {
                return;
            };
            if let BusEvent::Selected(kind) = event {
                inner.selected = kind;
            }
            inner.queue.push_back(event);
            if inner.dispatching {
                return;
            }
            inner.dispatching = true;
        }
        self.drain();
    }

    fn drain(&self) {
        loop {
            let (event, mut listeners) = {
                let mut inner = self.inner.borrow_mut();
                let Some(event) = inner.queue.pop_front() else {
                    inner.dispatching = false;
                    return;
                };
                (event, std::mem::take(&mut inner.listeners))
            };

            for (_, listener) in &mut listeners {
                listener(&event);
            }

            let mut inner = self.inner.borrow_mut();
            let added = std::mem::take(&mut inner.listeners);
            listeners.extend(added);
            let dropped = std::mem::take(&mut inner.dropped_during_dispatch);
            listeners.retain(|(id, _)| !dropped.contains(id));
            inner.listeners = listeners;
        }
    }
}
