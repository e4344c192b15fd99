use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::core::types::ViewportSnapshot;

/// Notification emitted once per logical viewport operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewportEvent {
    /// Only the horizontal mapping changed.
    HorizontalChanged,
    /// Only the vertical mapping changed.
    VerticalChanged,
    /// Both mappings changed, or the viewport was rebound.
    WindowChanged,
}

/// Which axis mappings an operation actually changed.
///
/// Mutators return this so callers can tell a rejected span from an
/// accepted one without an error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowChange {
    pub horizontal: bool,
    pub vertical: bool,
}

impl WindowChange {
    #[must_use]
    pub fn between(before: &ViewportSnapshot, after: &ViewportSnapshot) -> Self {
        Self {
            horizontal: before.bounds.left != after.bounds.left
                || before.bounds.right != after.bounds.right
                || before.device_extents.width != after.device_extents.width,
            vertical: before.bounds.bottom != after.bounds.bottom
                || before.bounds.top != after.bounds.top
                || before.device_extents.height != after.device_extents.height,
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        !self.horizontal && !self.vertical
    }

    /// The single event describing this change, if any.
    #[must_use]
    pub fn event(self) -> Option<ViewportEvent> {
        match (self.horizontal, self.vertical) {
            (true, true) => Some(ViewportEvent::WindowChanged),
            (true, false) => Some(ViewportEvent::HorizontalChanged),
            (false, true) => Some(ViewportEvent::VerticalChanged),
            (false, false) => None,
        }
    }
}

/// Handle returned by listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub(crate) type ListenerCallback = Box<dyn FnMut(ViewportEvent, &ViewportSnapshot)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListenerFilter {
    Only(ViewportEvent),
    All,
}

impl ListenerFilter {
    fn matches(self, event: ViewportEvent) -> bool {
        match self {
            Self::Only(kind) => kind == event,
            Self::All => true,
        }
    }
}

struct Listener {
    filter: ListenerFilter,
    callback: ListenerCallback,
}

/// Ordered listener set that tolerates registration and removal from inside
/// a callback.
///
/// While a dispatch is in flight the listeners are moved out of the
/// registry; edits made meanwhile are merged back once it completes.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: IndexMap<ListenerId, Listener>,
    next_id: u64,
    dispatching: bool,
    /// Ids of the listeners moved out for the current dispatch and not yet removed.
    in_flight: IndexSet<ListenerId>,
    pending_removals: Vec<ListenerId>,
}

impl ListenerRegistry {
    pub(crate) fn insert(&mut self, filter: ListenerFilter, callback: ListenerCallback) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.insert(id, Listener { filter, callback });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        if self.listeners.shift_remove(&id).is_some() {
            return true;
        }
        if self.in_flight.shift_remove(&id) {
            self.pending_removals.push(id);
            return true;
        }
        false
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn begin_dispatch(&mut self) -> Option<DispatchBatch> {
        if self.dispatching {
            return None;
        }
        self.dispatching = true;
        self.in_flight = self.listeners.keys().copied().collect();
        Some(DispatchBatch {
            listeners: std::mem::take(&mut self.listeners),
        })
    }

    pub(crate) fn end_dispatch(&mut self, batch: DispatchBatch) {
        let added = std::mem::replace(&mut self.listeners, batch.listeners);
        self.listeners.extend(added);
        for id in self.pending_removals.drain(..) {
            self.listeners.shift_remove(&id);
        }
        self.in_flight.clear();
        self.dispatching = false;
    }
}

/// Listeners detached from their registry for the duration of one dispatch.
pub(crate) struct DispatchBatch {
    listeners: IndexMap<ListenerId, Listener>,
}

impl DispatchBatch {
    pub(crate) fn notify(&mut self, event: ViewportEvent, snapshot: &ViewportSnapshot) {
        for listener in self.listeners.values_mut() {
            if listener.filter.matches(event) {
                (listener.callback)(event, snapshot);
            }
        }
    }
}
