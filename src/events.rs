//! Typed event channel between the viewer and the host UI.
//!
//! Every emitted event is appended to a log the host drains once per turn of
//! its event loop, and delivered synchronously to subscribers of its kind in
//! subscription order.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::fmt;

use serde::Serialize;

use crate::animation::AnimationKind;
use crate::input::Cursor;
use crate::model::{LevelIndex, PhotoId};
use crate::state::PopupAnchor;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViewerEvent {
    ActiveLevelChanged { level: LevelIndex },
    ActivePhotoChanged { photo: Option<PhotoId> },
    HoverSweepChanged { sweep: Option<String> },
    /// `popup` is `None` when a click selected nothing.
    PopupChanged { popup: Option<PopupAnchor> },
    CursorChanged { cursor: Cursor },
    MeasurementFinished { level: LevelIndex, value: Option<f64> },
    AnimationStarted { kind: AnimationKind, to_level: LevelIndex },
    AnimationFinished { level: LevelIndex },
}

/// Discriminant of [`ViewerEvent`], used to subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    ActiveLevelChanged,
    ActivePhotoChanged,
    HoverSweepChanged,
    PopupChanged,
    CursorChanged,
    MeasurementFinished,
    AnimationStarted,
    AnimationFinished,
}

impl ViewerEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ActiveLevelChanged { .. } => EventKind::ActiveLevelChanged,
            Self::ActivePhotoChanged { .. } => EventKind::ActivePhotoChanged,
            Self::HoverSweepChanged { .. } => EventKind::HoverSweepChanged,
            Self::PopupChanged { .. } => EventKind::PopupChanged,
            Self::CursorChanged { .. } => EventKind::CursorChanged,
            Self::MeasurementFinished { .. } => EventKind::MeasurementFinished,
            Self::AnimationStarted { .. } => EventKind::AnimationStarted,
            Self::AnimationFinished { .. } => EventKind::AnimationFinished,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&ViewerEvent)>;

struct Subscriber {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
pub struct EventBus {
    events: Vec<ViewerEvent>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.events)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` for every future event of `kind`.
    pub fn subscribe(&mut self, kind: EventKind, handler: impl FnMut(&ViewerEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, kind, handler: Box::new(handler) });
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, event: ViewerEvent) {
        let kind = event.kind();
        for s in self.subscribers.iter_mut().filter(|s| s.kind == kind) {
            (s.handler)(&event);
        }
        self.events.push(event);
    }

    #[must_use]
    pub fn events(&self) -> &[ViewerEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }
}
