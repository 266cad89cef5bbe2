use crate::model::project::ProjectId;
use crate::model::task::ItemId;

use super::geometry::{Point, Rect, TranslateBounds};
use super::timer::{TimerId, TimerQueue, TimerSet};

/// Input device behind a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// A press, move or release as the host reports it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Document coordinates
    pub page: Point,
    /// Viewport coordinates, used for hit-testing
    pub client: Point,
    /// Item under the pointer when the event was dispatched
    pub target: Option<ItemId>,
}

impl PointerEvent {
    /// Event for a page that does not scroll, so page and client agree
    pub fn at(kind: PointerKind, point: Point, target: Option<ItemId>) -> Self {
        PointerEvent {
            kind,
            page: point,
            client: point,
            target,
        }
    }

    pub fn mouse(point: Point, target: Option<ItemId>) -> Self {
        Self::at(PointerKind::Mouse, point, target)
    }

    pub fn touch(point: Point, target: Option<ItemId>) -> Self {
        Self::at(PointerKind::Touch, point, target)
    }
}

/// Why a press did not start a gesture
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("press was not on an item")]
    NotAnItem,
    #[error("no list is selected")]
    NoListSelected,
    #[error("system views cannot be reordered by hand")]
    AggregateView,
    #[error("list is sorted; clear the sort to reorder by hand")]
    Sorted,
    #[error("a drag is already in progress")]
    SessionActive,
    #[error("item {0} is not in the selected list")]
    NotLive(ItemId),
}

/// Lifecycle of one gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Pressed, waiting for the activation gate
    Armed,
    Dragging,
    /// Released; the item is animating to its resting offset
    Settling,
}

/// What an activation gate decides about an event while `Armed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Activate,
    Wait,
    /// The user meant something else (a scroll, a tap); drop the gesture
    Abandon,
}

/// Decides when a press turns into a drag
pub trait ActivationGate: std::fmt::Debug {
    /// Called once on press; may schedule a timer owned by the session
    fn on_press(&mut self, timers: &mut TimerQueue) -> Option<TimerId>;
    /// A move before activation, measured from the press point
    fn on_move(&self, start: Point, now: Point) -> GateDecision;
    /// The press timer fired
    fn on_timer(&self) -> GateDecision;
}

/// State of the gesture in progress
#[derive(Debug)]
pub struct DragSession {
    pub kind: PointerKind,
    pub gate: Box<dyn ActivationGate>,
    pub phase: Phase,
    pub dragged: ItemId,
    pub project: ProjectId,
    pub origin_index: usize,
    /// Item currently under the pointer
    pub below: Option<ItemId>,
    /// Offset the dragged item settles at on release
    pub rest_offset: f64,
    /// Working order; applied to the store on release
    pub order: Vec<ItemId>,
    pub start_page: Point,
    /// Pointer position relative to the item's top-left corner
    pub grab: Point,
    pub item_rect: Rect,
    pub container: Rect,
    pub initial_translate: f64,
    pub initial_scroll: f64,
    pub bounds: TranslateBounds,
    /// Last pointer y that crossed an auto-scroll band edge
    pub band_y: Option<f64>,
    /// Pending auto-scroll steps
    pub timers: TimerSet,
    pub long_press: Option<TimerId>,
}

impl DragSession {
    /// Whether the working order differs from where the item started
    pub fn moved(&self) -> bool {
        self.order.iter().position(|id| *id == self.dragged) != Some(self.origin_index)
    }

    /// Cancel every timer this session scheduled
    pub fn cancel_timers(&mut self, queue: &mut TimerQueue) {
        if let Some(id) = self.long_press.take() {
            queue.cancel(id);
        }
        self.timers.cancel_all(queue);
    }

    pub fn owns_timer(&self, id: TimerId) -> bool {
        self.long_press == Some(id) || self.timers.contains(id)
    }
}
