use super::geometry::Point;
use super::gesture::{ActivationGate, GateDecision};
use super::timer::{TimerId, TimerQueue, TimerTask};

/// A touch press becomes a drag after being held for `long_press_ms`.
/// Any movement before that is a scroll, and abandons the gesture.
#[derive(Debug, Clone)]
pub struct TouchGate {
    pub long_press_ms: u64,
}

impl TouchGate {
    pub fn new(long_press_ms: u64) -> Self {
        TouchGate { long_press_ms }
    }
}

impl ActivationGate for TouchGate {
    fn on_press(&mut self, timers: &mut TimerQueue) -> Option<TimerId> {
        Some(timers.schedule(self.long_press_ms, TimerTask::LongPress))
    }

    fn on_move(&self, _start: Point, _now: Point) -> GateDecision {
        GateDecision::Abandon
    }

    fn on_timer(&self) -> GateDecision {
        GateDecision::Activate
    }
}
