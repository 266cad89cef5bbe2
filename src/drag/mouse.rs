use super::geometry::Point;
use super::gesture::{ActivationGate, GateDecision};
use super::timer::{TimerId, TimerQueue};

/// A mouse press becomes a drag once the pointer has moved more than
/// `threshold` pixels on either axis.
#[derive(Debug, Clone)]
pub struct MouseGate {
    pub threshold: f64,
}

impl MouseGate {
    pub fn new(threshold: f64) -> Self {
        MouseGate { threshold }
    }
}

impl ActivationGate for MouseGate {
    fn on_press(&mut self, _timers: &mut TimerQueue) -> Option<TimerId> {
        None
    }

    fn on_move(&self, start: Point, now: Point) -> GateDecision {
        if (now.x - start.x).abs() > self.threshold || (now.y - start.y).abs() > self.threshold {
            GateDecision::Activate
        } else {
            GateDecision::Wait
        }
    }

    fn on_timer(&self) -> GateDecision {
        GateDecision::Wait
    }
}
