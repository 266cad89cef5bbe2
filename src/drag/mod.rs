//! Headless drag-and-drop reordering for a single list.

pub mod controller;
pub mod geometry;
pub mod gesture;
pub mod mouse;
pub mod surface;
pub mod timer;
pub mod touch;

pub use controller::{DragController, ReleaseOutcome};
pub use geometry::{Point, Rect};
pub use gesture::{Phase, PointerEvent, PointerKind, Rejection};
pub use surface::{Surface, VirtualList};
