//! Pure layout arithmetic for a drag.
//!
//! Everything here works on read-only snapshots and returns new values;
//! nothing touches the store or the surface.

use crate::model::task::{Item, ItemId};

/// Anything that can stand in a list by item id
pub trait Keyed {
    fn key(&self) -> ItemId;
}

impl Keyed for ItemId {
    fn key(&self) -> ItemId {
        *self
    }
}

impl Keyed for Item {
    fn key(&self) -> ItemId {
        self.id
    }
}

impl<T: Keyed> Keyed for &T {
    fn key(&self) -> ItemId {
        (*self).key()
    }
}

fn index_of<T: Keyed>(items: &[T], id: ItemId) -> Option<usize> {
    items.iter().position(|it| it.key() == id)
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// Move `dragged` next to `below`.
///
/// Moving to an earlier index puts it immediately before `below`; moving to
/// a later index puts it immediately after. All other items keep their
/// relative order. Returns `None` when either id is missing.
pub fn reordered<T: Keyed + Clone>(items: &[T], dragged: ItemId, below: ItemId) -> Option<Vec<T>> {
    let from = index_of(items, dragged)?;
    let to = index_of(items, below)?;
    let mut out = items.to_vec();
    if from != to {
        let moving = out.remove(from);
        // After removal, `to` already points at the slot after `below` when
        // moving later, and at `below` itself when moving earlier.
        out.insert(to, moving);
    }
    Some(out)
}

/// Items that must shift to make room: `[below, dragged)` when moving to an
/// earlier index, `(dragged, below]` when moving later. The dragged item is
/// never included.
pub fn affected_items<T: Keyed>(items: &[T], dragged: ItemId, below: ItemId) -> Option<Vec<ItemId>> {
    let from = index_of(items, dragged)?;
    let to = index_of(items, below)?;
    let range = if to < from { to..from } else { from + 1..to + 1 };
    Some(items[range].iter().map(|it| it.key()).collect())
}

/// Which way the dragged item travels in list order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Travel {
    Earlier,
    Later,
    None,
}

pub fn travel<T: Keyed>(items: &[T], dragged: ItemId, below: ItemId) -> Option<Travel> {
    let from = index_of(items, dragged)?;
    let to = index_of(items, below)?;
    Some(match to.cmp(&from) {
        std::cmp::Ordering::Less => Travel::Earlier,
        std::cmp::Ordering::Greater => Travel::Later,
        std::cmp::Ordering::Equal => Travel::None,
    })
}

/// New resting offsets after `dragged` enters the slot of `below`.
///
/// Each affected item moves one dragged-item extent against the direction
/// of travel; the dragged item's rest offset moves by the affected items'
/// summed extents so it lines up with the target's edge. `offsets` holds the
/// current offset of every affected item and `rest` the dragged item's
/// current rest offset.
pub fn drop_offsets(
    travel: Travel,
    affected: &[ItemId],
    dragged_extent: f64,
    rest: f64,
    offset_of: impl Fn(ItemId) -> f64,
    extent_of: impl Fn(ItemId) -> f64,
) -> DropOffsets {
    let sign = match travel {
        Travel::Earlier => 1.0,
        Travel::Later => -1.0,
        Travel::None => {
            return DropOffsets {
                rest,
                shifted: Vec::new(),
            };
        }
    };
    let span: f64 = affected.iter().map(|id| extent_of(*id)).sum();
    DropOffsets {
        rest: rest - sign * span,
        shifted: affected
            .iter()
            .map(|id| (*id, offset_of(*id) + sign * dragged_extent))
            .collect(),
    }
}

/// Result of `drop_offsets`
#[derive(Debug, Clone, PartialEq)]
pub struct DropOffsets {
    /// Offset the dragged item settles at on release
    pub rest: f64,
    /// New offset for each affected item
    pub shifted: Vec<(ItemId, f64)>,
}

// ---------------------------------------------------------------------------
// Rectangles and bounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle in viewport coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Half-open containment: the bottom and right edges belong to the
    /// next rectangle.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right() && p.y >= self.top && p.y < self.bottom()
    }
}

/// Range the dragged item's translate is clamped to, so it never leaves
/// the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslateBounds {
    pub min: f64,
    pub max: f64,
}

impl TranslateBounds {
    /// Computed once at drag start from the container, the item's top, its
    /// extent and the translate it already had.
    pub fn new(container: Rect, item_top: f64, extent: f64, initial_translate: f64) -> Self {
        TranslateBounds {
            min: container.top + 1.0 - item_top + initial_translate,
            max: container.bottom() - extent - 1.0 - item_top + initial_translate,
        }
    }

    /// Clamp to `[min, max]`; the minimum wins if the range is empty
    pub fn clamp(&self, y: f64) -> f64 {
        if y > self.max {
            self.max.max(self.min)
        } else if y < self.min {
            self.min
        } else {
            y
        }
    }
}

// ---------------------------------------------------------------------------
// Auto-scroll
// ---------------------------------------------------------------------------

/// 1px steps needed to scroll from `scroll_top` down to `max_scroll`
pub fn scroll_steps_down(scroll_top: f64, max_scroll: f64) -> usize {
    (max_scroll - scroll_top).max(0.0).ceil() as usize
}

/// 1px steps needed to scroll from `scroll_top` back to 0
pub fn scroll_steps_up(scroll_top: f64) -> usize {
    scroll_top.max(0.0).ceil() as usize
}
