//! The drawing surface a drag runs against.
//!
//! `Surface` is everything the controller needs from a rendered list:
//! layout reads, per-item visual offsets, hit-testing, scrolling and a way
//! to put children back in canonical order. `VirtualList` implements it in
//! memory for the CLI and the tests.

use crate::model::config::LayoutConfig;
use crate::model::task::ItemId;

use super::geometry::{Point, Rect};

/// Something that can be hidden for a hit test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Item(ItemId),
    Overlay,
}

pub trait Surface {
    /// Visible rectangle of the scroll container, in viewport coordinates
    fn container_rect(&self) -> Rect;
    /// Current rectangle of an item, including its visual offset
    fn item_rect(&self, id: ItemId) -> Option<Rect>;
    /// Height plus bottom margin
    fn extent(&self, id: ItemId) -> Option<f64>;

    fn translate_y(&self, id: ItemId) -> f64;
    fn set_translate_y(&mut self, id: ItemId, y: f64);
    /// Like `set_translate_y`, but the host reports the end of the
    /// transition through `DragController::transition_end`.
    fn animate_translate_y(&mut self, id: ItemId, y: f64);

    /// Take the item out of flow at its current position
    fn detach(&mut self, id: ItemId);
    /// Put a detached item back into flow
    fn attach(&mut self, id: ItemId);
    fn set_hidden(&mut self, part: Part, hidden: bool);
    /// Topmost visible item under a viewport point
    fn item_at(&self, point: Point) -> Option<ItemId>;

    fn scroll_top(&self) -> f64;
    fn max_scroll(&self) -> f64;
    /// Scroll by `dy`, clamped to `[0, max_scroll]`
    fn scroll_by(&mut self, dy: f64);

    fn show_overlay(&mut self, rect: Rect);
    fn move_overlay(&mut self, top: f64);
    fn remove_overlay(&mut self);

    /// Reorder children to `order` and clear every visual offset. Afterwards
    /// child `i` is `order[i]`.
    fn reconcile(&mut self, order: &[ItemId]);
    /// Child ids in their current document order
    fn children(&self) -> Vec<ItemId>;
}

// ---------------------------------------------------------------------------
// In-memory surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    id: ItemId,
    height: f64,
    margin: f64,
    translate: f64,
    /// Fixed top (viewport) while detached
    fixed_top: Option<f64>,
    hidden: bool,
}

impl Slot {
    fn extent(&self) -> f64 {
        self.height + self.margin
    }
}

/// A vertically stacked list with uniform width, laid out from config
#[derive(Debug, Clone)]
pub struct VirtualList {
    container: Rect,
    item_height: f64,
    item_margin: f64,
    slots: Vec<Slot>,
    scroll_top: f64,
    overlay: Option<Rect>,
    overlay_hidden: bool,
    animations: usize,
}

impl VirtualList {
    pub fn new(layout: &LayoutConfig, order: &[ItemId]) -> Self {
        let mut list = VirtualList {
            container: Rect::new(
                layout.left,
                layout.container_top,
                layout.width,
                layout.viewport_height,
            ),
            item_height: layout.item_height,
            item_margin: layout.item_margin,
            slots: Vec::new(),
            scroll_top: 0.0,
            overlay: None,
            overlay_hidden: false,
            animations: 0,
        };
        list.reconcile(order);
        list
    }

    /// Give one item a different height
    pub fn set_item_height(&mut self, id: ItemId, height: f64) {
        if let Some(slot) = self.slot_mut(id) {
            slot.height = height;
        }
    }

    pub fn overlay(&self) -> Option<Rect> {
        self.overlay
    }

    pub fn is_detached(&self, id: ItemId) -> bool {
        self.slot(id).is_some_and(|s| s.fixed_top.is_some())
    }

    /// Number of transitions started with `animate_translate_y`
    pub fn animations(&self) -> usize {
        self.animations
    }

    /// Total height of all children
    pub fn content_height(&self) -> f64 {
        self.slots.iter().map(Slot::extent).sum()
    }

    /// Centre of an item in viewport coordinates
    pub fn center_of(&self, id: ItemId) -> Option<Point> {
        let rect = self.item_rect(id)?;
        Some(Point::new(
            rect.left + rect.width / 2.0,
            rect.top + rect.height / 2.0,
        ))
    }

    fn slot(&self, id: ItemId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    fn slot_mut(&mut self, id: ItemId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == id)
    }

    /// Top of a slot in flow, relative to the content origin
    fn flow_top(&self, id: ItemId) -> Option<f64> {
        let mut top = 0.0;
        for slot in &self.slots {
            if slot.id == id {
                return Some(top);
            }
            top += slot.extent();
        }
        None
    }
}

impl Surface for VirtualList {
    fn container_rect(&self) -> Rect {
        self.container
    }

    fn item_rect(&self, id: ItemId) -> Option<Rect> {
        let slot = self.slot(id)?;
        let top = match slot.fixed_top {
            Some(fixed) => fixed + slot.translate,
            None => self.container.top + self.flow_top(id)? + slot.translate - self.scroll_top,
        };
        Some(Rect::new(self.container.left, top, self.container.width, slot.height))
    }

    fn extent(&self, id: ItemId) -> Option<f64> {
        self.slot(id).map(Slot::extent)
    }

    fn translate_y(&self, id: ItemId) -> f64 {
        self.slot(id).map_or(0.0, |s| s.translate)
    }

    fn set_translate_y(&mut self, id: ItemId, y: f64) {
        if let Some(slot) = self.slot_mut(id) {
            slot.translate = y;
        }
    }

    fn animate_translate_y(&mut self, id: ItemId, y: f64) {
        self.set_translate_y(id, y);
        self.animations += 1;
    }

    fn detach(&mut self, id: ItemId) {
        if let Some(rect) = self.item_rect(id)
            && let Some(slot) = self.slot_mut(id)
            && slot.fixed_top.is_none()
        {
            slot.fixed_top = Some(rect.top - slot.translate);
        }
    }

    fn attach(&mut self, id: ItemId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.fixed_top = None;
        }
    }

    fn set_hidden(&mut self, part: Part, hidden: bool) {
        match part {
            Part::Item(id) => {
                if let Some(slot) = self.slot_mut(id) {
                    slot.hidden = hidden;
                }
            }
            Part::Overlay => self.overlay_hidden = hidden,
        }
    }

    fn item_at(&self, point: Point) -> Option<ItemId> {
        if !self.container.contains(point) {
            return None;
        }
        // Later children paint over earlier ones
        self.slots
            .iter()
            .rev()
            .filter(|s| !s.hidden)
            .find(|s| self.item_rect(s.id).is_some_and(|r| r.contains(point)))
            .map(|s| s.id)
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn max_scroll(&self) -> f64 {
        (self.content_height() - self.container.height).max(0.0)
    }

    fn scroll_by(&mut self, dy: f64) {
        self.scroll_top = (self.scroll_top + dy).clamp(0.0, self.max_scroll());
    }

    fn show_overlay(&mut self, rect: Rect) {
        self.overlay = Some(rect);
        self.overlay_hidden = false;
    }

    fn move_overlay(&mut self, top: f64) {
        if let Some(rect) = self.overlay.as_mut() {
            rect.top = top;
        }
    }

    fn remove_overlay(&mut self) {
        self.overlay = None;
        self.overlay_hidden = false;
    }

    fn reconcile(&mut self, order: &[ItemId]) {
        let mut old = std::mem::take(&mut self.slots);
        self.slots = order
            .iter()
            .map(|id| match old.iter().position(|s| s.id == *id) {
                Some(idx) => {
                    let mut slot = old.swap_remove(idx);
                    slot.translate = 0.0;
                    slot.fixed_top = None;
                    slot.hidden = false;
                    slot
                }
                None => Slot {
                    id: *id,
                    height: self.item_height,
                    margin: self.item_margin,
                    translate: 0.0,
                    fixed_top: None,
                    hidden: false,
                },
            })
            .collect();
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    fn children(&self) -> Vec<ItemId> {
        self.slots.iter().map(|s| s.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(raw: &[u32]) -> Vec<ItemId> {
        raw.iter().map(|n| ItemId(*n)).collect()
    }

    fn list(n: u32) -> VirtualList {
        let order: Vec<ItemId> = (1..=n).map(ItemId).collect();
        VirtualList::new(&LayoutConfig::default(), &order)
    }

    #[test]
    fn stacks_items_from_container_top() {
        let surface = list(3);
        assert_eq!(surface.item_rect(ItemId(1)).unwrap().top, 100.0);
        assert_eq!(surface.item_rect(ItemId(3)).unwrap().top, 212.0);
        assert_eq!(surface.extent(ItemId(2)), Some(56.0));
    }

    #[test]
    fn hit_test_skips_hidden_and_gaps() {
        let mut surface = list(3);
        assert_eq!(surface.item_at(Point::new(10.0, 120.0)), Some(ItemId(1)));
        // Margin below item 1
        assert_eq!(surface.item_at(Point::new(10.0, 150.0)), None);
        surface.set_hidden(Part::Item(ItemId(1)), true);
        assert_eq!(surface.item_at(Point::new(10.0, 120.0)), None);
        // Outside the container
        assert_eq!(surface.item_at(Point::new(10.0, 50.0)), None);
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut surface = list(12);
        // 12 * 56 = 672 content, 480 viewport
        assert_eq!(surface.max_scroll(), 192.0);
        surface.scroll_by(500.0);
        assert_eq!(surface.scroll_top(), 192.0);
        surface.scroll_by(-1000.0);
        assert_eq!(surface.scroll_top(), 0.0);
        surface.scroll_by(10.0);
        assert_eq!(surface.item_rect(ItemId(1)).unwrap().top, 90.0);
    }

    #[test]
    fn detached_item_ignores_scroll() {
        let mut surface = list(12);
        surface.detach(ItemId(2));
        surface.scroll_by(20.0);
        assert_eq!(surface.item_rect(ItemId(2)).unwrap().top, 156.0);
        surface.set_translate_y(ItemId(2), 30.0);
        assert_eq!(surface.item_rect(ItemId(2)).unwrap().top, 186.0);
        surface.attach(ItemId(2));
        assert_eq!(surface.item_rect(ItemId(2)).unwrap().top, 166.0);
    }

    #[test]
    fn reconcile_reorders_and_resets() {
        let mut surface = list(3);
        surface.set_translate_y(ItemId(1), 56.0);
        surface.detach(ItemId(3));
        surface.reconcile(&ids(&[3, 1, 2]));
        assert_eq!(surface.children(), ids(&[3, 1, 2]));
        assert_eq!(surface.translate_y(ItemId(1)), 0.0);
        assert!(!surface.is_detached(ItemId(3)));

        surface.reconcile(&ids(&[1, 4]));
        assert_eq!(surface.children(), ids(&[1, 4]));
        assert_eq!(surface.extent(ItemId(4)), Some(56.0));
    }
}
