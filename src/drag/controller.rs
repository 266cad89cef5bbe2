//! Drives one drag gesture at a time against a `Surface`.
//!
//! The controller is the only place that holds a session. Events with no
//! session are ignored, so a host can forward every pointer event it sees.

use crate::model::app::AppState;
use crate::model::config::DragConfig;
use crate::model::project::ProjectId;
use crate::model::task::ItemId;

use super::geometry::{self, Point, Rect, TranslateBounds};
use super::gesture::{
    ActivationGate, DragSession, GateDecision, Phase, PointerEvent, PointerKind, Rejection,
};
use super::mouse::MouseGate;
use super::surface::{Part, Surface};
use super::timer::{TimerQueue, TimerTask};
use super::touch::TouchGate;

/// How a release ended the gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// No gesture was active
    Ignored,
    /// Released before activation; nothing changed
    Cancelled,
    /// Order applied; the item is animating into place
    Settling,
    /// Order applied and the surface already reconciled
    Dropped,
    /// The dragged item vanished from the store; nothing applied
    Aborted,
}

pub struct DragController<S: Surface> {
    surface: S,
    timers: TimerQueue,
    config: DragConfig,
    session: Option<DragSession>,
}

impl<S: Surface> DragController<S> {
    pub fn new(surface: S, config: DragConfig) -> Self {
        DragController {
            surface,
            timers: TimerQueue::new(),
            config,
            session: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.session.as_ref().map(|s| s.phase)
    }

    /// Timers still queued, whether or not a session owns them
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Current virtual time
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    // -----------------------------------------------------------------------
    // Press
    // -----------------------------------------------------------------------

    /// Start a gesture on the selected list.
    ///
    /// A press while a previous drop is still settling finishes that settle
    /// first.
    pub fn press(&mut self, state: &AppState, event: &PointerEvent) -> Result<(), Rejection> {
        if self.phase() == Some(Phase::Settling) {
            self.finish_settle(state);
        }
        if self.session.is_some() {
            return Err(Rejection::SessionActive);
        }

        let target = event.target.ok_or(Rejection::NotAnItem)?;
        let project = state.selected_project().ok_or(Rejection::NoListSelected)?;
        if project.id.is_aggregate() {
            return Err(Rejection::AggregateView);
        }
        if project.sort.selected.is_some() {
            return Err(Rejection::Sorted);
        }
        let origin_index = project.position_of(target).ok_or(Rejection::NotLive(target))?;
        let item_rect = self
            .surface
            .item_rect(target)
            .ok_or(Rejection::NotLive(target))?;
        let extent = self.surface.extent(target).unwrap_or(item_rect.height);

        let container = self.surface.container_rect();
        let initial_translate = self.surface.translate_y(target);
        let mut gate: Box<dyn ActivationGate> = match event.kind {
            PointerKind::Mouse => Box::new(MouseGate::new(self.config.move_threshold_px)),
            PointerKind::Touch => Box::new(TouchGate::new(self.config.long_press_ms)),
        };
        let long_press = gate.on_press(&mut self.timers);

        tracing::debug!(item = %target, list = %project.id, kind = ?event.kind, "drag armed");
        self.session = Some(DragSession {
            kind: event.kind,
            gate,
            phase: Phase::Armed,
            dragged: target,
            project: project.id,
            origin_index,
            below: None,
            rest_offset: initial_translate,
            order: project.item_ids(),
            start_page: event.page,
            grab: Point::new(
                event.client.x - item_rect.left,
                event.client.y - item_rect.top,
            ),
            item_rect,
            container,
            initial_translate,
            initial_scroll: self.surface.scroll_top(),
            bounds: TranslateBounds::new(container, item_rect.top, extent, initial_translate),
            band_y: None,
            timers: Default::default(),
            long_press,
        });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Move
    // -----------------------------------------------------------------------

    pub fn pointer_move(&mut self, state: &AppState, event: &PointerEvent) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.kind != event.kind {
            return;
        }
        let phase = session.phase;
        let decision = match phase {
            Phase::Armed => session.gate.on_move(session.start_page, event.page),
            Phase::Dragging => GateDecision::Activate,
            Phase::Settling => return,
        };
        match (phase, decision) {
            (Phase::Dragging, _) => self.drag_to(state, event),
            (_, GateDecision::Activate) => {
                self.activate();
                self.drag_to(state, event);
            }
            (_, GateDecision::Abandon) => self.abandon("moved before activation"),
            (_, GateDecision::Wait) => {}
        }
    }

    fn activate(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(id) = session.long_press.take() {
            self.timers.cancel(id);
        }
        session.phase = Phase::Dragging;
        self.surface.detach(session.dragged);
        let rect = session.item_rect;
        self.surface.show_overlay(Rect::new(
            session.start_page.x - session.grab.x,
            session.start_page.y - session.grab.y,
            rect.width,
            rect.height,
        ));
        tracing::debug!(item = %session.dragged, "drag started");
    }

    fn drag_to(&mut self, state: &AppState, event: &PointerEvent) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let dragged = session.dragged;

        let translate = session
            .bounds
            .clamp(session.initial_translate - session.start_page.y + event.page.y);
        self.surface.set_translate_y(dragged, translate);
        self.surface.move_overlay(event.page.y - session.grab.y);
        self.auto_scroll(event.page.y);

        self.surface.set_hidden(Part::Item(dragged), true);
        self.surface.set_hidden(Part::Overlay, true);
        let below = self.surface.item_at(event.client);
        self.surface.set_hidden(Part::Item(dragged), false);
        self.surface.set_hidden(Part::Overlay, false);

        let Some(session) = self.session.as_mut() else {
            return;
        };
        if below == session.below {
            return;
        }
        session.below = below;
        if let Some(below) = below {
            self.enter(state, below);
        }
    }

    /// The pointer moved onto a new item: shift the items in between and
    /// update the working order.
    fn enter(&mut self, state: &AppState, below: ItemId) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let dragged = session.dragged;
        let live = state.project(session.project);
        if !live.is_some_and(|p| p.contains(dragged)) {
            self.abort(state, "dragged item was removed");
            return;
        }
        if !live.is_some_and(|p| p.contains(below)) {
            tracing::trace!(item = %below, "stale drop target, skipping");
            return;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let order = &session.order;
        let (Some(travel), Some(affected), Some(next)) = (
            geometry::travel(order, dragged, below),
            geometry::affected_items(order, dragged, below),
            geometry::reordered(order, dragged, below),
        ) else {
            tracing::trace!(item = %below, "drop target not in working order");
            return;
        };

        let surface = &self.surface;
        let dragged_extent = surface.extent(dragged).unwrap_or(0.0);
        let offsets = geometry::drop_offsets(
            travel,
            &affected,
            dragged_extent,
            session.rest_offset,
            |id| surface.translate_y(id),
            |id| surface.extent(id).unwrap_or(0.0),
        );
        for (id, y) in &offsets.shifted {
            self.surface.set_translate_y(*id, *y);
        }
        session.rest_offset = offsets.rest;
        session.order = next;
        tracing::trace!(item = %dragged, below = %below, rest = session.rest_offset, "entered drop target");
    }

    // -----------------------------------------------------------------------
    // Auto-scroll
    // -----------------------------------------------------------------------

    fn auto_scroll(&mut self, y: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let band = self.config.scroll_band_px;
        let bottom_edge = session.container.bottom() - band;
        let top_edge = session.container.top + band;
        let last = session.band_y;

        let left_bottom = y <= bottom_edge && last.is_some_and(|l| l > bottom_edge);
        let left_top = y >= top_edge && last.is_some_and(|l| l < top_edge);
        if left_bottom || left_top {
            session.band_y = Some(y);
            session.timers.cancel_all(&mut self.timers);
        }

        let (steps, dy) = if y > bottom_edge && last.is_none_or(|l| l <= bottom_edge) {
            let steps =
                geometry::scroll_steps_down(self.surface.scroll_top(), self.surface.max_scroll());
            (steps, 1.0)
        } else if y < top_edge && last.is_none_or(|l| l >= top_edge) {
            (geometry::scroll_steps_up(self.surface.scroll_top()), -1.0)
        } else {
            return;
        };

        session.band_y = Some(y);
        for k in 0..steps as u64 {
            let id = self
                .timers
                .schedule(k * self.config.scroll_step_ms, TimerTask::ScrollStep(dy));
            session.timers.push(id);
        }
        tracing::trace!(steps, dy, "auto-scroll scheduled");
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// Move the clock to `now`, firing every due timer in deadline order
    pub fn advance(&mut self, state: &AppState, now: u64) {
        while let Some((id, task)) = self.timers.pop_due(now) {
            let Some(session) = self.session.as_mut() else {
                continue;
            };
            if !session.owns_timer(id) {
                continue;
            }
            match task {
                TimerTask::LongPress => {
                    session.long_press = None;
                    if session.phase == Phase::Armed
                        && session.gate.on_timer() == GateDecision::Activate
                    {
                        if !state
                            .project(session.project)
                            .is_some_and(|p| p.contains(session.dragged))
                        {
                            self.abort(state, "dragged item was removed");
                            continue;
                        }
                        self.activate();
                    }
                }
                TimerTask::ScrollStep(dy) => {
                    session.timers.forget(id);
                    self.surface.scroll_by(dy);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Release
    // -----------------------------------------------------------------------

    /// End the gesture. A completed drag applies the working order to the
    /// store and calls `persist` once.
    pub fn release(
        &mut self,
        state: &mut AppState,
        kind: PointerKind,
        persist: impl FnOnce(&AppState),
    ) -> ReleaseOutcome {
        let Some(session) = self.session.as_mut() else {
            return ReleaseOutcome::Ignored;
        };
        if session.kind != kind || session.phase == Phase::Settling {
            return ReleaseOutcome::Ignored;
        }
        if session.phase == Phase::Armed {
            self.abandon("released before activation");
            return ReleaseOutcome::Cancelled;
        }

        session.cancel_timers(&mut self.timers);
        let dragged = session.dragged;
        self.surface.remove_overlay();
        let translate = self.surface.translate_y(dragged);
        self.surface.attach(dragged);
        let scrolled = session.initial_scroll != self.surface.scroll_top();

        let Some(project) = state.project_mut(session.project) else {
            self.abort(state, "list was removed");
            return ReleaseOutcome::Aborted;
        };
        if !project.contains(dragged) {
            self.abort(state, "dragged item was removed");
            return ReleaseOutcome::Aborted;
        }
        let changed = project.apply_order(&session.order);
        tracing::info!(item = %dragged, list = %session.project, changed, "drag dropped");
        persist(&*state);

        let rest = session.rest_offset;
        if translate != rest && !scrolled {
            self.surface.animate_translate_y(dragged, rest);
            session.phase = Phase::Settling;
            ReleaseOutcome::Settling
        } else {
            self.finish_settle(state);
            ReleaseOutcome::Dropped
        }
    }

    /// The surface finished animating the dropped item
    pub fn transition_end(&mut self, state: &AppState) {
        if self.phase() == Some(Phase::Settling) {
            self.finish_settle(state);
        }
    }

    fn finish_settle(&mut self, state: &AppState) {
        if let Some(session) = self.session.take() {
            self.reconcile_with(state, session.project);
        }
    }

    // -----------------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------------

    /// Drop a gesture that never changed anything
    fn abandon(&mut self, reason: &str) {
        if let Some(mut session) = self.session.take() {
            session.cancel_timers(&mut self.timers);
            tracing::debug!(item = %session.dragged, reason, "drag abandoned");
        }
    }

    /// Tear down a gesture whose item is gone and show the live order
    fn abort(&mut self, state: &AppState, reason: &str) {
        if let Some(mut session) = self.session.take() {
            session.cancel_timers(&mut self.timers);
            self.surface.remove_overlay();
            self.surface.attach(session.dragged);
            self.reconcile_with(state, session.project);
            tracing::warn!(item = %session.dragged, reason, "drag aborted");
        }
    }

    fn reconcile_with(&mut self, state: &AppState, project: ProjectId) {
        let order = state
            .project(project)
            .map(|p| p.item_ids())
            .unwrap_or_default();
        self.surface.reconcile(&order);
    }
}
