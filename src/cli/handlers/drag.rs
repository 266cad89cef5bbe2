//! `td drag`: replay a pointer gesture against an in-memory list, so a
//! reorder from the command line runs through the same engine as one made
//! with a mouse or a finger.

use crate::cli::commands::DragArgs;
use crate::drag::{
    DragController, Phase, Point, PointerEvent, PointerKind, ReleaseOutcome, Surface, VirtualList,
};
use crate::io::store_io;
use crate::model::app::AppState;
use crate::model::config::DragConfig;
use crate::model::task::ItemId;
use crate::ops::project_ops;

use super::{CmdResult, load_workspace, print_view, resolve_item};

/// Largest pointer step per replayed move event
const STEP_PX: f64 = 8.0;

pub fn cmd_drag(dir: Option<&str>, args: DragArgs, json: bool) -> CmdResult {
    let mut ws = load_workspace(dir)?;
    let (list, dragged) = resolve_item(&ws.state, &args.item)?;
    let (onto_list, onto) = resolve_item(&ws.state, &args.onto)?;
    if onto_list != list {
        return Err("both tasks must be in the same list".into());
    }
    if dragged == onto {
        println!("{}:{} stays where it is", list, dragged);
        return Ok(());
    }
    project_ops::select(&mut ws.state, list)?;

    let kind = if args.touch {
        PointerKind::Touch
    } else {
        PointerKind::Mouse
    };
    let order = ws
        .state
        .project(list)
        .map(|p| p.item_ids())
        .unwrap_or_default();
    let surface = VirtualList::new(&ws.config.layout, &order);
    let mut controller = DragController::new(surface, ws.config.drag.clone());

    let todo_dir = ws.todo_dir.clone();
    let mut saved = Ok(());
    let outcome = replay(
        &mut controller,
        &mut ws.state,
        &ws.config.drag,
        kind,
        dragged,
        onto,
        |state| saved = store_io::save_state(&todo_dir, state),
    )?;
    saved?;

    match outcome {
        ReleaseOutcome::Settling | ReleaseOutcome::Dropped => {
            tracing::info!(item = %dragged, onto = %onto, ?outcome, "drag replayed");
            print_view(&mut ws, list, json)
        }
        other => Err(format!("drag did not complete ({:?})", other).into()),
    }
}

/// Press on `dragged`, move the pointer until `onto` is under it (letting
/// auto-scroll run at the list edges), then release. The surface is left
/// reconciled with the store.
pub(crate) fn replay(
    controller: &mut DragController<VirtualList>,
    state: &mut AppState,
    config: &DragConfig,
    kind: PointerKind,
    dragged: ItemId,
    onto: ItemId,
    persist: impl FnOnce(&AppState),
) -> Result<ReleaseOutcome, Box<dyn std::error::Error>> {
    let container = controller.surface().container_rect();
    let missing = || format!("task {} is not in the list", dragged);

    // Bring the dragged task away from the scroll bands before pressing
    let center = controller.surface().center_of(dragged).ok_or_else(missing)?;
    let band = config.scroll_band_px;
    if center.y < container.top + band || center.y > container.bottom() - band {
        let middle = container.top + container.height / 2.0;
        controller.surface_mut().scroll_by(center.y - middle);
    }
    let start = controller.surface().center_of(dragged).ok_or_else(missing)?;

    controller.press(state, &PointerEvent::at(kind, start, Some(dragged)))?;
    if kind == PointerKind::Touch {
        let until = controller.now() + config.long_press_ms;
        controller.advance(state, until);
    }

    let max_moves = (controller.surface().content_height() + container.height) as usize * 2 + 64;
    let (low, high) = (container.top + 1.0, container.bottom() - 1.0);
    let mut y = start.y;
    for _ in 0..max_moves {
        if controller
            .session()
            .is_some_and(|s| s.phase == Phase::Dragging && s.below == Some(onto))
        {
            break;
        }
        let goal = controller
            .surface()
            .center_of(onto)
            .ok_or_else(|| format!("task {} is not in the list", onto))?
            .y
            .clamp(low, high);
        y += (goal - y).clamp(-STEP_PX, STEP_PX);
        controller.pointer_move(state, &PointerEvent::at(kind, Point::new(start.x, y), None));
        let until = controller.now() + config.scroll_step_ms.max(1);
        controller.advance(state, until);
        if controller.session().is_none() {
            return Err("drag ended before reaching its target".into());
        }
    }

    let outcome = controller.release(state, kind, persist);
    if outcome == ReleaseOutcome::Settling {
        controller.transition_end(state);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::LayoutConfig;
    use crate::model::project::SystemList;
    use crate::ops::task_ops;
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;

    fn tasks(n: u32) -> AppState {
        let mut state = AppState::new();
        let today = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        for i in 1..=n {
            task_ops::add_item(&mut state, SystemList::Tasks.id(), &format!("t{}", i), today, Utc::now())
                .unwrap();
        }
        state
    }

    fn run(state: &mut AppState, kind: PointerKind, dragged: u32, onto: u32) -> (ReleaseOutcome, usize, Vec<ItemId>) {
        let order = state.project(SystemList::Tasks.id()).unwrap().item_ids();
        let surface = VirtualList::new(&LayoutConfig::default(), &order);
        let config = DragConfig::default();
        let mut controller = DragController::new(surface, config.clone());
        let mut persisted = 0;
        let outcome = replay(
            &mut controller,
            state,
            &config,
            kind,
            ItemId(dragged),
            ItemId(onto),
            |_| persisted += 1,
        )
        .unwrap();
        assert_eq!(controller.pending_timers(), 0);
        assert!(controller.session().is_none());
        (outcome, persisted, controller.surface().children())
    }

    fn order(state: &AppState) -> Vec<u32> {
        state
            .project(SystemList::Tasks.id())
            .unwrap()
            .item_ids()
            .iter()
            .map(|id| id.0)
            .collect()
    }

    #[test]
    fn mouse_drag_down_and_up() {
        let mut state = tasks(5);
        let (outcome, persisted, children) = run(&mut state, PointerKind::Mouse, 1, 4);
        assert_eq!(outcome, ReleaseOutcome::Settling);
        assert_eq!(persisted, 1);
        assert_eq!(order(&state), vec![2, 3, 4, 1, 5]);
        assert_eq!(children, state.project(SystemList::Tasks.id()).unwrap().item_ids());

        run(&mut state, PointerKind::Mouse, 5, 2);
        assert_eq!(order(&state), vec![5, 2, 3, 4, 1]);
    }

    #[test]
    fn touch_drag_uses_long_press() {
        let mut state = tasks(3);
        let (_, persisted, _) = run(&mut state, PointerKind::Touch, 3, 1);
        assert_eq!(persisted, 1);
        assert_eq!(order(&state), vec![3, 1, 2]);
    }

    #[test]
    fn drag_past_the_viewport_scrolls() {
        let mut state = tasks(20);
        let (outcome, _, children) = run(&mut state, PointerKind::Mouse, 1, 20);
        // The container scrolled, so the drop settles without animating
        assert_eq!(outcome, ReleaseOutcome::Dropped);
        let expected: Vec<u32> = (2..=20).chain([1]).collect();
        assert_eq!(order(&state), expected);
        assert_eq!(children.len(), 20);
    }

    #[test]
    fn sorted_list_refuses_the_press() {
        let mut state = tasks(3);
        state.project_mut(SystemList::Tasks.id()).unwrap().sort.selected =
            Some(crate::model::sort::SortCriterion::Alphabetical);
        let order_before = order(&state);
        let ids = state.project(SystemList::Tasks.id()).unwrap().item_ids();
        let config = DragConfig::default();
        let mut controller =
            DragController::new(VirtualList::new(&LayoutConfig::default(), &ids), config.clone());
        let result = replay(
            &mut controller,
            &mut state,
            &config,
            PointerKind::Mouse,
            ItemId(1),
            ItemId(3),
            |_| panic!("must not persist"),
        );
        assert!(result.is_err());
        assert_eq!(order(&state), order_before);
    }
}
