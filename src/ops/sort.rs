//! Derived display order for a list.
//!
//! Sorting never touches canonical item order: callers get a new vector
//! and the list's items stay where manual reordering left them.

use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::model::sort::{Direction, SortCriterion, SortState};
use crate::model::task::Item;

/// Return `items` in display order for the list's sort selection.
///
/// Aggregate views (All, My Day, Bookmarked) first get a stable base order
/// by creation date. A pending direction override on `sort` is consumed
/// here. Ties fall back to base position, scaled by the direction sign, so
/// flipping the direction reverses the output exactly unless the criterion
/// pins completed items.
pub fn sorted_items<T>(items: &[T], sort: &mut SortState, aggregate: bool) -> Vec<T>
where
    T: Borrow<Item> + Clone,
{
    let mut base = items.to_vec();
    if aggregate {
        base.sort_by(|a, b| a.borrow().creation_date.cmp(&b.borrow().creation_date));
    }

    let Some((criterion, direction)) = sort.resolve() else {
        return base;
    };

    let mut indexed: Vec<(usize, T)> = base.into_iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        compare(criterion, direction, a.borrow(), b.borrow())
            .then_with(|| direction.apply(ia.cmp(ib)))
    });
    indexed.into_iter().map(|(_, item)| item).collect()
}

/// Compare two items under one criterion and direction.
///
/// A strict weak ordering: `Equal` means the criterion cannot tell the
/// items apart.
pub fn compare(criterion: SortCriterion, direction: Direction, a: &Item, b: &Item) -> Ordering {
    match criterion {
        SortCriterion::Alphabetical => {
            direction.apply(a.title.to_uppercase().cmp(&b.title.to_uppercase()))
        }
        SortCriterion::Completed => direction.apply(a.is_complete.cmp(&b.is_complete)),
        SortCriterion::MyDay => direction.apply(a.is_my_day.cmp(&b.is_my_day)),
        SortCriterion::Bookmarked => direction.apply(a.is_important.cmp(&b.is_important)),
        SortCriterion::DueDate => a
            .is_complete
            .cmp(&b.is_complete)
            .then_with(|| a.date.is_none().cmp(&b.date.is_none()))
            .then_with(|| match (a.date, b.date) {
                (Some(da), Some(db)) => direction.apply(da.cmp(&db)),
                _ => Ordering::Equal,
            }),
        SortCriterion::CreationDate => direction.apply(a.creation_date.cmp(&b.creation_date)),
        SortCriterion::Priority => a.is_complete.cmp(&b.is_complete).then_with(|| {
            if a.is_complete || b.is_complete {
                Ordering::Equal
            } else {
                direction.apply(a.priority.cmp(&b.priority))
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::project::ProjectId;
    use crate::model::task::{ItemId, Priority};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn created(n: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(n as i64)
    }

    fn item(id: u32, title: &str) -> Item {
        Item::new(ItemId(id), ProjectId(5), title.to_string(), created(id))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn titles(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    fn sort_by(criterion: SortCriterion) -> SortState {
        SortState {
            selected: Some(criterion),
            ..Default::default()
        }
    }

    #[test]
    fn alphabetical_ascending_scenario() {
        let items = vec![item(1, "Banana"), item(2, "Apple"), item(3, "Cherry")];
        let mut sort = sort_by(SortCriterion::Alphabetical);
        let sorted = sorted_items(&items, &mut sort, false);
        assert_eq!(titles(&sorted), vec!["Apple", "Banana", "Cherry"]);
        // Input untouched
        assert_eq!(titles(&items), vec!["Banana", "Apple", "Cherry"]);
    }

    #[test]
    fn alphabetical_is_case_insensitive() {
        let items = vec![item(1, "banana"), item(2, "Apple"), item(3, "cherry")];
        let sorted = sorted_items(&items, &mut sort_by(SortCriterion::Alphabetical), false);
        assert_eq!(titles(&sorted), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn no_criterion_keeps_canonical_order() {
        let items = vec![item(3, "c"), item(1, "a"), item(2, "b")];
        let sorted = sorted_items(&items, &mut SortState::default(), false);
        assert_eq!(titles(&sorted), vec!["c", "a", "b"]);
    }

    #[test]
    fn aggregate_views_start_from_creation_order() {
        let items = vec![item(3, "c"), item(1, "a"), item(2, "b")];
        let sorted = sorted_items(&items, &mut SortState::default(), true);
        assert_eq!(titles(&sorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let items: Vec<Item> = Vec::new();
        assert!(sorted_items(&items, &mut sort_by(SortCriterion::Priority), true).is_empty());
    }

    #[test]
    fn bookmarked_defaults_to_flagged_first() {
        let mut a = item(1, "a");
        let b = item(2, "b");
        let mut c = item(3, "c");
        a.is_important = false;
        c.is_important = true;
        let sorted = sorted_items(&[a, b, c], &mut sort_by(SortCriterion::Bookmarked), false);
        assert_eq!(titles(&sorted)[0], "c");
    }

    #[test]
    fn due_date_pins_undated_and_completed_last() {
        let mut done = item(1, "done");
        done.is_complete = true;
        done.date = Some(day(1));
        let undated = item(2, "undated");
        let mut late = item(3, "late");
        late.date = Some(day(20));
        let mut soon = item(4, "soon");
        soon.date = Some(day(5));
        let items = vec![done, undated, late, soon];

        let asc = sorted_items(&items, &mut sort_by(SortCriterion::DueDate), false);
        assert_eq!(titles(&asc), vec!["soon", "late", "undated", "done"]);

        let mut desc = sort_by(SortCriterion::DueDate);
        desc.set_pending(Direction::Desc);
        let desc = sorted_items(&items, &mut desc, false);
        assert_eq!(titles(&desc), vec!["late", "soon", "undated", "done"]);
    }

    #[test]
    fn priority_defaults_high_first_with_completed_last() {
        let mut low = item(1, "low");
        low.priority = Priority::Low;
        let mut high_done = item(2, "high-done");
        high_done.priority = Priority::High;
        high_done.is_complete = true;
        let mut med = item(3, "med");
        med.priority = Priority::Medium;
        let mut high = item(4, "high");
        high.priority = Priority::High;
        let items = vec![low, high_done, med, high];

        let sorted = sorted_items(&items, &mut sort_by(SortCriterion::Priority), false);
        assert_eq!(titles(&sorted), vec!["high", "med", "low", "high-done"]);

        let mut asc = sort_by(SortCriterion::Priority);
        asc.set_pending(Direction::Asc);
        let sorted = sorted_items(&items, &mut asc, false);
        assert_eq!(titles(&sorted), vec!["low", "med", "high", "high-done"]);
    }

    #[test]
    fn override_is_consumed_and_remembered() {
        let items = vec![item(1, "b"), item(2, "a")];
        let mut sort = sort_by(SortCriterion::Alphabetical);
        sort.set_pending(Direction::Desc);
        let first = sorted_items(&items, &mut sort, false);
        assert_eq!(titles(&first), vec!["b", "a"]);
        assert!(sort.pending.is_none());
        let second = sorted_items(&items, &mut sort, false);
        assert_eq!(titles(&second), vec!["b", "a"]);
    }

    #[test]
    fn works_on_borrowed_items() {
        let items = vec![item(1, "b"), item(2, "a")];
        let refs: Vec<&Item> = items.iter().collect();
        let sorted = sorted_items(&refs, &mut sort_by(SortCriterion::Alphabetical), false);
        assert_eq!(sorted[0].title, "a");
    }

    fn arb_items() -> impl Strategy<Value = Vec<Item>> {
        let one = (
            prop::sample::select(vec!["apple", "Apple", "pear", "fig", "kiwi"]),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            prop::option::of(1u32..6),
            0u8..3,
            0u32..4,
        );
        prop::collection::vec(one, 0..8).prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(n, (title, done, star, myday, date, prio, minute))| {
                    let mut it = item(n as u32 + 1, title);
                    it.is_complete = done;
                    it.is_important = star;
                    it.is_my_day = myday;
                    it.date = date.map(day);
                    it.priority = match prio {
                        0 => Priority::Low,
                        1 => Priority::Medium,
                        _ => Priority::High,
                    };
                    it.creation_date = created(minute);
                    it
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn comparators_are_strict_weak_orders(items in arb_items()) {
            for criterion in SortCriterion::ALL {
                for direction in [Direction::Asc, Direction::Desc] {
                    for a in &items {
                        prop_assert_eq!(compare(criterion, direction, a, a), Ordering::Equal);
                        for b in &items {
                            let ab = compare(criterion, direction, a, b);
                            prop_assert_eq!(ab, compare(criterion, direction, b, a).reverse());
                            for c in &items {
                                if ab == Ordering::Less
                                    && compare(criterion, direction, b, c) == Ordering::Less
                                {
                                    prop_assert_eq!(
                                        compare(criterion, direction, a, c),
                                        Ordering::Less
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }

        #[test]
        fn flipping_direction_reverses_unpinned_criteria(items in arb_items(), aggregate in any::<bool>()) {
            for criterion in SortCriterion::ALL.into_iter().filter(|c| !c.pins_completed()) {
                let mut asc = sort_by(criterion);
                asc.set_pending(Direction::Asc);
                let mut desc = sort_by(criterion);
                desc.set_pending(Direction::Desc);

                let up: Vec<ItemId> = sorted_items(&items, &mut asc, aggregate).iter().map(|i| i.id).collect();
                let mut down: Vec<ItemId> = sorted_items(&items, &mut desc, aggregate).iter().map(|i| i.id).collect();
                down.reverse();
                prop_assert_eq!(up, down);
            }
        }

        #[test]
        fn sorting_is_a_permutation(items in arb_items()) {
            for criterion in SortCriterion::ALL {
                let mut ids: Vec<ItemId> = sorted_items(&items, &mut sort_by(criterion), true)
                    .iter()
                    .map(|i| i.id)
                    .collect();
                ids.sort();
                let mut expected: Vec<ItemId> = items.iter().map(|i| i.id).collect();
                expected.sort();
                prop_assert_eq!(ids, expected);
            }
        }
    }
}
