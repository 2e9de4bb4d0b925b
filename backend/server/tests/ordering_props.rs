use featured::{
    models::FeaturedEntry,
    ordering::{plan_add, plan_delete, plan_reorder, plan_reposition},
};
use proptest::prelude::*;

const MAX_FEATURED: usize = 8;

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Delete(usize),
    Reposition(usize, f64),
    Reorder(Vec<u32>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..12).prop_map(Op::Add),
        (0usize..10).prop_map(Op::Delete),
        (0usize..10, -3.0f64..12.0).prop_map(|(i, p)| Op::Reposition(i, p)),
        prop::collection::vec(0u32..100, 10).prop_map(Op::Reorder),
    ]
}

fn assert_contiguous(entries: &[FeaturedEntry]) {
    let mut positions: Vec<u32> = entries.iter().map(|e| e.position).collect();
    positions.sort_unstable();
    let expected: Vec<u32> = (1..=entries.len() as u32).collect();
    assert_eq!(positions, expected);

    let mut categories: Vec<&str> = entries.iter().map(|e| e.category_id.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();
    assert_eq!(categories.len(), entries.len());

    assert!(entries.len() <= MAX_FEATURED);
}

fn step(entries: &[FeaturedEntry], op: &Op, next_id: &mut u32) -> Option<Vec<FeaturedEntry>> {
    let plan = match op {
        Op::Add(category) => {
            *next_id += 1;
            plan_add(entries, &format!("e{next_id}"), &format!("c{category}"), MAX_FEATURED)
                .ok()?
                .0
        }
        Op::Delete(i) => plan_delete(entries, &entries.get(*i)?.id).ok()?.0,
        Op::Reposition(i, position) => plan_reposition(entries, &entries.get(*i)?.id, *position).ok()?,
        Op::Reorder(keys) => {
            // Supplies every entry, ranked by a random key, as the admin UI does after a drag
            let mut ranked: Vec<_> = entries.iter().zip(keys).collect();
            ranked.sort_by_key(|(_, key)| **key);
            let updates: Vec<(String, u32)> = ranked
                .into_iter()
                .zip(1..)
                .map(|((entry, _), order)| (entry.id.clone(), order))
                .collect();
            plan_reorder(entries, &updates).ok()?
        }
    };

    Some(plan.apply(entries))
}

proptest! {
    #[test]
    fn prop_positions_stay_contiguous(ops in prop::collection::vec(op(), 1..40)) {
        let mut entries: Vec<FeaturedEntry> = Vec::new();
        let mut next_id = 0;

        for op in &ops {
            if let Some(next) = step(&entries, op, &mut next_id) {
                assert_contiguous(&next);
                entries = next;
            }
        }
    }

    #[test]
    fn prop_reposition_keeps_relative_order(len in 1u32..=8, from in 0usize..8, to in -2.0f64..10.0) {
        let entries: Vec<FeaturedEntry> = (1..=len)
            .map(|p| FeaturedEntry { id: format!("e{p}"), category_id: format!("c{p}"), position: p })
            .collect();
        let from = from % entries.len();
        let moved = entries[from].id.clone();

        let after = plan_reposition(&entries, &moved, to).unwrap().apply(&entries);

        let before_rest: Vec<_> = entries.iter().filter(|e| e.id != moved).map(|e| &e.id).collect();
        let after_rest: Vec<_> = after.iter().filter(|e| e.id != moved).map(|e| &e.id).collect();
        prop_assert_eq!(before_rest, after_rest);
        assert_contiguous(&after);
    }
}
