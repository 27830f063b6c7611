// Invariants that must hold for any sequence of column operations

use std::collections::HashSet;
use std::sync::Arc;

use column_customizer::{ColumnCatalog, ColumnCustomizer, MemoryStateStore};

const KEYS: [&str; 6] = ["name", "phone", "email", "stage", "budget", "unknown"];

/// Small deterministic generator so failures are reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as usize
    }
}

fn create_engine() -> ColumnCustomizer<&'static str> {
    let catalog = ColumnCatalog::from_pairs(
        KEYS[..5].iter().map(|k| (*k, k.to_uppercase())),
    )
    .unwrap();
    ColumnCustomizer::builder("invariants")
        .catalog(catalog)
        .storage(Arc::new(MemoryStateStore::new()))
        .build()
        .unwrap()
}

fn assert_invariants(engine: &ColumnCustomizer<&'static str>, step: usize) {
    let state = engine.state();
    assert!(state.visible_count() >= 1, "step {}: no visible column", step);

    let order: HashSet<_> = state.order().iter().collect();
    assert_eq!(order.len(), state.order().len(), "step {}: duplicate in order", step);

    let visible: HashSet<_> = state.visible().iter().collect();
    assert_eq!(visible.len(), state.visible().len(), "step {}: duplicate in visible", step);

    // Derivation covers exactly the visible catalog columns
    assert_eq!(engine.visible_columns().len(), state.visible_count());
    assert_eq!(
        engine.visible_columns().len() + engine.hidden_columns().len(),
        engine.catalog().len()
    );
}

#[test]
fn test_random_sequences_keep_invariants() {
    for seed in 1..=20u64 {
        let mut rng = Lcg(seed);
        let mut engine = create_engine();

        for step in 0..300 {
            let key = KEYS[rng.next() % KEYS.len()];
            let other = KEYS[rng.next() % KEYS.len()];
            match rng.next() % 12 {
                0..=4 => {
                    engine.toggle_column(&key);
                }
                5 => {
                    engine.hide_all_but_one();
                }
                6 => {
                    engine.show_all();
                }
                7 => {
                    engine.move_column_left(&key);
                }
                8 => {
                    engine.move_column_right(&key);
                }
                9 => {
                    engine.begin_drag(&key);
                    engine.hover_target(&other);
                    engine.drop_on(&other);
                }
                10 => {
                    engine.begin_drag(&key);
                    engine.end_drag();
                }
                _ => {
                    engine.reset_to_default();
                }
            }
            assert_invariants(&engine, step);
        }
    }
}

#[test]
fn test_toggling_everything_off_keeps_one() {
    let mut engine = create_engine();
    for key in KEYS {
        engine.toggle_column(&key);
    }
    assert_eq!(engine.state().visible(), &["budget"]);

    for key in KEYS {
        engine.toggle_column(&key);
    }
    assert_eq!(engine.state().visible_count(), 4);
}
