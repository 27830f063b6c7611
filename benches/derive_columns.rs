use column_customizer::columns::derive::derive_columns;
use column_customizer::{ColumnCatalog, ColumnDefaults, ColumnStore};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn create_catalog(columns: usize) -> ColumnCatalog<String> {
    ColumnCatalog::from_pairs((0..columns).map(|i| (format!("col_{}", i), format!("Column {}", i))))
        .unwrap()
}

fn benchmark_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_columns");

    for &size in &[10usize, 100, 500] {
        let catalog = create_catalog(size);
        let keys: Vec<String> = catalog.keys().cloned().collect();

        // Every other column visible, order reversed
        let visible: Vec<String> = keys.iter().step_by(2).cloned().collect();
        let order: Vec<String> = keys.iter().rev().cloned().collect();

        group.bench_function(format!("{}_columns", size), |b| {
            b.iter(|| derive_columns(black_box(&catalog), black_box(&visible), black_box(&order)))
        });
    }

    group.finish();
}

fn benchmark_reorder(c: &mut Criterion) {
    let catalog = create_catalog(100);
    let defaults = ColumnDefaults::all(&catalog);
    let mut store = ColumnStore::new(catalog, Some(defaults), None).unwrap();
    let first = "col_0".to_string();
    let last = "col_99".to_string();

    c.bench_function("move_column_100", |b| {
        b.iter(|| {
            store.move_column(black_box(&first), black_box(&last));
            store.move_column(black_box(&last), black_box(&first));
        })
    });
}

criterion_group!(benches, benchmark_derive, benchmark_reorder);
criterion_main!(benches);
