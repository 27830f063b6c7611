use std::collections::HashMap;

use crate::columns::catalog::{ColumnCatalog, ColumnDescriptor, ColumnKey};

/// Project the visible set onto display order.
///
/// Visible keys are stable sorted by their index in `order`. Keys missing
/// from `order` come after every ordered key and keep their relative order
/// in `visible`. Keys the catalog does not know are dropped.
pub fn derive_columns<'a, K: ColumnKey>(
    catalog: &'a ColumnCatalog<K>,
    visible: &[K],
    order: &[K],
) -> Vec<&'a ColumnDescriptor<K>> {
    let mut rank: HashMap<&K, usize> = HashMap::with_capacity(order.len());
    for (idx, key) in order.iter().enumerate() {
        rank.entry(key).or_insert(idx);
    }

    let mut ranked: Vec<(usize, &K)> = visible
        .iter()
        .map(|key| (rank.get(key).copied().unwrap_or(usize::MAX), key))
        .collect();
    ranked.sort_by_key(|(r, _)| *r);

    ranked
        .into_iter()
        .filter_map(|(_, key)| catalog.get(key))
        .collect()
}

/// Render rows through the derived columns, one cell per column
pub fn project_rows<K, R, C, F>(columns: &[&ColumnDescriptor<K>], rows: &[R], cell: F) -> Vec<Vec<C>>
where
    F: Fn(&R, usize, &ColumnDescriptor<K>) -> C,
{
    rows.iter()
        .enumerate()
        .map(|(row_idx, row)| {
            columns
                .iter()
                .map(|column| cell(row, row_idx, column))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ColumnCatalog<&'static str> {
        ColumnCatalog::from_pairs(vec![("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")]).unwrap()
    }

    fn headers(columns: &[&ColumnDescriptor<&'static str>]) -> Vec<String> {
        columns.iter().map(|c| c.header.clone()).collect()
    }

    #[test]
    fn test_follows_order() {
        let catalog = catalog();
        let columns = derive_columns(&catalog, &["a", "b", "c"], &["c", "a", "b"]);
        assert_eq!(headers(&columns), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_unordered_keys_trail_in_visible_order() {
        let catalog = catalog();
        let columns = derive_columns(&catalog, &["d", "b", "a"], &["a"]);
        assert_eq!(headers(&columns), vec!["A", "D", "B"]);
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let catalog = catalog();
        let columns = derive_columns(&catalog, &["z", "b"], &["z", "b"]);
        assert_eq!(headers(&columns), vec!["B"]);
    }

    #[test]
    fn test_hidden_keys_in_order_are_ignored() {
        let catalog = catalog();
        let columns = derive_columns(&catalog, &["c"], &["a", "b", "c", "d"]);
        assert_eq!(headers(&columns), vec!["C"]);
    }

    #[test]
    fn test_project_rows() {
        let catalog = catalog();
        let columns = derive_columns(&catalog, &["b", "a"], &["b", "a"]);
        let rows = vec![(1, 2), (3, 4)];
        let cells = project_rows(&columns, &rows, |row, idx, column| match column.key {
            "a" => format!("{}:{}", idx, row.0),
            _ => format!("{}:{}", idx, row.1),
        });
        assert_eq!(cells, vec![vec!["0:2", "0:1"], vec!["1:4", "1:3"]]);
    }
}
