use anyhow::{bail, Result};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tracing::warn;

/// Identifier of a column.
///
/// `Display` is the stable form written to storage, so it must not change
/// between sessions for the same column.
pub trait ColumnKey: Clone + Eq + Hash + Debug + Display {}

impl<T> ColumnKey for T where T: Clone + Eq + Hash + Debug + Display {}

/// A column a table is able to display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor<K> {
    pub key: K,
    pub header: String,
}

impl<K> ColumnDescriptor<K> {
    pub fn new(key: K, header: impl Into<String>) -> Self {
        Self {
            key,
            header: header.into(),
        }
    }
}

/// A catalog entry matched by a fuzzy search
#[derive(Debug, Clone)]
pub struct CatalogMatch<'a, K> {
    pub column: &'a ColumnDescriptor<K>,
    pub score: i64,
    /// Char positions of the match inside the header, empty when only the
    /// key matched
    pub indices: Vec<usize>,
}

/// The ordered universe of columns for one table
#[derive(Debug, Clone)]
pub struct ColumnCatalog<K> {
    columns: Vec<ColumnDescriptor<K>>,
}

impl<K: ColumnKey> ColumnCatalog<K> {
    /// Build a catalog. Duplicate keys keep their first descriptor.
    pub fn new(columns: Vec<ColumnDescriptor<K>>) -> Result<Self> {
        let mut unique: Vec<ColumnDescriptor<K>> = Vec::with_capacity(columns.len());
        for column in columns {
            if unique.iter().any(|c| c.key == column.key) {
                warn!(target: "column_store", "Duplicate column key '{}' dropped from catalog", column.key);
                continue;
            }
            unique.push(column);
        }

        if unique.is_empty() {
            bail!("A column catalog needs at least one column");
        }

        Ok(Self { columns: unique })
    }

    /// Build a catalog from `(key, header)` pairs
    pub fn from_pairs<I, H>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, H)>,
        H: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(key, header)| ColumnDescriptor::new(key, header))
                .collect(),
        )
    }

    pub fn columns(&self) -> &[ColumnDescriptor<K>] {
        &self.columns
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.columns.iter().map(|c| &c.key)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&ColumnDescriptor<K>> {
        self.columns.iter().find(|c| &c.key == key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Position of a key in catalog order
    pub fn position(&self, key: &K) -> Option<usize> {
        self.columns.iter().position(|c| &c.key == key)
    }

    /// Header for a key, falling back to the key itself
    pub fn header_of(&self, key: &K) -> String {
        self.get(key)
            .map(|c| c.header.clone())
            .unwrap_or_else(|| key.to_string())
    }

    /// Map a stored key string back to the catalog key it was written from
    pub fn resolve_stored(&self, stored: &str) -> Option<&K> {
        self.keys().find(|k| k.to_string() == stored)
    }

    /// Fuzzy search over headers and keys, best match first
    pub fn search(&self, pattern: &str) -> Vec<CatalogMatch<'_, K>> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut matches: Vec<CatalogMatch<'_, K>> = self
            .columns
            .iter()
            .filter_map(|column| {
                let by_header = matcher.fuzzy_indices(&column.header, pattern);
                let by_key = matcher
                    .fuzzy_match(&column.key.to_string(), pattern)
                    .map(|score| (score, Vec::new()));

                let best = match (by_header, by_key) {
                    (Some(h), Some(k)) => {
                        if k.0 > h.0 {
                            k
                        } else {
                            h
                        }
                    }
                    (Some(h), None) => h,
                    (None, Some(k)) => k,
                    (None, None) => return None,
                };

                Some(CatalogMatch {
                    column,
                    score: best.0,
                    indices: best.1,
                })
            })
            .collect();

        // Stable sort keeps catalog order among equal scores
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }

    /// Resolve user input to a key: exact key, then exact header, then the
    /// best fuzzy match
    pub fn resolve(&self, input: &str) -> Option<&K> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Some(key) = self
            .keys()
            .find(|k| k.to_string().eq_ignore_ascii_case(input))
        {
            return Some(key);
        }

        if let Some(column) = self
            .columns
            .iter()
            .find(|c| c.header.eq_ignore_ascii_case(input))
        {
            return Some(&column.key);
        }

        self.search(input).first().map(|m| &m.column.key)
    }
}
