//! Text search over item metadata.
//!
//! The search term reaches this module through the coalescer, so it runs once
//! per pause in typing rather than once per keystroke.

use std::collections::HashSet;
use std::hash::Hash;

/// Searchable text of a registered item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemMeta {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl ItemMeta {
    /// Case-insensitive substring match on title, description or any tag.
    /// `term` must already be lowercased; the empty term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        term.is_empty()
            || self.title.to_lowercase().contains(term)
            || self.description.to_lowercase().contains(term)
            || self.tags.iter().any(|t| t.to_lowercase().contains(term))
    }
}

/// Ids that fail the last applied search term.
#[derive(Debug)]
pub struct SearchState<K> {
    term: String,
    excluded: HashSet<K>,
}

impl<K> Default for SearchState<K> {
    fn default() -> Self {
        Self {
            term: String::new(),
            excluded: HashSet::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> SearchState<K> {
    /// Re-run `term` against every item.  The term is lowercased as typed;
    /// surrounding whitespace is part of it.
    pub fn apply<'a>(&mut self, term: &str, items: impl IntoIterator<Item = (&'a K, &'a ItemMeta)>)
    where
        K: 'a,
    {
        self.term = term.to_lowercase();
        self.excluded = items
            .into_iter()
            .filter(|(_, meta)| !meta.matches(&self.term))
            .map(|(id, _)| id.clone())
            .collect();
    }

    /// Check a newly registered item against the current term.
    pub fn admit(&mut self, id: K, meta: &ItemMeta) {
        if meta.matches(&self.term) {
            self.excluded.remove(&id);
        } else {
            self.excluded.insert(id);
        }
    }

    pub fn forget(&mut self, id: &K) {
        self.excluded.remove(id);
    }

    pub fn matches(&self, id: &K) -> bool {
        !self.excluded.contains(id)
    }

    pub fn term(&self) -> &str {
        &self.term
    }
}
