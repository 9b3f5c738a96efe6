//! Lazily fetched server catalogs.

use crate::model::{Database, MatchingStrategy};

/// A server-advertised list that is fetched at most once per session.
///
/// Only a complete listing is ever stored, so callers either see nothing or
/// the full snapshot. A server that advertises zero entries still counts as
/// loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum Catalog<T> {
    #[default]
    NotLoaded,
    Loaded(Vec<T>),
}

impl<T: Named> Catalog<T> {
    pub(crate) const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub(crate) fn entries(&self) -> &[T] {
        match self {
            Self::Loaded(entries) => entries,
            Self::NotLoaded => &[],
        }
    }

    pub(crate) fn find(&self, name: &str) -> Option<&T> {
        self.entries().iter().find(|entry| entry.name() == name)
    }

    /// Builds a loaded catalog keyed by name, keeping first-seen order.
    ///
    /// A repeated name replaces the earlier entry in place.
    pub(crate) fn from_entries(entries: impl IntoIterator<Item = T>) -> Self {
        let mut unique: Vec<T> = Vec::new();
        for entry in entries {
            match unique
                .iter_mut()
                .find(|existing| existing.name() == entry.name())
            {
                Some(existing) => *existing = entry,
                None => unique.push(entry),
            }
        }
        Self::Loaded(unique)
    }
}

/// Catalog entries are keyed by their wire name.
pub(crate) trait Named {
    fn name(&self) -> &str;
}

impl Named for Database {
    fn name(&self) -> &str {
        Self::name(self)
    }
}

impl Named for MatchingStrategy {
    fn name(&self) -> &str {
        Self::name(self)
    }
}
