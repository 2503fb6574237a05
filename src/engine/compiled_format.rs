//! The frozen result of format compilation.
//!
//! ## Invariants
//!
//! - `slots` has exactly `dialect.field_count()` entries, indexed by
//!   `FieldId::index()`. `None` means the spec never referenced the field.
//! - Every `Some(index)` in `slots` or `collections` is a capture index of
//!   `regex`, and is meaningless against any other pattern.

use crate::{CollectionKind, CollectionSet, Dialect, FieldId};
use regex::{CaptureLocations, Regex};
use std::collections::HashMap;

/// Secondary-key → capture-index tables, one per [`CollectionKind`].
#[derive(Debug, Clone, Default)]
pub(crate) struct CollectionSlots {
    by_kind: [HashMap<String, usize>; 4],
}

impl CollectionSlots {
    pub(crate) fn insert(&mut self, kind: CollectionKind, key: String, index: usize) {
        self.by_kind[kind.slot()].insert(key, index);
    }

    fn get(&self, kind: CollectionKind, key: &str) -> Option<usize> {
        self.by_kind[kind.slot()].get(key).copied()
    }

    fn keys(&self, kind: CollectionKind) -> impl Iterator<Item = &str> {
        self.by_kind[kind.slot()].keys().map(String::as_str)
    }

    fn used(&self) -> CollectionSet {
        CollectionKind::ALL
            .into_iter()
            .filter(|k| !self.by_kind[k.slot()].is_empty())
            .fold(CollectionSet::empty(), |acc, k| acc | k.flag())
    }
}

/// A compiled format spec: one regex plus the field and collection slot tables
/// resolved against it.
#[derive(Debug, Clone)]
pub struct CompiledFormat {
    spec: String,
    pattern: String,
    regex: Regex,
    dialect: &'static Dialect,
    slots: Vec<Option<usize>>,
    collections: CollectionSlots,
}

/// Capture spans of one matched line.
#[derive(Debug, Clone)]
pub struct MatchResult {
    locations: CaptureLocations,
}

impl MatchResult {
    /// Byte span of capture `index`, or `None` when that group did not
    /// participate in the match.
    pub fn get(&self, index: usize) -> Option<(usize, usize)> {
        self.locations.get(index)
    }

    /// Number of capture groups, including the implicit whole-match group.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.len() == 0
    }
}

impl CompiledFormat {
    pub(crate) fn new(
        spec: String,
        regex: Regex,
        dialect: &'static Dialect,
        slots: Vec<Option<usize>>,
        collections: CollectionSlots,
    ) -> Self {
        CompiledFormat { spec, pattern: regex.as_str().to_string(), regex, dialect, slots, collections }
    }

    /// The spec this format was compiled from, after preset expansion.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// The generated regular expression.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    /// Match one complete line. The pattern is anchored at the start of the
    /// line; trailing text after the last directive is ignored.
    pub fn match_line(&self, line: &str) -> Option<MatchResult> {
        let mut locations = self.regex.capture_locations();
        self.regex.captures_read(&mut locations, line)?;
        Some(MatchResult { locations })
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Capture index bound to `id`, if the spec referenced that field.
    pub fn slot(&self, id: FieldId) -> Option<usize> {
        self.slots.get(id.index()).copied().flatten()
    }

    pub fn has_field(&self, id: FieldId) -> bool {
        self.slot(id).is_some()
    }

    /// Field ids bound by this format, in id order.
    pub fn bound_fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.slots.iter().enumerate().filter(|(_, slot)| slot.is_some()).map(|(idx, _)| FieldId(idx))
    }

    /// Semantic name of `id` in this format's dialect; `#n` when out of range.
    pub fn field_name(&self, id: FieldId) -> String {
        self.dialect.field_name(id).map(str::to_string).unwrap_or_else(|| id.to_string())
    }

    /// Capture index registered for `key` in collection `kind`.
    pub fn collection_slot(&self, kind: CollectionKind, key: &str) -> Option<usize> {
        self.collections.get(kind, key)
    }

    pub fn has_collection_field(&self, kind: CollectionKind, key: &str) -> bool {
        self.collection_slot(kind, key).is_some()
    }

    /// Keys registered for collection `kind`, sorted.
    pub fn collection_keys(&self, kind: CollectionKind) -> Vec<&str> {
        let mut keys: Vec<&str> = self.collections.keys(kind).collect();
        keys.sort_unstable();
        keys
    }

    /// Collection families this format registered at least one key for.
    pub fn collections_used(&self) -> CollectionSet {
        self.collections.used()
    }
}

#[cfg(test)]
mod tests {
    use crate::{CollectionKind, CollectionSet, Dialect, apache, ncsa};

    #[test]
    fn slots_follow_the_dialect_numbering() {
        let format = Dialect::ncsa().compile("%h %>s").unwrap();
        assert!(format.has_field(ncsa::REMOTE_HOST));
        assert!(format.has_field(ncsa::STATUS));
        assert!(!format.has_field(ncsa::NUMBYTES));
        // Ids outside the dialect are simply unbound.
        assert!(!format.has_field(apache::REFERER));
        assert_eq!(format.bound_fields().collect::<Vec<_>>(), vec![ncsa::REMOTE_HOST, ncsa::STATUS]);
    }

    #[test]
    fn match_result_reports_spans() {
        let format = Dialect::ncsa().compile("%h %b").unwrap();
        let m = format.match_line("10.0.0.1 512").unwrap();
        let slot = format.slot(ncsa::NUMBYTES).unwrap();
        assert_eq!(m.get(slot), Some((9, 12)));
        assert_eq!(m.len(), 3);
        assert!(format.match_line("").is_none());
    }

    #[test]
    fn collection_tables_are_per_format() {
        let format = Dialect::apache().compile("%{X-Trace}i %{sid}C %{PATH}e").unwrap();
        assert_eq!(format.collection_keys(CollectionKind::InputHeader), vec!["X-Trace"]);
        assert!(format.has_collection_field(CollectionKind::Cookie, "sid"));
        assert!(!format.has_collection_field(CollectionKind::InputHeader, "sid"));
        assert_eq!(
            format.collections_used(),
            CollectionSet::INPUT_HEADER | CollectionSet::COOKIE | CollectionSet::ENVIRONMENT
        );
    }

    #[test]
    fn compiled_format_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<crate::CompiledFormat>();
    }
}
