extern crate self as accesslog;

#[macro_use]
mod macros;
mod api;
mod dialects;
mod engine;
mod error;
mod record;

pub use api::{DEFAULT_FALLBACK_PATTERN, Options, compile, compile_with};
pub use dialects::{Dialect, apache, ncsa};
pub use engine::{CompiledFormat, Diagnostic, DiagnosticSink, MatchResult, NoopSink, TracingSink};
pub use error::{CompileError, RecordError};
pub use record::Record;

// --- Field identifiers -------------------------------------------------------

/// Dialect-wide numeric field identifier.
///
/// Ids are dense: a dialect numbers its fields `0..NUM_FIELDS`, and a derived
/// dialect continues after its base, so a base id means the same thing in
/// every dialect built on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(pub(crate) usize);

impl FieldId {
    /// Position of this field in a format's slot table.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// --- Collection families -----------------------------------------------------

/// Open-ended directive families addressed by a secondary key, e.g.
/// `%{Referer}i` is the `Referer` entry of [`CollectionKind::InputHeader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// `%{Name}i`
    InputHeader,
    /// `%{Name}o`
    OutputHeader,
    /// `%{Name}e`
    Environment,
    /// `%{Name}C`
    Cookie,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 4] =
        [CollectionKind::InputHeader, CollectionKind::OutputHeader, CollectionKind::Environment, CollectionKind::Cookie];

    /// Map a braced directive's suffix letter to its family.
    pub fn from_suffix(suffix: char) -> Option<Self> {
        match suffix {
            'i' => Some(CollectionKind::InputHeader),
            'o' => Some(CollectionKind::OutputHeader),
            'e' => Some(CollectionKind::Environment),
            'C' => Some(CollectionKind::Cookie),
            _ => None,
        }
    }

    pub fn suffix(self) -> char {
        match self {
            CollectionKind::InputHeader => 'i',
            CollectionKind::OutputHeader => 'o',
            CollectionKind::Environment => 'e',
            CollectionKind::Cookie => 'C',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::InputHeader => "input header",
            CollectionKind::OutputHeader => "output header",
            CollectionKind::Environment => "environment variable",
            CollectionKind::Cookie => "cookie",
        }
    }

    pub(crate) fn flag(self) -> CollectionSet {
        match self {
            CollectionKind::InputHeader => CollectionSet::INPUT_HEADER,
            CollectionKind::OutputHeader => CollectionSet::OUTPUT_HEADER,
            CollectionKind::Environment => CollectionSet::ENVIRONMENT,
            CollectionKind::Cookie => CollectionSet::COOKIE,
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            CollectionKind::InputHeader => 0,
            CollectionKind::OutputHeader => 1,
            CollectionKind::Environment => 2,
            CollectionKind::Cookie => 3,
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// Set of collection families.
    ///
    /// A dialect declares which families its braced directives may name; a
    /// compiled format reports which families it actually registered keys for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollectionSet: u8 {
        const INPUT_HEADER  = 1 << 0;
        const OUTPUT_HEADER = 1 << 1;
        const ENVIRONMENT   = 1 << 2;
        const COOKIE        = 1 << 3;
    }
}

// --- Binding targets ---------------------------------------------------------

/// Where a named capture group ends up once the format is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Target {
    Field(FieldId),
    Collection(CollectionKind, String),
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Field(id) => write!(f, "field {id}"),
            Target::Collection(kind, key) => write!(f, "{kind} '{key}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_suffixes_round_trip() {
        for kind in CollectionKind::ALL {
            assert_eq!(CollectionKind::from_suffix(kind.suffix()), Some(kind));
        }
        // Lowercase `c` is not the cookie suffix.
        assert_eq!(CollectionKind::from_suffix('c'), None);
        assert_eq!(CollectionKind::from_suffix('x'), None);
    }

    #[test]
    fn collection_flags_are_distinct() {
        let all = CollectionKind::ALL.iter().fold(CollectionSet::empty(), |acc, k| acc | k.flag());
        assert_eq!(all, CollectionSet::all());
    }
}
