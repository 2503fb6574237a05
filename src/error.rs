use crate::CollectionKind;
use thiserror::Error;

/// A format spec that cannot be turned into a matcher.
///
/// Compilation is all-or-nothing: no partially usable format is returned.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unterminated brace in directive '%{text}' at byte {position}")]
    UnterminatedBrace { position: usize, text: String },

    #[error("invalid directive '%{text}' at byte {position}")]
    InvalidDirective { position: usize, text: String },

    #[error("directive '%{directive}' produced an invalid pattern: {source}")]
    Pattern {
        directive: String,
        #[source]
        source: regex::Error,
    },

    #[error("capture group '{group}' not found in compiled pattern")]
    UnresolvedGroup { group: String },
}

/// A per-record query that cannot be answered.
///
/// None of these abort processing: the next line or the next field is
/// unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("field {field} is not defined by this format")]
    FieldNotBound { field: String },

    #[error("{kind} '{key}' is not defined by this format")]
    CollectionFieldNotBound { kind: CollectionKind, key: String },

    #[error("field {field} has non-numeric value '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("field {field} has malformed timestamp '{value}'")]
    InvalidTimestamp { field: String, value: String },
}
