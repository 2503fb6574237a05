//! Format compilation engine.
//!
//! Turning a format spec into a matcher is a two-phase pipeline:
//!
//! ```text
//! "%h %l %u %t \"%r\" %>s %b"
//!        │
//!        │  tokenize                      (tokenizer.rs)
//!        v
//! [Directive("h"), Literal(" "), ...]
//!        │
//!        │  phase 1: FormatBuilder::push_* (builder.rs)
//!        │    - Dialect::resolve → fragment + symbolic bindings
//!        │    - escape literals, rename repeated groups
//!        v
//! pattern string + Vec<PendingBinding>
//!        │
//!        │  phase 2: FormatBuilder::finish
//!        │    - compile the regex once
//!        │    - group name → capture index
//!        v
//! CompiledFormat                          (compiled_format.rs)
//!   field id → capture index
//!   collection key → capture index
//! ```
//!
//! After phase 2 nothing is mutable: a `CompiledFormat` can be shared across
//! threads and every line costs one regex evaluation plus O(1) slot reads.
//!
//! ## Debugging
//!
//! Pass a [`DiagnosticSink`] through [`crate::Options`] to observe bindings,
//! fallbacks and the final pattern. [`TracingSink`] forwards them to
//! `tracing`.

#[path = "engine/builder.rs"]
mod builder;
#[path = "engine/compiled_format.rs"]
mod compiled_format;
#[path = "engine/diagnostics.rs"]
mod diagnostics;
#[path = "engine/tokenizer.rs"]
mod tokenizer;

pub use compiled_format::{CompiledFormat, MatchResult};
pub use diagnostics::{Diagnostic, DiagnosticSink, NoopSink, TracingSink};

use crate::{CompileError, Dialect};
use builder::FormatBuilder;
use tokenizer::Token;

/// Compile `spec` against `dialect`.
///
/// `fallback` is the fragment used for directives the dialect does not know.
pub(crate) fn compile_format(
    dialect: &'static Dialect,
    spec: &str,
    fallback: &str,
    sink: &dyn DiagnosticSink,
) -> Result<CompiledFormat, CompileError> {
    let tokens = tokenizer::tokenize(spec, dialect.grammar())?;
    let mut builder = FormatBuilder::new(dialect, fallback, sink);
    for token in tokens {
        match token {
            Token::Literal(text) => builder.push_literal(text),
            Token::Directive { text, .. } => builder.push_directive(text),
        }
    }
    builder.finish(spec)
}
