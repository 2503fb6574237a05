//! Format dialects.
//!
//! A dialect is the static half of the system: which directives exist, which
//! regex fragment each one expands to, which fields each fragment populates,
//! and how the field-id space is numbered. Two dialects ship with the crate:
//!
//! - [`ncsa`]: the NCSA common log format, a small fixed field set.
//! - [`apache`]: Apache httpd `LogFormat`, built by overlaying its own
//!   directives on top of the NCSA tables and continuing the id numbering.
//!
//! ```text
//! ncsa tables ──copy──► + apache overlay ──► apache tables
//!   (ids 0..15)            (ids 15..33)       (ids 0..33)
//! ```
//!
//! Tables are built once on first use and never mutated afterwards.
//!
//! ## Directive dispatch
//!
//! Every directive in a format spec is classified into a [`DirectiveKind`] by
//! [`Dialect::classify`], and every later decision (which fragment, which
//! bindings) is made from that one value.

pub mod apache;
pub mod ncsa;

#[cfg(test)]
mod tests;

use crate::{CollectionKind, CollectionSet, CompileError, CompiledFormat, FieldId, Options, Target};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;

static NCSA: Lazy<Dialect> = Lazy::new(ncsa::build);
static APACHE: Lazy<Dialect> = Lazy::new(|| apache::build(&NCSA));

/// Delimiter that introduces a directive in a format spec.
pub(crate) const DELIMITER: char = '%';

/// One static entry of a directive table.
#[derive(Debug, Clone)]
pub(crate) struct Directive {
    pub text: &'static str,
    pub pattern: &'static str,
    /// `(group name, field)` pairs; every group must appear in `pattern`.
    pub bindings: Vec<(&'static str, FieldId)>,
    /// Braced directive that is both a first-class field and a collection entry.
    pub exceptional: bool,
}

/// Classification of one directive token.
#[derive(Debug, Clone, Copy)]
pub(crate) enum DirectiveKind<'d, 't> {
    /// Statically known directive.
    Fixed(&'d Directive),
    /// Static directive that is also registered in a collection under `key`.
    Exceptional(&'d Directive, CollectionKind, &'t str),
    /// Parameterized directive with a synthesized capture group.
    Collection(CollectionKind, &'t str),
    /// Not known to the dialect; captured with the caller's default pattern.
    Unknown,
}

/// Fragment and symbolic bindings for one directive occurrence.
#[derive(Debug, Clone)]
pub(crate) struct Resolved<'d> {
    pub pattern: Cow<'d, str>,
    pub bindings: Vec<(Cow<'d, str>, Target)>,
    pub fallback: bool,
}

/// Additions applied on top of a base dialect.
pub(crate) struct Overlay {
    pub name: &'static str,
    pub grammar: &'static Regex,
    pub directives: Vec<Directive>,
    pub field_names: &'static [&'static str],
    pub collections: CollectionSet,
    pub presets: &'static [(&'static str, &'static str)],
}

/// A named, immutable set of directives, fragments and field ids.
#[derive(Debug)]
pub struct Dialect {
    name: &'static str,
    grammar: &'static Regex,
    directives: HashMap<&'static str, Directive>,
    field_names: Vec<&'static str>,
    collections: CollectionSet,
    presets: &'static [(&'static str, &'static str)],
    default_spec: &'static str,
}

impl Dialect {
    /// The NCSA common-log dialect.
    pub fn ncsa() -> &'static Dialect {
        &NCSA
    }

    /// The Apache httpd dialect (NCSA plus extensions).
    pub fn apache() -> &'static Dialect {
        &APACHE
    }

    /// Look a dialect up by name (`"ncsa"` or `"apache"`).
    pub fn by_name(name: &str) -> Option<&'static Dialect> {
        match name {
            "ncsa" => Some(Dialect::ncsa()),
            "apache" => Some(Dialect::apache()),
            _ => None,
        }
    }

    /// Compile `spec` (or a preset name) in this dialect with default options.
    pub fn compile(&'static self, spec: &str) -> Result<CompiledFormat, CompileError> {
        crate::compile_with(spec, &Options::for_dialect(self))
    }

    pub(crate) fn new(
        name: &'static str,
        grammar: &'static Regex,
        directives: Vec<Directive>,
        field_names: &'static [&'static str],
        default_spec: &'static str,
    ) -> Self {
        let directives = directives.into_iter().map(|d| (d.text, d)).collect();
        Dialect {
            name,
            grammar,
            directives,
            field_names: field_names.to_vec(),
            collections: CollectionSet::empty(),
            presets: &[],
            default_spec,
        }
    }

    /// Build a derived dialect: copy this dialect's tables and lay `overlay`
    /// on top. Base entries not overridden stay visible; new field names are
    /// appended so numbering continues after the base.
    pub(crate) fn overlay(&self, overlay: Overlay) -> Dialect {
        let mut directives = self.directives.clone();
        for directive in overlay.directives {
            debug_assert!(
                !self.directives.contains_key(directive.text),
                "overlay must not redefine base directive '{}'",
                directive.text
            );
            directives.insert(directive.text, directive);
        }

        let mut field_names = self.field_names.clone();
        field_names.extend_from_slice(overlay.field_names);

        Dialect {
            name: overlay.name,
            grammar: overlay.grammar,
            directives,
            field_names,
            collections: self.collections | overlay.collections,
            presets: overlay.presets,
            default_spec: self.default_spec,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of field ids in this dialect's numbering space.
    pub fn field_count(&self) -> usize {
        self.field_names.len()
    }

    /// Semantic name of `id`, or `None` when the id is outside this dialect.
    pub fn field_name(&self, id: FieldId) -> Option<&'static str> {
        self.field_names.get(id.index()).copied()
    }

    /// Look a field up by its semantic name.
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.field_names.iter().position(|n| *n == name).map(FieldId)
    }

    /// Collection families accepted in braced directives.
    pub fn collections(&self) -> CollectionSet {
        self.collections
    }

    /// Format spec used when the caller has none.
    pub fn default_spec(&self) -> &'static str {
        self.default_spec
    }

    /// Directive texts known to this dialect, sorted.
    pub fn directives(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.directives.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Named preset specs, e.g. `("common", "%h %l %u %t \"%r\" %>s %b")`.
    pub fn presets(&self) -> &'static [(&'static str, &'static str)] {
        self.presets
    }

    pub fn preset(&self, name: &str) -> Option<&'static str> {
        self.presets.iter().find(|(n, _)| *n == name).map(|(_, spec)| *spec)
    }

    /// Expand a preset name; anything else is returned as a literal spec.
    pub fn resolve_spec<'s>(&self, spec: &'s str) -> &'s str {
        self.preset(spec).unwrap_or(spec)
    }

    /// Fragment `directive` expands to: the table entry, a generated group for
    /// a collection directive, or `default` when the dialect does not know it.
    pub fn pattern<'a>(&'a self, directive: &str, default: &'a str) -> Cow<'a, str> {
        self.resolve(directive, default).pattern
    }

    /// Static `(group, field)` bindings of `directive`; empty when unknown.
    pub fn bindings(&self, directive: &str) -> &[(&'static str, FieldId)] {
        self.directives.get(directive).map(|d| d.bindings.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn grammar(&self) -> &'static Regex {
        self.grammar
    }

    /// Classify one directive token.
    pub(crate) fn classify<'d, 't>(&'d self, directive: &'t str) -> DirectiveKind<'d, 't> {
        let Some((key, suffix)) = split_braced(directive) else {
            return match self.directives.get(directive) {
                Some(fixed) => DirectiveKind::Fixed(fixed),
                None => DirectiveKind::Unknown,
            };
        };

        let kind = CollectionKind::from_suffix(suffix).filter(|k| self.collections.contains(k.flag()));
        match (self.directives.get(directive), kind) {
            (Some(entry), Some(kind)) if entry.exceptional => DirectiveKind::Exceptional(entry, kind, key),
            (Some(entry), _) => DirectiveKind::Fixed(entry),
            (None, Some(kind)) => DirectiveKind::Collection(kind, key),
            (None, None) => DirectiveKind::Unknown,
        }
    }

    /// Resolve a directive to its fragment and symbolic bindings.
    ///
    /// This is the single dispatch point used by the format compiler.
    pub(crate) fn resolve<'d>(&'d self, directive: &str, default: &'d str) -> Resolved<'d> {
        match self.classify(directive) {
            DirectiveKind::Fixed(entry) => Resolved {
                pattern: Cow::Borrowed(entry.pattern),
                bindings: static_bindings(entry),
                fallback: false,
            },
            DirectiveKind::Exceptional(entry, kind, key) => {
                let mut bindings = static_bindings(entry);
                bindings.push((Cow::Owned(collection_group_name(directive)), Target::Collection(kind, key.to_string())));
                Resolved { pattern: Cow::Borrowed(entry.pattern), bindings, fallback: false }
            }
            DirectiveKind::Collection(kind, key) => {
                let group = collection_group_name(directive);
                Resolved {
                    pattern: Cow::Owned(format!("(?P<{group}>.*)")),
                    bindings: vec![(Cow::Owned(group), Target::Collection(kind, key.to_string()))],
                    fallback: false,
                }
            }
            DirectiveKind::Unknown => Resolved { pattern: Cow::Borrowed(default), bindings: Vec::new(), fallback: true },
        }
    }
}

fn static_bindings(entry: &Directive) -> Vec<(Cow<'_, str>, Target)> {
    entry.bindings.iter().map(|(group, id)| (Cow::Borrowed(*group), Target::Field(*id))).collect()
}

/// Split `{key}x` into `("key", 'x')`.
pub(crate) fn split_braced(directive: &str) -> Option<(&str, char)> {
    let rest = directive.strip_prefix('{')?;
    let close = rest.find('}')?;
    let key = &rest[..close];
    let mut tail = rest[close + 1..].chars();
    let suffix = tail.next()?;
    if key.is_empty() || tail.next().is_some() {
        return None;
    }
    Some((key, suffix))
}

/// Deterministic capture-group name for a braced directive:
/// `{User-agent}i` → `_User_agent_i`.
pub(crate) fn collection_group_name(directive: &str) -> String {
    directive.chars().map(|c| if matches!(c, '-' | '{' | '}') { '_' } else { c }).collect()
}
