//! Two-phase format builder.
//!
//! Phase 1 (`push_literal` / `push_directive`) appends to the pattern string
//! and records every binding symbolically, by group name. Phase 2 (`finish`)
//! compiles the pattern once and resolves each group name to the capture
//! index the regex assigned it.
//!
//! ## Conflict policy
//!
//! Bindings are resolved in registration order, so when two directives bind
//! the same field id or collection key the later directive wins. A regex may
//! not define a group name twice; when a directive would repeat a name already
//! emitted (e.g. `%h ... %h`), every group of the later fragment gets a
//! `__<n>` suffix and its bindings follow the new names.

use super::compiled_format::{CollectionSlots, CompiledFormat};
use super::diagnostics::{Diagnostic, DiagnosticSink};
use crate::{CompileError, Dialect, Target};
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};

/// A binding registered in phase 1, resolved in phase 2.
#[derive(Debug, Clone)]
struct PendingBinding {
    group: String,
    target: Target,
}

pub(crate) struct FormatBuilder<'a> {
    dialect: &'static Dialect,
    fallback: &'a str,
    sink: &'a dyn DiagnosticSink,
    pattern: String,
    /// `(directive, fragment)` in spec order, kept to locate compile errors.
    fragments: Vec<(String, String)>,
    pending: Vec<PendingBinding>,
    groups: HashSet<String>,
    renames: usize,
}

impl<'a> FormatBuilder<'a> {
    pub(crate) fn new(dialect: &'static Dialect, fallback: &'a str, sink: &'a dyn DiagnosticSink) -> Self {
        FormatBuilder {
            dialect,
            fallback,
            sink,
            pattern: String::from("^"),
            fragments: Vec::new(),
            pending: Vec::new(),
            groups: HashSet::new(),
            renames: 0,
        }
    }

    pub(crate) fn push_literal(&mut self, text: &str) {
        self.pattern.push_str(&regex::escape(text));
    }

    pub(crate) fn push_directive(&mut self, directive: &str) {
        let resolved = self.dialect.resolve(directive, self.fallback);
        if resolved.fallback {
            self.sink.record(&Diagnostic::Fallback { directive, pattern: &resolved.pattern });
        }

        let renamed = self.rename_repeated_groups(directive, &resolved.pattern);
        let fragment = match &renamed {
            Some((fragment, _)) => fragment.as_str(),
            None => resolved.pattern.as_ref(),
        };
        for name in group_names(fragment) {
            self.groups.insert(name.to_string());
        }
        self.pattern.push_str(fragment);
        self.fragments.push((directive.to_string(), fragment.to_string()));

        for (group, target) in resolved.bindings {
            let group = match &renamed {
                Some((_, map)) => map.get(&*group).cloned().unwrap_or_else(|| group.into_owned()),
                None => group.into_owned(),
            };
            self.sink.record(&Diagnostic::Binding { directive, group: &group, target: target.to_string() });
            self.pending.push(PendingBinding { group, target });
        }
    }

    /// When `fragment` reuses a group name already in the pattern, return the
    /// fragment with all of its groups suffixed plus the old → new name map.
    fn rename_repeated_groups(
        &mut self,
        directive: &str,
        fragment: &str,
    ) -> Option<(String, HashMap<String, String>)> {
        if !group_names(fragment).any(|name| self.groups.contains(name)) {
            return None;
        }

        let suffix = loop {
            self.renames += 1;
            let candidate = format!("__{}", self.renames);
            if !group_names(fragment).any(|name| self.groups.contains(&format!("{name}{candidate}"))) {
                break candidate;
            }
        };

        let mut map = HashMap::new();
        let rewritten = group_name_re()
            .replace_all(fragment, |caps: &Captures<'_>| {
                let from = &caps[2];
                let to = format!("{from}{suffix}");
                self.sink.record(&Diagnostic::GroupRenamed { directive, from, to: &to });
                let out = format!("{}{to}>", &caps[1]);
                map.insert(from.to_string(), to);
                out
            })
            .into_owned();
        Some((rewritten, map))
    }

    /// Phase 2: compile the pattern and freeze the slot tables.
    pub(crate) fn finish(self, spec: &str) -> Result<CompiledFormat, CompileError> {
        let regex = Regex::new(&self.pattern).map_err(|source| self.locate_error(source))?;

        let index: HashMap<&str, usize> =
            regex.capture_names().enumerate().filter_map(|(idx, name)| name.map(|n| (n, idx))).collect();

        let mut slots = vec![None; self.dialect.field_count()];
        let mut collections = CollectionSlots::default();
        for binding in &self.pending {
            let idx = *index
                .get(binding.group.as_str())
                .ok_or_else(|| CompileError::UnresolvedGroup { group: binding.group.clone() })?;
            match &binding.target {
                Target::Field(id) => {
                    if let Some(slot) = slots.get_mut(id.index()) {
                        *slot = Some(idx);
                    }
                }
                Target::Collection(kind, key) => collections.insert(*kind, key.clone(), idx),
            }
        }

        self.sink.record(&Diagnostic::Compiled { spec, pattern: regex.as_str(), groups: regex.captures_len() });
        Ok(CompiledFormat::new(spec.to_string(), regex, self.dialect, slots, collections))
    }

    /// Name the directive whose fragment broke the pattern. Falls back to the
    /// whole spec when every fragment compiles on its own.
    fn locate_error(&self, source: regex::Error) -> CompileError {
        for (directive, fragment) in &self.fragments {
            if let Err(source) = Regex::new(fragment) {
                return CompileError::Pattern { directive: directive.clone(), source };
            }
        }
        let directive = self.fragments.last().map(|(d, _)| d.clone()).unwrap_or_default();
        CompileError::Pattern { directive, source }
    }
}

fn group_name_re() -> &'static Regex {
    regex!(r"(\(\?P?<)([A-Za-z_][A-Za-z0-9_.\[\]]*)>")
}

fn group_names(fragment: &str) -> impl Iterator<Item = &str> {
    group_name_re().captures_iter(fragment).filter_map(|caps| caps.get(2)).map(|m| m.as_str())
}
