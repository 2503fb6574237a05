use crate::engine::{self, CompiledFormat, DiagnosticSink, NoopSink};
use crate::{CompileError, Dialect};
use std::sync::Arc;

/// Fragment used for directives the dialect does not know: capture
/// something, bind nothing.
pub const DEFAULT_FALLBACK_PATTERN: &str = "(.*)";

/// Options that affect format compilation.
#[derive(Clone)]
pub struct Options {
    /// Dialect the spec is written in.
    pub dialect: &'static Dialect,
    /// Fragment substituted for unknown directives.
    pub fallback_pattern: String,
    /// Receiver for compile-time diagnostics.
    pub sink: Arc<dyn DiagnosticSink>,
}

impl Default for Options {
    fn default() -> Self {
        Options { dialect: Dialect::apache(), fallback_pattern: DEFAULT_FALLBACK_PATTERN.to_string(), sink: Arc::new(NoopSink) }
    }
}

impl Options {
    pub fn for_dialect(dialect: &'static Dialect) -> Self {
        Options { dialect, ..Options::default() }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("dialect", &self.dialect.name())
            .field("fallback_pattern", &self.fallback_pattern)
            .field("sink", &"<sink>")
            .finish()
    }
}

/// Compile `spec` (a format spec or preset name) with the Apache dialect.
///
/// # Example
/// ```
/// use accesslog::{Record, apache, compile};
///
/// let format = compile("combined").unwrap();
/// let line = r#"10.1.2.3 - - [01/Feb/2024:08:00:00 +0000] "GET / HTTP/1.1" 200 5 "-" "curl/8.5""#;
/// let record = Record::new(&format, line, None).unwrap();
/// assert_eq!(record.status().unwrap(), 200);
/// assert_eq!(record.str_field(apache::USER_AGENT).unwrap(), "curl/8.5");
/// ```
pub fn compile(spec: &str) -> Result<CompiledFormat, CompileError> {
    compile_with(spec, &Options::default())
}

/// Compile `spec` with explicit [`Options`].
///
/// Preset names known to the dialect are expanded first; any other string is
/// compiled as a literal format spec.
pub fn compile_with(spec: &str, options: &Options) -> Result<CompiledFormat, CompileError> {
    let spec = options.dialect.resolve_spec(spec);
    engine::compile_format(options.dialect, spec, &options.fallback_pattern, options.sink.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Diagnostic, apache, ncsa};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Counting(Mutex<usize>);

    impl DiagnosticSink for Counting {
        fn record(&self, diagnostic: &Diagnostic<'_>) {
            if matches!(diagnostic, Diagnostic::Compiled { .. }) {
                *self.0.lock().unwrap() += 1;
            }
        }
    }

    #[test]
    fn presets_expand_before_compilation() {
        let format = compile("common").unwrap();
        assert_eq!(format.spec(), ncsa::COMMON_FORMAT);

        let format = compile("vhost-common").unwrap();
        assert_eq!(format.spec(), apache::VHOST_COMMON_FORMAT);
        assert!(format.has_field(apache::DEFINED_SERVER_NAME));

        assert_eq!(compile("extended").unwrap().spec(), compile("combined").unwrap().spec());
    }

    #[test]
    fn unknown_preset_is_a_literal_spec() {
        let format = compile("fancy").unwrap();
        assert_eq!(format.spec(), "fancy");
        assert!(format.is_match("fancy"));
        assert_eq!(format.bound_fields().count(), 0);
    }

    #[test]
    fn ncsa_has_no_presets() {
        let options = Options::for_dialect(Dialect::ncsa());
        let format = compile_with("common", &options).unwrap();
        assert_eq!(format.spec(), "common");
    }

    #[test]
    fn custom_fallback_pattern_is_used() {
        let options = Options { fallback_pattern: r"(\d+)".to_string(), ..Options::default() };
        let format = compile_with("%Z-%h", &options).unwrap();
        assert_eq!(format.pattern(), r"^(\d+)\-(?P<remoteHost>[^\s]*)");
        assert!(format.is_match("42-host"));
        assert!(!format.is_match("x-host"));
    }

    #[test]
    fn sink_is_injected() {
        let sink = Arc::new(Counting::default());
        let options = Options::default().with_sink(sink.clone());
        compile_with("%h", &options).unwrap();
        compile_with("%b", &options).unwrap();
        assert_eq!(*sink.0.lock().unwrap(), 2);
    }

    #[test]
    fn compile_errors_are_fatal() {
        assert!(matches!(compile("%h %{Referer"), Err(CompileError::UnterminatedBrace { .. })));
        assert!(matches!(compile("%h %~"), Err(CompileError::InvalidDirective { .. })));
    }
}
