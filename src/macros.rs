#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Declare one entry of a dialect's directive table.
///
/// ```ignore
/// directive!(">s" => r"(?P<status>\d+|-)", binds: [("status", STATUS)])
/// directive!("{Referer}i" => r"(?P<_Referer_i>[^\s]+|-)", binds: [("_Referer_i", REFERER)], exceptional: true)
/// ```
#[macro_export]
macro_rules! directive {
    (
        $text:literal => $pattern:literal
        $(, binds: [ $( ($group:literal, $field:expr) ),* $(,)? ])?
        $(, exceptional: $exceptional:expr)?
        $(,)?
    ) => {{
        $crate::dialects::Directive {
            text: $text,
            pattern: $pattern,
            bindings: vec![ $($( ($group, $field) ),*)? ],
            exceptional: { false $(|| $exceptional)? },
        }
    }};
}
