use accesslog::{CollectionKind, CompiledFormat, Record};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";
}

pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
        if self.enabled { format!("{}{}{}", color, s.as_ref(), ansi::RESET) } else { s.as_ref().to_string() }
    }

    fn bold(&self, s: impl AsRef<str>) -> String {
        if self.enabled { format!("{}{}{}", ansi::BOLD, s.as_ref(), ansi::RESET) } else { s.as_ref().to_string() }
    }

    fn dim(&self, s: impl AsRef<str>) -> String {
        if self.enabled { format!("{}{}{}", ansi::DIM, s.as_ref(), ansi::RESET) } else { s.as_ref().to_string() }
    }
}

#[derive(Debug, Default)]
pub struct Summary {
    pub matched: usize,
    pub failed: usize,
}

pub fn print_format(format: &CompiledFormat, palette: &Palette) {
    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Format ({}): \"{}\"", format.dialect().name(), format.spec()), ansi::CYAN))
    );
    println!("  {} {}", palette.dim("pattern:"), palette.paint(format.pattern(), ansi::YELLOW));

    let fields: Vec<String> = format.bound_fields().map(|id| format.field_name(id)).collect();
    println!("  {} {}", palette.dim("fields:"), palette.paint(fields.join(", "), ansi::BLUE));

    for kind in CollectionKind::ALL {
        let keys = format.collection_keys(kind);
        if !keys.is_empty() {
            println!("  {} {}", palette.dim(format!("{kind}s:")), palette.paint(keys.join(", "), ansi::BLUE));
        }
    }
}

pub fn print_record(number: usize, record: &Record<'_>, palette: &Palette) {
    let format = record.format();
    println!("\n{} {}", palette.paint(format!("━━━ Line {number} ━━━"), ansi::GRAY), palette.paint("✓", ansi::GREEN));

    for id in format.bound_fields() {
        let value = match record.field(id) {
            Ok(Some(value)) => palette.bold(palette.paint(value, ansi::GREEN)),
            Ok(None) => palette.dim("(absent)"),
            Err(err) => palette.paint(err.to_string(), ansi::RED),
        };
        println!("  {:<22} {}", palette.paint(format.field_name(id), ansi::BLUE), value);
    }

    for kind in CollectionKind::ALL {
        for key in format.collection_keys(kind) {
            let value = match record.collection_field(kind, key) {
                Ok(value) => palette.paint(value, ansi::GREEN),
                Err(err) => palette.paint(err.to_string(), ansi::RED),
            };
            println!("  {:<22} {}", palette.paint(format!("%{{{key}}}{}", kind.suffix()), ansi::CYAN), value);
        }
    }
}

pub fn print_mismatch(number: usize, line: &str, palette: &Palette) {
    println!("\n{} {}", palette.paint(format!("━━━ Line {number} ━━━"), ansi::GRAY), palette.paint("✗", ansi::RED));
    println!("  {}", palette.dim(line));
}

pub fn print_summary(summary: &Summary, palette: &Palette) {
    println!("\n{}", palette.paint("━━━ Summary ━━━", ansi::GRAY));
    println!(
        "  Matched: {}  │  Failed: {}",
        palette.paint(summary.matched.to_string(), ansi::GREEN),
        if summary.failed > 0 {
            palette.paint(summary.failed.to_string(), ansi::RED)
        } else {
            palette.dim(summary.failed.to_string())
        },
    );
    println!();
}
