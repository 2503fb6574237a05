mod debug_report;

use accesslog::{CompiledFormat, Dialect, Options, Record, TracingSink, compile_with};
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEBUG_ENV: &str = "ACCESSLOG_DEBUG_FORMAT";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let mut options = Options::for_dialect(config.dialect);
    if config.debug {
        init_tracing();
        options = options.with_sink(Arc::new(TracingSink));
    }

    let format = match compile_with(&config.format, &options) {
        Ok(format) => format,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config, &format) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

struct CliConfig {
    format: String,
    dialect: &'static Dialect,
    input: Option<String>,
    color: bool,
    debug: bool,
}

fn run(config: &CliConfig, format: &CompiledFormat) -> io::Result<()> {
    let reader: Box<dyn BufRead> = match &config.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };

    let palette = debug_report::Palette::new(config.color);
    debug_report::print_format(format, &palette);

    let mut summary = debug_report::Summary::default();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match Record::new(format, &line, None) {
            Some(record) => {
                summary.matched += 1;
                debug_report::print_record(number + 1, &record, &palette);
            }
            None => {
                summary.failed += 1;
                debug_report::print_mismatch(number + 1, &line, &palette);
            }
        }
    }

    debug_report::print_summary(&summary, &palette);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("accesslog=debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}

fn parse_args() -> Result<CliConfig, String> {
    let mut format: Option<String> = None;
    let mut dialect = Dialect::apache();
    let mut input: Option<String> = None;
    let mut color = io::stdout().is_terminal();
    let mut debug = std::env::var(DEBUG_ENV).map(|v| v == "1").unwrap_or(false);
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("accesslog {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--debug" => debug = true,
            "--format" | "-f" => {
                let value = args.next().ok_or_else(|| "error: --format expects a value".to_string())?;
                set_once(&mut format, value, "format")?;
            }
            "--dialect" => {
                let value = args.next().ok_or_else(|| "error: --dialect expects a value".to_string())?;
                dialect = parse_dialect(&value)?;
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                set_once(&mut input, value, "input")?;
            }
            _ if arg.starts_with("--format=") => {
                set_once(&mut format, arg.trim_start_matches("--format=").to_string(), "format")?;
            }
            _ if arg.starts_with("--dialect=") => {
                dialect = parse_dialect(arg.trim_start_matches("--dialect="))?;
            }
            _ if arg.starts_with("--input=") => {
                set_once(&mut input, arg.trim_start_matches("--input=").to_string(), "input")?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                return Err(format!("error: unexpected argument '{arg}'\n\n{}", help_text()));
            }
        }
    }

    let format = format.unwrap_or_else(|| dialect.default_spec().to_string());
    if format.is_empty() {
        return Err("error: empty format spec".to_string());
    }

    Ok(CliConfig { format, dialect, input, color, debug })
}

fn set_once(slot: &mut Option<String>, value: String, what: &str) -> Result<(), String> {
    if slot.is_some() {
        return Err(format!("error: {what} provided multiple times"));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_dialect(value: &str) -> Result<&'static Dialect, String> {
    Dialect::by_name(value).ok_or_else(|| format!("error: unknown dialect '{value}' (expected ncsa or apache)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    let presets = Dialect::apache().presets().iter().map(|(name, _)| *name).collect::<Vec<_>>().join(", ");
    format!(
        "accesslog {version}

Parse access-log lines against an Apache/NCSA format spec.

Usage:
  accesslog [OPTIONS] < access.log
  accesslog [OPTIONS] --input <file>

Options:
  -f, --format <spec>        Format spec or preset name.
                             Presets (apache): {presets}
                             Default: the dialect's common format.
  --dialect <name>           ncsa or apache. Default: apache
  -i, --input <file>         Read lines from <file> instead of stdin.
  --debug                    Log format compilation to stderr.
                             Also enabled by {debug_env}=1.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  I/O error while reading input.
  2  Invalid arguments or format spec.
",
        version = env!("CARGO_PKG_VERSION"),
        debug_env = DEBUG_ENV,
    )
}
