//! sxp CLI
//!
//! Reads s-expression forms from a file or stdin and pretty-prints them.

use std::io::Read;

use tracing_subscriber::EnvFilter;

use sx_pretty::{output_pretty, standard_table, IoSink, PrintConfig, Sink};
use sx_reader::read_str;

/// Log to stderr, filtered by `SXP_LOG` (or `RUST_LOG`), quiet by default.
fn init_tracing() {
    let filter = std::env::var("SXP_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "fmt" => match FmtOptions::parse(&args[2..]) {
            Ok(options) => run_fmt(&options),
            Err(message) => {
                eprintln!("{message}");
                std::process::exit(1);
            }
        },
        "check" => {
            let path = args.get(2).map(String::as_str);
            run_check(path);
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command `{other}`");
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Options for `sxp fmt`.
#[derive(Debug, PartialEq, Eq)]
struct FmtOptions {
    path: Option<String>,
    config: PrintConfig,
}

impl FmtOptions {
    fn parse(args: &[String]) -> Result<FmtOptions, String> {
        let mut path: Option<String> = None;
        let mut config = PrintConfig::default();

        for arg in args {
            if let Some(value) = arg.strip_prefix("--margin=") {
                config.right_margin = parse_columns("--margin", value)?;
            } else if let Some(value) = arg.strip_prefix("--miser-width=") {
                config.miser_width = Some(parse_columns("--miser-width", value)?);
            } else if let Some(value) = arg.strip_prefix("--lines=") {
                config.lines = Some(parse_columns("--lines", value)?);
            } else if arg == "--readably" {
                config.readably = true;
            } else if arg.starts_with('-') {
                return Err(format!("Unknown option `{arg}`"));
            } else if path.is_none() {
                path = Some(arg.clone());
            } else {
                return Err(format!("Unexpected argument `{arg}`"));
            }
        }

        Ok(FmtOptions { path, config })
    }
}

fn parse_columns(flag: &str, value: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| format!("{flag} expects a number, got `{value}`"))
}

fn read_source(path: Option<&str>) -> Result<String, String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).map_err(|err| format!("Cannot read {path}: {err}"))
        }
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|err| format!("Cannot read stdin: {err}"))?;
            Ok(source)
        }
    }
}

fn run_fmt(options: &FmtOptions) {
    let source = match read_source(options.path.as_deref()) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    };

    let forms = match read_str(&source) {
        Ok(forms) => forms,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    let mut sink = IoSink::new(stdout.lock());
    let table = standard_table();
    for form in &forms {
        let printed = output_pretty(&mut sink, form, &options.config, table)
            .and_then(|()| sink.write_str("\n"));
        if let Err(err) = printed {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn run_check(path: Option<&str>) {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    };
    if let Err(err) = read_str(&source) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!("Usage: sxp <command> [options]");
    println!();
    println!("Commands:");
    println!("  fmt [FILE]     Pretty-print every form in FILE (stdin when omitted)");
    println!("  check [FILE]   Read the forms and report the first syntax error");
    println!("  help           Show this help");
    println!();
    println!("Options for fmt:");
    println!("  --margin=N        Right margin in columns (default 80)");
    println!("  --miser-width=N   Enable miser mode below N available columns");
    println!("  --lines=N         Truncate output after N lines");
    println!("  --readably        Disable line-budget truncation");
}
