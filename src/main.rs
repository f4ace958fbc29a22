use std::{fs, io, process::ExitCode};

use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use obac::{Mode, MAX_SYMBOLS};

/// obac runs Oba-C programs: integer variables, arithmetic, `print` and `if`.
#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat `source` as a path to a file instead of program text.
    #[arg(short, long)]
    file: bool,

    /// Print the token stream instead of running the program.
    #[arg(long, conflicts_with = "ast")]
    tokens: bool,

    /// Print the parsed program tree instead of running it.
    #[arg(long)]
    ast: bool,

    /// Maximum number of variables a program may declare.
    #[arg(long, default_value_t = MAX_SYMBOLS)]
    max_symbols: usize,

    /// Log more (-v for debug, -vv for trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    source: String,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let source = if args.file {
        match fs::read_to_string(&args.source) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("Failed to read the input file '{}': {}", args.source, err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        args.source
    };

    let mode = if args.tokens {
        Mode::Tokens
    } else if args.ast {
        Mode::Ast
    } else {
        Mode::Run
    };

    match obac::drive(
        &source,
        mode,
        args.max_symbols,
        io::stdout().lock(),
        io::stderr().lock(),
    ) {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            eprintln!("Failed to write output: {}", err);
            ExitCode::FAILURE
        }
    }
}
