use std::{fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use clap::Parser;
use cobra::{
    display_error,
    interpreter::{console::Console, interpreter::Interpreter},
    lexer::lexer::tokenize,
    parser::parser::parse,
    resolver::resolver::resolve,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cobra")]
#[command(about = "Run a cobra program and print its result")]
struct Cli {
    /// Source file to run
    file: PathBuf,

    /// Log pipeline timings and evaluation details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "cobra=debug" } else { "cobra=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file_path = cli.file.display().to_string();
    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.clone());

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            debug!(%error, "failed to read source");
            eprintln!("Error: File '{}' not found.", file_path);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(&source, Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&error, &source, &file_path);
            return ExitCode::FAILURE;
        }
    };

    debug!(tokens = tokens.len(), elapsed = ?start.elapsed(), "tokenized");

    let parse_start = Instant::now();
    let tree = match parse(tokens, Rc::new(file_name)) {
        Ok(tree) => tree,
        Err(error) => {
            display_error(&error, &source, &file_path);
            return ExitCode::FAILURE;
        }
    };

    debug!(elapsed = ?parse_start.elapsed(), "parsed");

    let resolve_start = Instant::now();
    let tree = match resolve(tree) {
        Ok(tree) => tree,
        Err(error) => {
            display_error(&error, &source, &file_path);
            return ExitCode::FAILURE;
        }
    };

    debug!(elapsed = ?resolve_start.elapsed(), "resolved");

    let run_start = Instant::now();
    let mut interpreter = Interpreter::with_console(Console::Stdio);

    match interpreter.run(&tree) {
        Ok(value) => {
            debug!(elapsed = ?run_start.elapsed(), total = ?start.elapsed(), "evaluated");
            println!("Result: {}", value);
            ExitCode::SUCCESS
        }
        Err(error) => {
            display_error(&error, &source, &file_path);
            ExitCode::FAILURE
        }
    }
}
