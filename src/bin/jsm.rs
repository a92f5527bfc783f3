#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use jsm::cli::args::CliArgs;
use jsm::cli::{driver, reporter::Reporter};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DEFECTS: i32 = 1;

fn main() -> Result<()> {
    // JSM_LOG / JSM_LOG_FORMAT, see src/tracing_config.rs.
    jsm::tracing_config::init_tracing();

    let args = CliArgs::parse_from(std::env::args_os());
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let outcome = match driver::run(&args, &cwd) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(EXIT_DEFECTS);
        }
    };

    if !outcome.diagnostics.is_empty() {
        let mut reporter = Reporter::new(args.pretty || std::io::stderr().is_terminal());
        for (file, text) in &outcome.sources {
            reporter.add_source(file.clone(), text.clone());
        }
        eprintln!("{}", reporter.render(&outcome.diagnostics));
        let errors = outcome.diagnostics.iter().filter(|d| d.is_error()).count();
        if errors > 0 {
            eprintln!("\nFound {errors} error{}.", if errors == 1 { "" } else { "s" });
        }
    }

    print!("{}", outcome.output);
    if let Some(path) = outcome.written.as_ref() {
        eprintln!("Surface written to {}", path.display());
    }

    std::process::exit(if outcome.has_errors() { EXIT_DEFECTS } else { EXIT_SUCCESS });
}
