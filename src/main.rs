//! CLI binary for taskflow.
//!
//! This binary is a thin wrapper that parses arguments and delegates to
//! the library.

use clap::Parser;
use std::process::ExitCode;
use taskflow::cli::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = run(cli);

    for msg in output.stdout {
        println!("{msg}");
    }
    for msg in output.stderr {
        eprintln!("{msg}");
    }

    ExitCode::from(output.exit_code)
}
