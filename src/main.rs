//! Tether - Local-first to-do list with task dependencies

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = tether_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
