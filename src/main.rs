use clap::Parser;
use planpricer::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
