use clap::Parser;
use macdeval::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
