use clap::Parser;
use finagent::cli::{Cli, run};
use std::env;

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,finagent=info".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
