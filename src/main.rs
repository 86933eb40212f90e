use std::process;
#[macro_use]
extern crate log;

mod cli;
use clap::Parser;
use cli::Cli;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        error!("{e:#}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let report = Cli::parse().run()?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
