//! Demo shell entry point.
//!
//! Builds the converter table and command registry, then runs the REPL
//! over stdin/stdout. Type `help` at the prompt for the command list;
//! `exit` or Ctrl-D leaves.

mod commands;
mod stdio;

use std::fs;

use anyhow::Result;

use keel_repl::{Repl, ShellConfig};
use keel_shell::{ConverterRegistry, Env, Registry};
use keel_types::Value;

use stdio::{StdinSource, StdoutSink};

/// Optional config file path taken from `KEEL_CONFIG`.
fn load_config() -> Result<ShellConfig> {
    match std::env::var_os("KEEL_CONFIG") {
        Some(path) => {
            let text = fs::read_to_string(&path)?;
            Ok(ShellConfig::from_toml(&text)?)
        },
        None => Ok(ShellConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    log::info!("starting keel demo shell (prompt {:?})", config.prompt);

    let mut converters = ConverterRegistry::new();
    commands::register_converters(&mut converters);

    let mut registry = Registry::new();
    commands::register_commands(&mut registry, &converters)?;

    let mut repl = Repl::new(registry, converters, config)?;

    let mut env = Env::new();
    env.set("verbose", Value::Bool(false));

    let mut source = StdinSource::new();
    let mut sink = StdoutSink;
    repl.run(&mut source, &mut sink, &mut env)?;
    Ok(())
}
