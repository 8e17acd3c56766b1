//! Global verbosity flag.
//!
//! `-v` may be repeated on the command line; `FOLIO_LOG_LEVEL` accepts either
//! a level name or the equivalent count, so `FOLIO_LOG_LEVEL=info` and `-vv`
//! select the same level.

use clap::{Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

// Index is the verbosity count.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn parse_log_level(value: &str) -> Result<u8, String> {
    let value = value.trim();
    let index = match value.parse::<usize>() {
        Ok(count) if count < LEVEL_NAMES.len() => Some(count),
        Ok(count) => return Err(format!("log level {count} is out of range 0-4")),
        Err(_) => LEVEL_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(value)),
    };
    index
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| format!("invalid log level: {value}"))
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Increase log verbosity (-v warn, -vv info, -vvv debug, -vvvv trace)")
            .env("FOLIO_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(parse_log_level),
    )
}
