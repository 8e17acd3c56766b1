pub mod admin;
pub mod auth;
pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_DSN: &str = "dsn";
pub const ARG_PORT: &str = "port";

pub const CMD_SERVER: &str = "server";
pub const CMD_SYNC_ADMIN: &str = "sync-admin";
pub const CMD_VERIFY_LOGIN: &str = "verify-login";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("folio")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            // Global args cannot be `required`; dispatch enforces presence.
            Arg::new(ARG_DSN)
                .short('d')
                .long(ARG_DSN)
                .help("Database connection string")
                .env("FOLIO_DSN")
                .hide_env_values(true)
                .global(true),
        )
        .subcommand(server())
        .subcommand(sync_admin())
        .subcommand(verify_login());

    logging::with_args(command)
}

fn server() -> Command {
    let command = Command::new(CMD_SERVER)
        .about("Run the HTTP service")
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("FOLIO_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    auth::with_args(command)
}

fn sync_admin() -> Command {
    admin::with_args(
        Command::new(CMD_SYNC_ADMIN)
            .about("Create the admin account, or reset its password and role"),
    )
}

fn verify_login() -> Command {
    admin::with_args(
        Command::new(CMD_VERIFY_LOGIN)
            .about("Check whether the admin credentials would pass login"),
    )
}
