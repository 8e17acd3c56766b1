use crate::api::handlers::auth::{DEFAULT_SESSION_TTL_SECONDS, Environment, SignupPolicy};
use anyhow::{Result, anyhow};
use clap::{
    Arg, ArgMatches, Command,
    builder::{PossibleValue, PossibleValuesParser},
};
use secrecy::SecretString;

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_ENVIRONMENT: &str = "environment";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_SIGNUP_POLICY: &str = "signup-policy";

#[derive(Debug, Clone)]
pub struct Options {
    pub jwt_secret: Option<SecretString>,
    pub environment: Environment,
    pub session_ttl_seconds: u64,
    pub signup_policy: SignupPolicy,
}

impl Options {
    /// Parse session and signup arguments from matches.
    ///
    /// # Errors
    /// Returns an error if a value cannot be interpreted.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let environment = matches
            .get_one::<String>(ARG_ENVIRONMENT)
            .map_or(Ok(Environment::Production), |value| value.parse())
            .map_err(|err: String| anyhow!(err))?;
        let signup_policy = matches
            .get_one::<String>(ARG_SIGNUP_POLICY)
            .map_or(Ok(SignupPolicy::Bootstrap), |value| value.parse())
            .map_err(|err: String| anyhow!(err))?;
        let session_ttl_seconds = matches
            .get_one::<u64>(ARG_SESSION_TTL_SECONDS)
            .copied()
            .unwrap_or(DEFAULT_SESSION_TTL_SECONDS);
        if session_ttl_seconds == 0 {
            return Err(anyhow!("--{ARG_SESSION_TTL_SECONDS} must be greater than zero"));
        }

        Ok(Self {
            jwt_secret: matches
                .get_one::<String>(ARG_JWT_SECRET)
                .cloned()
                .map(SecretString::from),
            environment,
            session_ttl_seconds,
            signup_policy,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("HS256 secret used to sign session tokens")
                .long_help(concat!(
                    "HS256 secret used to sign session tokens. Required in production; ",
                    "development falls back to a well-known placeholder."
                ))
                .env("FOLIO_JWT_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long(ARG_ENVIRONMENT)
                .help("Deployment environment")
                .env("FOLIO_ENV")
                .default_value("production")
                .value_parser(PossibleValuesParser::new([
                    PossibleValue::new("production").alias("prod"),
                    PossibleValue::new("development").alias("dev"),
                ])),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session token and cookie lifetime in seconds")
                .env("FOLIO_SESSION_TTL_SECONDS")
                .default_value("3600")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_SIGNUP_POLICY)
                .long(ARG_SIGNUP_POLICY)
                .help("Who may register: bootstrap (first admin only), open, or closed")
                .env("FOLIO_SIGNUP_POLICY")
                .default_value("bootstrap")
                .value_parser(["bootstrap", "open", "closed"]),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options> {
        let matches = with_args(Command::new("server")).try_get_matches_from(args)?;
        Options::parse(&matches)
    }

    #[test]
    fn environment_accepts_short_aliases() -> Result<()> {
        temp_env::with_var_unset("FOLIO_ENV", || {
            for (value, expected) in [
                ("production", Environment::Production),
                ("prod", Environment::Production),
                ("development", Environment::Development),
                ("dev", Environment::Development),
            ] {
                let options = parse(&["server", "--environment", value])?;
                assert_eq!(options.environment, expected, "{value}");
            }
            Ok(())
        })
    }

    #[test]
    fn environment_alias_from_env() -> Result<()> {
        temp_env::with_var("FOLIO_ENV", Some("dev"), || {
            let options = parse(&["server"])?;
            assert_eq!(options.environment, Environment::Development);
            Ok(())
        })
    }

    #[test]
    fn environment_rejects_unknown_value() {
        temp_env::with_var_unset("FOLIO_ENV", || {
            assert!(parse(&["server", "--environment", "staging"]).is_err());
        });
    }
}
