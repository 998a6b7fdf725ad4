use crate::cli::globals::{GlobalArgs, DEFAULT_PROVIDER_TIMEOUT_SECONDS};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_PROVIDER_ENDPOINT: &str = "provider-endpoint";
pub const ARG_PROVIDER_PROJECT_ID: &str = "provider-project-id";
pub const ARG_PROVIDER_API_KEY: &str = "provider-api-key";
pub const ARG_PROVIDER_TIMEOUT_SECONDS: &str = "provider-timeout-seconds";

#[derive(Debug, Clone)]
pub struct Options {
    pub globals: GlobalArgs,
}

impl Options {
    /// Parse provider arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read_required = |id: &str| -> anyhow::Result<String> {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        let mut globals = GlobalArgs::new(
            read_required(ARG_PROVIDER_ENDPOINT)?,
            read_required(ARG_PROVIDER_PROJECT_ID)?,
        );
        globals.set_api_key(SecretString::from(read_required(ARG_PROVIDER_API_KEY)?));
        globals.set_timeout_seconds(
            matches
                .get_one::<u64>(ARG_PROVIDER_TIMEOUT_SECONDS)
                .copied()
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECONDS),
        );

        Ok(Self { globals })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PROVIDER_ENDPOINT)
                .long(ARG_PROVIDER_ENDPOINT)
                .help("Identity provider API endpoint, including the version path")
                .long_help(
                    "Identity provider API endpoint, including the version path, e.g. https://cloud.appwrite.io/v1",
                )
                .env("ACCORD_PROVIDER_ENDPOINT"),
        )
        .arg(
            Arg::new(ARG_PROVIDER_PROJECT_ID)
                .long(ARG_PROVIDER_PROJECT_ID)
                .help("Identity provider project id")
                .env("ACCORD_PROVIDER_PROJECT_ID"),
        )
        .arg(
            Arg::new(ARG_PROVIDER_API_KEY)
                .long(ARG_PROVIDER_API_KEY)
                .help("Identity provider server API key")
                .env("ACCORD_PROVIDER_API_KEY")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_PROVIDER_TIMEOUT_SECONDS)
                .long(ARG_PROVIDER_TIMEOUT_SECONDS)
                .help("Timeout for identity provider requests, in seconds")
                .env("ACCORD_PROVIDER_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
