//! Maps parsed CLI arguments to the action the binary executes.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{account, provider, store};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let store = store::Options::parse(matches)?;
    let provider_opts = provider::Options::parse(matches)?;
    let account_opts = account::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        store,
        globals: provider_opts.globals,
        app_url: account_opts.app_url,
        public_url: account_opts.public_url,
        avatar_url: account_opts.avatar_url,
    }))
}
