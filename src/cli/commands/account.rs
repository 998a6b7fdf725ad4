use crate::account::DEFAULT_AVATAR_URL;
use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use url::Url;

pub const ARG_APP_URL: &str = "app-url";
pub const ARG_PUBLIC_URL: &str = "public-url";
pub const ARG_AVATAR_URL: &str = "avatar-url";

#[derive(Debug, Clone)]
pub struct Options {
    pub app_url: Url,
    /// Where this service is reachable by users; verification links point here.
    pub public_url: Url,
    pub avatar_url: String,
}

fn parse_http_url(value: &str, arg: &str) -> anyhow::Result<Url> {
    let url = Url::parse(value).with_context(|| format!("invalid --{arg}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("invalid --{arg}: expected http or https");
    }
    Ok(url)
}

impl Options {
    /// Parse account arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the application or public URL is not an absolute http(s) URL.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let app_url = get_non_empty(ARG_APP_URL)
            .unwrap_or_else(|| "http://localhost:3000".to_string());
        let app_url = parse_http_url(&app_url, ARG_APP_URL)?;

        let public_url = match get_non_empty(ARG_PUBLIC_URL) {
            Some(value) => parse_http_url(&value, ARG_PUBLIC_URL)?,
            None => app_url.clone(),
        };

        let avatar_url = matches
            .get_one::<String>(ARG_AVATAR_URL)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string());

        Ok(Self {
            app_url,
            public_url,
            avatar_url,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_APP_URL)
                .long(ARG_APP_URL)
                .help("Public URL of the web application")
                .long_help(
                    "Public URL of the web application. CORS only allows this origin.",
                )
                .env("ACCORD_APP_URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new(ARG_PUBLIC_URL)
                .long(ARG_PUBLIC_URL)
                .help("Public URL of this service, used in verification links")
                .long_help(
                    "Public URL of this service. Verification emails link to <public-url>/account/verify. Defaults to --app-url, in which case the web application must proxy /account/verify to this service.",
                )
                .env("ACCORD_PUBLIC_URL"),
        )
        .arg(
            Arg::new(ARG_AVATAR_URL)
                .long(ARG_AVATAR_URL)
                .help("Avatar URL stored on new user records")
                .env("ACCORD_AVATAR_URL"),
        )
}
