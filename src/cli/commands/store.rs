use clap::{Arg, ArgMatches, Command};

pub const ARG_DSN: &str = "dsn";
pub const ARG_DATABASE_ID: &str = "database-id";
pub const ARG_USERS_COLLECTION_ID: &str = "users-collection-id";

/// Where user records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Options {
    Postgres { dsn: String },
    Documents {
        database_id: String,
        collection_id: String,
    },
}

impl Options {
    /// Parse record store arguments from matches.
    ///
    /// # Errors
    /// Returns an error if neither a DSN nor both document ids are given.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
        };

        if let Some(dsn) = get_non_empty(ARG_DSN) {
            return Ok(Self::Postgres { dsn });
        }

        let database_id = get_non_empty(ARG_DATABASE_ID).ok_or_else(|| {
            anyhow::anyhow!("missing required argument: --{ARG_DATABASE_ID} (required without --{ARG_DSN})")
        })?;
        let collection_id = get_non_empty(ARG_USERS_COLLECTION_ID).ok_or_else(|| {
            anyhow::anyhow!(
                "missing required argument: --{ARG_USERS_COLLECTION_ID} (required without --{ARG_DSN})"
            )
        })?;

        Ok(Self::Documents {
            database_id,
            collection_id,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long(ARG_DSN)
                .help("PostgreSQL connection string for user records")
                .long_help(
                    "PostgreSQL connection string for user records. When omitted, records are kept in the provider database collection given by --database-id and --users-collection-id.",
                )
                .env("ACCORD_DSN"),
        )
        .arg(
            Arg::new(ARG_DATABASE_ID)
                .long(ARG_DATABASE_ID)
                .help("Provider database id holding the users collection")
                .env("ACCORD_DATABASE_ID"),
        )
        .arg(
            Arg::new(ARG_USERS_COLLECTION_ID)
                .long(ARG_USERS_COLLECTION_ID)
                .help("Provider collection id of user records")
                .env("ACCORD_USERS_COLLECTION_ID"),
        )
}
