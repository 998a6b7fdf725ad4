use crate::{
    account::{AccountConfig, PgUserStore, Reconciler, UserStore},
    api::{self, handlers::account::AccountState},
    cli::{commands::store, globals::GlobalArgs},
    provider::{DocumentUserStore, IdentityProvider, ProviderClient},
};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub store: store::Options,
    pub globals: GlobalArgs,
    pub app_url: Url,
    pub public_url: Url,
    pub avatar_url: String,
}

async fn user_store(options: store::Options, client: &ProviderClient) -> Result<Arc<dyn UserStore>> {
    match options {
        store::Options::Postgres { dsn } => {
            let pool = PgPoolOptions::new()
                .min_connections(1)
                .max_connections(5)
                .max_lifetime(Duration::from_secs(60 * 2))
                .test_before_acquire(true)
                .connect(&dsn)
                .await
                .context("Failed to connect to database")?;
            info!("user records stored in PostgreSQL");
            Ok(Arc::new(PgUserStore::new(pool)))
        }
        store::Options::Documents {
            database_id,
            collection_id,
        } => {
            info!(
                database_id = %database_id,
                collection_id = %collection_id,
                "user records stored in provider collection"
            );
            Ok(Arc::new(DocumentUserStore::new(
                client.clone(),
                database_id,
                collection_id,
            )))
        }
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the provider client or record store cannot be built, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Global args: {:?}", args.globals);

    let client = ProviderClient::new(&args.globals)?;
    let store = user_store(args.store, &client).await?;
    let provider: Arc<dyn IdentityProvider> = Arc::new(client);

    let config = AccountConfig::new(&args.public_url).with_avatar_url(args.avatar_url);
    let reconciler = Reconciler::new(provider.clone(), store.clone(), config);
    let state = Arc::new(AccountState::new(reconciler, provider, store));

    api::new(args.port, &args.app_url, state).await
}
