use std::sync::Arc;

use clap::Parser;
use log::info;

use restplate::api::RestplateApi;
use restplate::conf::Config;
use restplate::core::{CliArgs, setup_logging};
use restplate::store::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "Restplate started.");

    let config = Config::load(args.config.as_deref())?;
    let store = Arc::new(SqliteStore::open(&config.database)?);
    let api = RestplateApi::from_config(&config, store).await?;
    api.serve(&config.server.addr()).await?;
    Ok(())
}
