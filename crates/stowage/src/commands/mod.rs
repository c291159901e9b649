pub mod fetch;
pub mod locate;
pub mod resource;

pub use fetch::run_fetch;
pub use locate::run_locate;
pub use resource::run_resource;

use crate::cli::StoreArgs;
use anyhow::Context;
use starbase::AppResult;
use stowage_common::config::{StowageConfig, StoreConfig};
use stowage_common::remote::{BucketTranslator, DelegatingResolver, HttpStore};

/// Resolver type used by every command.
pub type CliResolver = DelegatingResolver<HttpStore, BucketTranslator>;

impl StoreArgs {
    /// Configuration file values with command-line overrides applied.
    pub fn store_config(&self) -> anyhow::Result<StoreConfig> {
        let config = StowageConfig::discover(self.config.as_deref())
            .context("Failed to load configuration")?;
        Ok(self.apply(config.store))
    }

    /// Apply flag overrides to `store`.
    pub fn apply(&self, mut store: StoreConfig) -> StoreConfig {
        if let Some(bucket) = &self.bucket {
            store.bucket = bucket.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            store.endpoint = Some(endpoint.clone());
        }
        if self.requester_pays {
            store.requester_pays = true;
        }
        store
    }
}

/// Build the resolver for `config`.
pub fn resolver(config: &StoreConfig) -> anyhow::Result<CliResolver> {
    DelegatingResolver::from_config(config).context("Failed to set up store")
}

/// Run blocking resolution work off the async runtime and map the outcome
/// to an exit code.
pub(crate) async fn run_blocking<F>(work: F) -> AppResult
where
    F: FnOnce() -> anyhow::Result<u8> + Send + 'static,
{
    let code = tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| miette::miette!("Command panicked: {}", e))?
        .map_err(|e| miette::miette!("{:#}", e))?;

    Ok(if code == 0 { None } else { Some(code) })
}
