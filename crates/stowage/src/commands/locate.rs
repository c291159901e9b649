//! Locate command: print resource URLs without fetching.

use super::{resolver, run_blocking};
use crate::cli::StoreArgs;
use starbase::AppResult;
use tracing::warn;

/// Run the locate command
pub async fn run_locate(store: StoreArgs, name: String, all: bool) -> AppResult {
    run_blocking(move || {
        let config = store.store_config()?;
        let resolver = resolver(&config)?;

        let urls: Vec<_> = if all {
            resolver.locate_all(&name)?.collect()
        } else {
            resolver.locate(&name).into_iter().collect()
        };

        if urls.is_empty() {
            warn!("No URL for {}", name);
            return Ok(1);
        }
        for url in urls {
            println!("{}", url);
        }
        Ok(0)
    })
    .await
}
