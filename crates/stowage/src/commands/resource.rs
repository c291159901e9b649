//! Resource command: resolve a resource through the store fallback.

use super::{resolver, run_blocking};
use crate::cli::StoreArgs;
use anyhow::Context;
use starbase::AppResult;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::warn;

/// Run the resource command
pub async fn run_resource(store: StoreArgs, name: String, output: Option<PathBuf>) -> AppResult {
    run_blocking(move || {
        let config = store.store_config()?;
        let resolver = resolver(&config)?;

        let Some(mut stream) = resolver.resolve_resource(&name) else {
            warn!("Resource not found: {}", name);
            return Ok(1);
        };

        match output {
            Some(path) => {
                let mut file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                copy(&mut stream, &mut file)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                copy(&mut stream, &mut handle).context("Failed to write to stdout")?;
            }
        }
        Ok(0)
    })
    .await
}

fn copy(reader: &mut dyn Read, writer: &mut dyn Write) -> io::Result<u64> {
    let n = io::copy(reader, writer)?;
    writer.flush()?;
    Ok(n)
}
