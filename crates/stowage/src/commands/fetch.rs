//! Fetch command: resolve one artifact from the store.

use super::{CliResolver, resolver, run_blocking};
use crate::cli::StoreArgs;
use crate::sink::DirectoryLoader;
use serde::Serialize;
use starbase::AppResult;
use std::path::PathBuf;
use stowage_core::MaterializedArtifact;
use tracing::{info, warn};

/// What `stowage fetch` prints when no output directory is given.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSummary {
    pub name: String,
    pub size_in_bytes: usize,
    pub origin: Option<String>,
}

impl From<&MaterializedArtifact> for ArtifactSummary {
    fn from(artifact: &MaterializedArtifact) -> Self {
        Self {
            name: artifact.name().to_string(),
            size_in_bytes: artifact.len(),
            origin: artifact.origin().url.as_ref().map(|url| url.to_string()),
        }
    }
}

impl ArtifactSummary {
    pub fn render(&self) -> String {
        format!(
            "{}\n  size:   {} bytes\n  origin: {}",
            self.name,
            self.size_in_bytes,
            self.origin.as_deref().unwrap_or("unknown")
        )
    }
}

/// Run the fetch command
pub async fn run_fetch(
    store: StoreArgs,
    name: String,
    output: Option<PathBuf>,
    json: bool,
) -> AppResult {
    run_blocking(move || {
        let config = store.store_config()?;
        let resolver = resolver(&config)?;
        match output {
            Some(dir) => {
                let loader = DirectoryLoader::new(dir).with_key_suffix(config.key_suffix.clone());
                write_artifact(&resolver, &name, &loader)
            }
            None => print_summary(&resolver, &name, json),
        }
    })
    .await
}

fn write_artifact(
    resolver: &CliResolver,
    name: &str,
    loader: &DirectoryLoader,
) -> anyhow::Result<u8> {
    match resolver.load_with(name, loader) {
        Ok(path) => {
            println!("{}", path.display());
            Ok(0)
        }
        Err(e) if e.is_not_found() => {
            warn!("{}", e);
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_summary(resolver: &CliResolver, name: &str, json: bool) -> anyhow::Result<u8> {
    let artifact = match resolver.resolve_artifact(name) {
        Ok(artifact) => artifact,
        Err(e) if e.is_not_found() => {
            warn!("{}", e);
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };
    info!("Resolved {} ({} bytes)", artifact.name(), artifact.len());

    let summary = ArtifactSummary::from(&artifact);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.render());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_core::CodeOrigin;

    #[test]
    fn test_summary() {
        let origin = CodeOrigin::new(Some("https://classes.s3.amazonaws.com/".parse().unwrap()));
        let artifact = MaterializedArtifact::new("com.example.Foo", vec![0u8; 42], origin);
        let summary = ArtifactSummary::from(&artifact);

        assert_eq!(
            summary,
            ArtifactSummary {
                name: "com.example.Foo".to_string(),
                size_in_bytes: 42,
                origin: Some("https://classes.s3.amazonaws.com/".to_string()),
            }
        );
        assert!(summary.render().contains("42 bytes"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["sizeInBytes"], 42);
    }

    #[test]
    fn test_summary_without_origin() {
        let artifact = MaterializedArtifact::new("a.B", vec![1], CodeOrigin::unknown());
        let summary = ArtifactSummary::from(&artifact);
        assert!(summary.render().ends_with("origin: unknown"));
    }
}
