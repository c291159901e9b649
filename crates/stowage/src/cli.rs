//! Command-line definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Stowage - resolve artifacts and resources from S3-compatible object stores
#[derive(Debug, Parser)]
#[command(name = "stowage")]
#[command(about = "Resolve artifacts and resources from S3-compatible object stores", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Store selection flags; each overrides the configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct StoreArgs {
    /// Configuration file (defaults to <config dir>/stowage/stowage.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bucket holding the artifacts
    #[arg(short, long, global = true)]
    pub bucket: Option<String>,

    /// Store endpoint URL
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Bill transfers to the requester
    #[arg(long, global = true)]
    pub requester_pays: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Fetch an artifact by name (e.g. com.example.Foo)
    Fetch {
        /// Artifact name
        name: String,
        /// Write the artifact under this directory at its object key
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch a resource by path (e.g. META-INF/MANIFEST.MF)
    Resource {
        /// Resource name
        name: String,
        /// Write the resource to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the URL of a resource without fetching it
    Locate {
        /// Resource name
        name: String,
        /// Enumerate every URL and fail on store errors
        #[arg(long)]
        all: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::try_parse_from([
            "stowage",
            "--bucket",
            "classes",
            "fetch",
            "com.example.Foo",
            "--output",
            "out",
        ])
        .unwrap();

        assert_eq!(cli.store.bucket.as_deref(), Some("classes"));
        match cli.command {
            Commands::Fetch { name, output, json } => {
                assert_eq!(name, "com.example.Foo");
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "stowage",
            "locate",
            "x.txt",
            "--all",
            "--requester-pays",
            "-v",
            "--endpoint",
            "http://localhost:9000",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(cli.store.requester_pays);
        assert_eq!(cli.store.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(matches!(cli.command, Commands::Locate { all: true, .. }));
    }

    #[test]
    fn test_name_is_required() {
        assert!(Cli::try_parse_from(["stowage", "fetch"]).is_err());
    }
}
