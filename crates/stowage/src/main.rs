use clap::Parser;
use starbase::{App, AppResult, AppSession};
use stowage::commands::{run_fetch, run_locate, run_resource};
use stowage::logging::{self, LogOptions};
use stowage::{Cli, Commands, StoreArgs};

/// Application session for the Stowage CLI
#[derive(Clone)]
struct StowageSession {
    store: StoreArgs,
    command: Commands,
}

#[async_trait::async_trait]
impl AppSession for StowageSession {
    async fn execute(&mut self) -> AppResult {
        let store = self.store.clone();
        match self.command.clone() {
            Commands::Fetch { name, output, json } => run_fetch(store, name, output, json).await,
            Commands::Resource { name, output } => run_resource(store, name, output).await,
            Commands::Locate { name, all } => run_locate(store, name, all).await,
        }
    }
}

#[tokio::main]
async fn main() -> starbase::MainResult {
    let cli = Cli::parse();

    let _log_guard = logging::init(&LogOptions {
        verbose: cli.verbose,
        json: cli.log_json,
        file: cli.log_file.clone(),
    })
    .map_err(|e| miette::miette!("{:#}", e))?;

    let session = StowageSession {
        store: cli.store,
        command: cli.command,
    };

    // Initialize and run starbase App
    let exit_code = App::default()
        .run(
            session,
            |mut session| async move { session.execute().await },
        )
        .await?;

    Ok(std::process::ExitCode::from(exit_code))
}
