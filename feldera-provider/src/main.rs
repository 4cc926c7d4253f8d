//! feldera-provider: manage a Feldera SQL program from a declaration file.
//!
//! Each invocation drives one lifecycle step for one program and persists
//! the resulting state record to a local JSON file:
//! - `plan` refreshes state and prints the pending changes
//! - `apply` creates or updates the program
//! - `refresh` re-reads the program and corrects drift in the state file
//! - `destroy` deletes the program and discards the state
//! - `import` adopts an existing program by id

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feldera_provider::{
    apply_state, destroy_state, import_state, refresh, refresh_state, DestroyOutcome, HostError,
    Plan, ProgramConfig, ProgramReconciler, ProviderConfig, ProviderContext, ProviderError,
    StateFile,
};

/// Feldera program provider
#[derive(Parser, Debug)]
#[command(name = "feldera-provider", version, about)]
struct Args {
    /// Feldera API endpoint (e.g., http://localhost:8080)
    #[arg(long, env = "FELDERA_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// State file of the managed program
    #[arg(long, default_value = "program.state.json", global = true)]
    state: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the changes apply would make
    Plan {
        /// Program declaration (JSON)
        #[arg(long)]
        config: PathBuf,
    },
    /// Create or update the program to match its declaration
    Apply {
        /// Program declaration (JSON)
        #[arg(long)]
        config: PathBuf,
    },
    /// Re-read the program and update the state file
    Refresh,
    /// Delete the program and discard its state
    Destroy,
    /// Adopt an existing program by id
    Import {
        /// Program id (UUID)
        id: String,
    },
    /// Print the persisted state
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feldera_provider=info,reqwest=warn,hyper=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let state_file = StateFile::new(&args.state);

    match args.command {
        Command::Plan { config } => {
            let reconciler = build_reconciler(args.endpoint)?;
            let declared = ProgramConfig::load(&config).await?;
            let prior = state_file
                .load()
                .await
                .context("Failed to load state")?;
            let current = refresh(&reconciler, prior.as_ref())
                .await
                .map_err(report)?;
            print!("{}", feldera_provider::plan(&declared, current.as_ref()));
        }
        Command::Apply { config } => {
            let reconciler = build_reconciler(args.endpoint)?;
            let declared = ProgramConfig::load(&config).await?;
            let outcome = apply_state(&reconciler, &declared, &state_file)
                .await
                .map_err(report_host)?;
            print!("{}", outcome.plan);
            if !matches!(outcome.plan, Plan::NoOp) {
                info!(
                    "Program {} at version {}",
                    outcome.state.id.as_deref().unwrap_or_default(),
                    outcome.state.version.unwrap_or_default()
                );
            }
        }
        Command::Refresh => {
            let reconciler = build_reconciler(args.endpoint)?;
            if refresh_state(&reconciler, &state_file)
                .await
                .map_err(report_host)?
                .is_none()
            {
                println!("No program to track, state removed");
            }
        }
        Command::Destroy => {
            let reconciler = build_reconciler(args.endpoint)?;
            match destroy_state(&reconciler, &state_file)
                .await
                .map_err(report_host)?
            {
                DestroyOutcome::NoState => {
                    bail!("No state at {}", state_file.path().display())
                }
                DestroyOutcome::Deleted | DestroyOutcome::AlreadyGone => {
                    println!("Program destroyed")
                }
            }
        }
        Command::Import { id } => {
            let reconciler = build_reconciler(args.endpoint)?;
            import_state(&reconciler, &id, &state_file)
                .await
                .map_err(report_host)?;
            println!("Imported program {}", id.trim());
        }
        Command::Show => {
            let prior = state_file
                .load()
                .await
                .context("Failed to load state")?;
            match prior {
                Some(state) => println!("{}", serde_json::to_string_pretty(&state)?),
                None => println!("No state at {}", state_file.path().display()),
            }
        }
    }

    Ok(())
}

/// Build the provider context and the program reconciler.
fn build_reconciler(endpoint: Option<String>) -> Result<ProgramReconciler> {
    let ctx = ProviderContext::configure(&ProviderConfig { endpoint }).map_err(report)?;
    Ok(ProgramReconciler::new(Arc::new(ctx)))
}

/// Attach the diagnostic headline to a provider error.
fn report(e: ProviderError) -> anyhow::Error {
    let summary = e.summary();
    anyhow::Error::new(e).context(summary)
}

fn report_host(e: HostError) -> anyhow::Error {
    match e {
        HostError::Provider(e) => report(e),
        other => anyhow::Error::new(other),
    }
}
