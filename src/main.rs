use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gridwatch::Result;
use gridwatch::commands::{run_build, run_chat, run_dashboard, show_status};
use gridwatch::config::{run_interactive_config, show_config};

#[derive(Parser)]
#[command(name = "gridwatch")]
#[command(about = "Monitoring console and knowledge assistant for an offshore wind grid-forming control demo")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the knowledge index from a directory of documents
    Build {
        /// Directory containing source documents (docx, pptx, pdf)
        #[arg(long)]
        docs_dir: Option<PathBuf>,
        /// Directory to write the vector index into
        #[arg(long)]
        index_dir: Option<PathBuf>,
    },
    /// Ask the knowledge assistant questions in an interactive loop
    Chat,
    /// Open the monitoring console with page navigation
    Dashboard,
    /// Show index, configuration, and credential health
    Status,
    /// Configure chat endpoint, chunking, and paths
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            docs_dir,
            index_dir,
        } => {
            run_build(docs_dir, index_dir).await?;
        }
        Commands::Chat => {
            run_chat().await?;
        }
        Commands::Dashboard => {
            run_dashboard().await?;
        }
        Commands::Status => {
            show_status().await?;
        }
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
    }

    Ok(())
}
