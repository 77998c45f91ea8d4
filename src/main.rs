use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use drydock::commands::{self, serve::ServeOptions};

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Scaffold projects, push them to GitHub, open them in github.dev", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the provisioning daemon
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = 8000)]
        port: u16,

        /// Directory that holds provisioned projects (overrides DRYDOCK_PROJECTS_ROOT)
        #[arg(long)]
        projects_root: Option<PathBuf>,
    },

    /// Check environment and credentials
    Doctor,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            projects_root,
        } => {
            commands::serve::execute(ServeOptions {
                host,
                port,
                projects_root,
            })?;
        }
        Commands::Doctor => {
            let exit_code = commands::doctor::execute()?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
