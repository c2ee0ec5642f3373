use anyhow::Result;
use clap::Parser;
use log::{debug, info};

mod cli;

use cli::commands::{
    auth_command, envs_command, export_command, import_command, init_command, list_command,
};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("pingone-forms.log")?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {:?}", path);
    }

    let cli = Cli::parse();
    info!("Starting pingone-forms");

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Envs => envs_command(config_path),
        Commands::List(args) => list_command(config_path, args).await,
        Commands::Export(args) => export_command(config_path, args).await,
        Commands::Import(args) => import_command(config_path, args).await,
        Commands::Auth(args) => auth_command(config_path, args).await,
        Commands::Init => init_command(config_path),
    }
}
