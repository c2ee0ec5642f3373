use super::Session;
use anyhow::Result;
use clap::Args;
use colored::*;
use log::info;
use pingone_forms::ui::print_success;
use std::path::Path;
use std::time::Instant;

#[derive(Args)]
pub struct AuthArgs {
    /// Environment to authenticate against
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,
}

pub async fn auth_command(config_path: Option<&Path>, args: AuthArgs) -> Result<()> {
    let session = Session::load(config_path)?;
    let credential =
        session.resolve_environment(args.env.as_deref(), "Environment to authenticate against")?;

    let token_url = session
        .manager
        .auth_manager()
        .platform()
        .token_url(credential.region, &credential.tenant_id);
    println!("🔐 Requesting token from {}", token_url.dimmed());

    let start = Instant::now();
    session.manager.get_access_token(credential).await?;
    info!("Token check for '{}' succeeded", credential.name);

    print_success(&format!(
        "Authenticated to '{}' in {}ms",
        credential.name.bright_green().bold(),
        start.elapsed().as_millis()
    ));
    Ok(())
}
