use super::Session;
use anyhow::Result;
use colored::*;
use std::path::Path;

pub fn envs_command(config_path: Option<&Path>) -> Result<()> {
    let session = Session::load(config_path)?;
    let config = &session.config;

    if config.environments.is_empty() {
        println!("  {}", "⚠️  No environments configured".bright_yellow().bold());
        println!("  Add one to {}", config.path.display().to_string().cyan());
        return Ok(());
    }

    println!("{}", "Configured environments:".bold());
    for env in &config.environments {
        println!(
            "  {} {}",
            "•".bright_blue(),
            env.name.bright_white().bold()
        );
        println!(
            "      {} {}   {} {}",
            "region:".dimmed(),
            env.region.to_string().cyan(),
            "tenant:".dimmed(),
            env.tenant_id
        );
    }

    Ok(())
}
