use super::Session;
use anyhow::Result;
use clap::Args;
use colored::*;
use std::path::Path;

#[derive(Args)]
pub struct ListArgs {
    /// Environment to list forms from
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,
}

pub async fn list_command(config_path: Option<&Path>, args: ListArgs) -> Result<()> {
    let session = Session::load(config_path)?;
    let credential = session.resolve_environment(args.env.as_deref(), "Environment to list")?;

    let forms = session.manager.list_forms(credential).await?;

    if forms.is_empty() {
        println!(
            "  {}",
            format!("No forms found in '{}'", credential.name).bright_yellow()
        );
        return Ok(());
    }

    println!(
        "{} ({} forms)",
        credential.name.bold(),
        forms.len().to_string().cyan()
    );
    for form in &forms {
        match form.description.as_deref() {
            Some(description) if !description.is_empty() => println!(
                "  {} {}  {}",
                form.name.bright_white().bold(),
                form.id.dimmed(),
                description.dimmed()
            ),
            _ => println!("  {} {}", form.name.bright_white().bold(), form.id.dimmed()),
        }
    }

    Ok(())
}
