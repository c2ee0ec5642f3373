use super::Session;
use anyhow::Result;
use clap::Args;
use colored::*;
use pingone_forms::api::FormsApi;
use pingone_forms::forms::export_forms;
use pingone_forms::ui::{print_summary, print_warning, prompt_form_selection, ConsoleReporter};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ExportArgs {
    /// Environment to export from
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,
    /// Directory the JSON files are written to
    #[arg(long, value_name = "DIR", default_value = "forms")]
    pub out: PathBuf,
    /// Export every form without asking
    #[arg(long)]
    pub all: bool,
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

pub async fn export_command(config_path: Option<&Path>, args: ExportArgs) -> Result<()> {
    let session = Session::load(config_path)?;
    let credential =
        session.resolve_environment(args.env.as_deref(), "Environment to export from")?;

    let api = FormsApi::connect(&session.manager, credential).await?;
    let forms = api.list_forms().await?;
    if forms.is_empty() {
        print_warning(&format!("No forms found in '{}'", credential.name));
        return Ok(());
    }

    let selected = if args.all {
        forms
    } else if session.interactive {
        prompt_form_selection(&forms)?
    } else {
        anyhow::bail!("--all is required when not running in a terminal");
    };

    if selected.is_empty() {
        println!("{}", "Nothing selected.".dimmed());
        return Ok(());
    }

    let prompt = format!(
        "Export {} forms from '{}' to {}?",
        selected.len(),
        credential.name,
        args.out.display()
    );
    if !session.confirm(&prompt, args.yes)? {
        println!("{}", "Export cancelled.".dimmed());
        return Ok(());
    }

    println!(
        "📤 Exporting from {} to {}",
        credential.name.bold(),
        args.out.display().to_string().cyan()
    );
    let report = export_forms(&api, &selected, &args.out, &ConsoleReporter).await;
    print_summary("Exported", &report);
    Ok(())
}
