use super::Session;
use anyhow::Result;
use clap::Args;
use colored::*;
use pingone_forms::api::FormsApi;
use pingone_forms::forms::{import_forms, scan_form_files, ImportItem};
use pingone_forms::ui::{
    print_summary, print_warning, prompt_file_selection, prompt_form_name, ConsoleReporter,
};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ImportArgs {
    /// Environment to import into
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,
    /// Directory holding the JSON files
    #[arg(long, value_name = "DIR", default_value = "forms")]
    pub dir: PathBuf,
    /// Import every file without asking
    #[arg(long)]
    pub all: bool,
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
    /// Use the names stored in the files instead of asking for each one
    #[arg(long)]
    pub keep_names: bool,
}

pub async fn import_command(config_path: Option<&Path>, args: ImportArgs) -> Result<()> {
    let session = Session::load(config_path)?;

    let scan = scan_form_files(&args.dir)?;
    for (path, error) in &scan.errors {
        print_warning(&format!("Skipping {}: {}", path.display(), error));
    }
    if scan.files.is_empty() {
        print_warning(&format!("No form files found in {}", args.dir.display()));
        return Ok(());
    }

    let selected = if args.all {
        scan.files
    } else if session.interactive {
        prompt_file_selection(&scan.files)?
    } else {
        anyhow::bail!("--all is required when not running in a terminal");
    };
    if selected.is_empty() {
        println!("{}", "Nothing selected.".dimmed());
        return Ok(());
    }

    let credential =
        session.resolve_environment(args.env.as_deref(), "Environment to import into")?;

    let ask_names = !args.keep_names && session.interactive;
    let mut items = Vec::with_capacity(selected.len());
    for file in selected {
        let target_name = if ask_names {
            prompt_form_name(&file.name)?
        } else {
            file.name.clone()
        };
        items.push(ImportItem { file, target_name });
    }

    let prompt = format!(
        "Create {} forms in '{}'?",
        items.len(),
        credential.name
    );
    if !session.confirm(&prompt, args.yes)? {
        println!("{}", "Import cancelled.".dimmed());
        return Ok(());
    }

    let api = FormsApi::connect(&session.manager, credential).await?;
    println!(
        "📥 Importing into {} from {}",
        credential.name.bold(),
        args.dir.display().to_string().cyan()
    );
    let report = import_forms(&api, &items, &ConsoleReporter).await;
    print_summary("Imported", &report);
    Ok(())
}
