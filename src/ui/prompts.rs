use crate::api::models::{EnvironmentCredential, FormSummary};
use crate::forms::LocalFormFile;
use anyhow::Result;
use dialoguer::{Input, MultiSelect, Select};

/// Interactive confirmation prompt using arrow-key navigable selection
///
/// # Arguments
/// * `prompt` - The question to ask the user
/// * `default_yes` - Whether "Yes" should be the default selection (index 0)
///
/// # Returns
/// * `Ok(true)` if user selects "Yes"
/// * `Ok(false)` if user selects "No"
pub fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = vec!["Yes", "No"];
    let default_index = if default_yes { 0 } else { 1 };

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(selection == 0)
}

pub fn prompt_environment_selection<'a>(
    prompt: &str,
    environments: &'a [EnvironmentCredential],
) -> Result<&'a EnvironmentCredential> {
    if environments.is_empty() {
        anyhow::bail!("No environments configured");
    }

    let items: Vec<String> = environments
        .iter()
        .map(|env| format!("{} ({}, {})", env.name, env.region, env.tenant_id))
        .collect();

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;

    Ok(&environments[selection])
}

/// Pick forms to export; returns them in list order
pub fn prompt_form_selection(forms: &[FormSummary]) -> Result<Vec<FormSummary>> {
    let items: Vec<String> = forms
        .iter()
        .map(|form| match &form.description {
            Some(description) if !description.is_empty() => {
                format!("{} - {}", form.name, description)
            }
            _ => form.name.clone(),
        })
        .collect();

    let selection = MultiSelect::new()
        .with_prompt("Select forms to export (space to toggle, enter to confirm)")
        .items(&items)
        .interact()?;

    Ok(selection.into_iter().map(|i| forms[i].clone()).collect())
}

/// Pick files to import; returns them in selection order
pub fn prompt_file_selection(files: &[LocalFormFile]) -> Result<Vec<LocalFormFile>> {
    let items: Vec<String> = files
        .iter()
        .map(|file| {
            let file_name = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("{} ({})", file.name, file_name)
        })
        .collect();

    let selection = MultiSelect::new()
        .with_prompt("Select files to import (space to toggle, enter to confirm)")
        .items(&items)
        .interact()?;

    Ok(selection.into_iter().map(|i| files[i].clone()).collect())
}

/// Ask for the name a form should get in the target environment
pub fn prompt_form_name(current: &str) -> Result<String> {
    let name = Input::<String>::new()
        .with_prompt(format!("Name for '{}' in the target environment", current))
        .default(current.to_string())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Name must not be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    Ok(name.trim().to_string())
}
