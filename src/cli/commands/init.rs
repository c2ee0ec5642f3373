use anyhow::Result;
use colored::*;
use pingone_forms::config::Config;
use pingone_forms::ui::print_success;
use std::path::Path;

pub fn init_command(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };

    Config::write_example(&path)?;

    print_success(&format!(
        "Example configuration written to {}",
        path.display().to_string().bright_green()
    ));
    println!("  Edit it to add your environments, then run 'pingone-forms auth' to check them.");
    Ok(())
}
