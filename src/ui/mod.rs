pub mod output;
pub mod prompts;

pub use output::{print_success, print_summary, print_warning, ConsoleReporter};
pub use prompts::{
    prompt_confirmation, prompt_environment_selection, prompt_file_selection, prompt_form_name,
    prompt_form_selection,
};
