use crate::core::{
    command_init::{CommandInit, CommandOptions},
    error::Result,
    output::print_section_header,
};
use colored::*;

/// Prints which namespace and data file the current environment maps to.
pub fn execute_namespace(options: &CommandOptions) -> Result<()> {
    let mut context = CommandInit::initialize(options)?;
    let storage = &mut context.storage;
    storage.ensure_loaded();

    let namespace = storage.current_namespace().unwrap_or("?").to_string();
    let data_file = storage
        .data_file_path()
        .map(|path| path.display().to_string())
        .unwrap_or_default();

    print_section_header("Storage");
    println!("  {} {}", "Namespace:".bright_black(), namespace.white());
    println!("  {} {}", "Data file:".bright_black(), data_file.white());
    if storage.is_using_fallback_directory() {
        println!(
            "  {}",
            "Namespace directory unavailable; using the default namespace".yellow()
        );
    }
    println!();

    context.finish()
}
