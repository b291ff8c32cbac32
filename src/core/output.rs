//! Unified output formatting utilities for consistent CLI presentation.
//!
//! # Design Principles
//! - **Consistent color scheme**: Red for errors, green for success, blue for folder ids
//! - **Standardized spacing**: Newline before and after command output
//! - **Muted details**: Counts and keys in bright_black

use colored::*;

/// Formats and prints an error message with consistent styling
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a success message with consistent styling
///
/// # Format
/// ```text
///
/// ✓ <message>
/// ```
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message with consistent styling
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Formats and prints a section header with consistent styling
///
/// # Format
/// ```text
///
/// <header>:
///
/// ```
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// One folder per line: `[id] name (n bookmarks)`, with `*` on the active folder.
pub fn print_folder_line(id: u32, name: &str, bookmark_count: usize, active: bool) {
    let marker = if active { "*".green() } else { " ".normal() };
    let noun = if bookmark_count == 1 {
        "bookmark"
    } else {
        "bookmarks"
    };
    println!(
        "{} {} {} {}",
        marker,
        format!("[{id}]").blue(),
        name.white(),
        format!("({bookmark_count} {noun})").bright_black()
    );
}
