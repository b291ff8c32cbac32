use crate::core::{
    command_init::{CommandInit, CommandOptions},
    error::{BookmarkFoldersError, Result},
    output::{print_folder_line, print_info, print_section_header},
};
use crate::storage::ingredients::ingredient_label;
use colored::*;

pub fn execute_list(options: &CommandOptions) -> Result<()> {
    let mut context = CommandInit::initialize(options)?;
    let storage = &mut context.storage;

    let folders = storage.all_folders();
    let active = storage.last_active_folder_id();
    let namespace = storage.current_namespace().unwrap_or("?").to_string();

    if folders.is_empty() {
        print_info(&format!(
            "No folders in namespace '{namespace}'. Create one with: bookmark-folders create <name>"
        ));
        return context.finish();
    }

    print_section_header(&format!("Folders in '{namespace}'"));
    for folder in &folders {
        print_folder_line(
            folder.id,
            &folder.name,
            folder.bookmark_keys.len(),
            active == Some(folder.id),
        );
    }
    println!();

    context.finish()
}

pub fn execute_show(options: &CommandOptions, id: &str) -> Result<()> {
    let id = CommandInit::parse_folder_id(id)?;
    let mut context = CommandInit::initialize(options)?;
    let storage = &mut context.storage;

    let folder = storage
        .folder(id)
        .ok_or_else(|| BookmarkFoldersError::folder_not_found(id))?;
    let entries = storage.folder_ingredients(id).unwrap_or_default();

    print_section_header(&format!("[{}] {}", folder.id, folder.name));
    if entries.is_empty() {
        println!("  {}", "(empty)".bright_black());
    }
    for (index, (key, ingredient)) in entries.iter().enumerate() {
        let label = match ingredient.as_ref().and_then(ingredient_label) {
            Some(label) if label != key.as_str() => {
                format!("{} {}", label.white(), format!("<{key}>").bright_black())
            }
            Some(_) => key.white().to_string(),
            None => format!("{} {}", key.white(), "(unresolved)".bright_black()),
        };
        println!("  {:>3}. {}", index + 1, label);
    }
    println!();

    context.finish()
}
