use crate::core::{
    command_init::{CommandInit, CommandOptions},
    error::{BookmarkFoldersError, Result},
    output::{print_info, print_success},
};

pub fn execute_add(options: &CommandOptions, id: &str, keys: &[String]) -> Result<()> {
    let id = CommandInit::parse_folder_id(id)?;
    if keys.is_empty() {
        return Err(BookmarkFoldersError::operation_rejected(
            "No bookmark keys provided. Usage: bookmark-folders add <id> <key>...",
        ));
    }

    let mut context = CommandInit::initialize(options)?;
    if context.storage.folder(id).is_none() {
        return Err(BookmarkFoldersError::folder_not_found(id));
    }

    let mut added = 0;
    for key in keys.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
        if context.storage.add_bookmark(id, key) {
            added += 1;
        } else {
            log::debug!("Bookmark '{key}' already in folder {id}");
        }
    }
    context.finish()?;

    if added == 0 {
        print_info(&format!("Folder [{id}] already contains every given bookmark"));
    } else {
        print_success(&format!("Added {added} bookmark(s) to folder [{id}]"));
    }
    Ok(())
}

pub fn execute_remove(options: &CommandOptions, id: &str, keys: &[String]) -> Result<()> {
    let id = CommandInit::parse_folder_id(id)?;
    let mut context = CommandInit::initialize(options)?;
    if context.storage.folder(id).is_none() {
        return Err(BookmarkFoldersError::folder_not_found(id));
    }

    let removed = keys
        .iter()
        .filter(|key| context.storage.remove_bookmark(id, key.trim()))
        .count();
    context.finish()?;

    if removed == 0 {
        print_info(&format!("None of the given bookmarks are in folder [{id}]"));
    } else {
        print_success(&format!("Removed {removed} bookmark(s) from folder [{id}]"));
    }
    Ok(())
}

pub fn execute_move(options: &CommandOptions, from: &str, to: &str, key: &str) -> Result<()> {
    let from = CommandInit::parse_folder_id(from)?;
    let to = CommandInit::parse_folder_id(to)?;
    let mut context = CommandInit::initialize(options)?;

    for id in [from, to] {
        if context.storage.folder(id).is_none() {
            return Err(BookmarkFoldersError::folder_not_found(id));
        }
    }
    if !context.storage.move_bookmark(from, to, key) {
        return Err(BookmarkFoldersError::operation_rejected(format!(
            "Cannot move '{key}' from folder [{from}] to folder [{to}]"
        )));
    }
    context.finish()?;

    print_success(&format!("Moved '{key}' from folder [{from}] to folder [{to}]"));
    Ok(())
}
