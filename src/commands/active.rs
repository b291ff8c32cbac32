use crate::core::{
    command_init::{CommandInit, CommandOptions},
    error::{BookmarkFoldersError, Result},
    output::{print_info, print_success},
};

/// Shows the active folder, or changes it when `id` or `clear` is given.
pub fn execute_active(options: &CommandOptions, id: Option<&str>, clear: bool) -> Result<()> {
    let requested = id.map(CommandInit::parse_folder_id).transpose()?;
    let mut context = CommandInit::initialize(options)?;

    if clear {
        context.storage.set_last_active_folder_id(None);
        context.finish()?;
        print_success("Cleared the active folder");
        return Ok(());
    }

    if let Some(id) = requested {
        if !context.storage.set_last_active_folder_id(Some(id)) {
            return Err(BookmarkFoldersError::folder_not_found(id));
        }
        context.finish()?;
        print_success(&format!("Folder [{id}] is now active"));
        return Ok(());
    }

    let active = context
        .storage
        .last_active_folder_id()
        .and_then(|id| context.storage.folder(id));
    match active {
        Some(folder) => print_info(&format!("Active folder: [{}] {}", folder.id, folder.name)),
        None => print_info("No active folder"),
    }
    context.finish()
}
