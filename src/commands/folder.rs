use crate::core::{
    command_init::{CommandInit, CommandOptions},
    error::{BookmarkFoldersError, Result},
    output::print_success,
};

pub fn execute_create(options: &CommandOptions, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BookmarkFoldersError::EmptyFolderName);
    }

    let mut context = CommandInit::initialize(options)?;
    let folder = context.storage.create_folder(name);
    log::debug!("Created folder {} in {:?}", folder.id, context.storage.current_namespace());
    context.finish()?;

    print_success(&format!("Created folder [{}] {}", folder.id, folder.name));
    Ok(())
}

pub fn execute_delete(options: &CommandOptions, id: &str) -> Result<()> {
    let id = CommandInit::parse_folder_id(id)?;
    let mut context = CommandInit::initialize(options)?;

    if !context.storage.delete_folder(id) {
        return Err(BookmarkFoldersError::folder_not_found(id));
    }
    context.finish()?;

    print_success(&format!("Deleted folder [{id}]"));
    Ok(())
}

pub fn execute_rename(options: &CommandOptions, id: &str, name: &str) -> Result<()> {
    let id = CommandInit::parse_folder_id(id)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(BookmarkFoldersError::EmptyFolderName);
    }

    let mut context = CommandInit::initialize(options)?;
    if !context.storage.update_folder_name(id, name) {
        return Err(BookmarkFoldersError::folder_not_found(id));
    }
    context.finish()?;

    print_success(&format!("Renamed folder [{id}] to {name}"));
    Ok(())
}
