//! Common assertion helpers for command output validation

#![allow(dead_code)]

use predicates::prelude::*;

/// A folder line or header mentioning `[id]` and `name`
pub fn has_folder(id: u32, name: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("[{id}]")).and(predicates::str::contains(name.to_string()))
}

pub fn folder_not_found(id: u32) -> impl Predicate<str> {
    predicates::str::contains(format!("Folder {id} does not exist"))
}

pub fn invalid_folder_id() -> impl Predicate<str> {
    predicates::str::contains("Invalid folder id")
}

pub fn no_folders() -> impl Predicate<str> {
    predicates::str::contains("No folders")
}
