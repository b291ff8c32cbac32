//! Folder document (de)serialization.
//!
//! The on-disk schema lives only in this module; the rest of the crate works with
//! [`Folder`] and [`ParsedDocument`]. Documents are pretty-printed JSON:
//!
//! ```text
//! {
//!   "nextId": 3,
//!   "activeFolder": 1,
//!   "folders": [
//!     { "id": 1, "name": "Ores", "bookmarks": ["ore_iron", "ore_gold"] },
//!     { "id": 2, "name": "Tools", "bookmarks": [] }
//!   ]
//! }
//! ```
//!
//! `activeFolder` is omitted when no folder is active. A document that cannot be
//! parsed yields no data at all, never an empty folder list.

use crate::core::error::{BookmarkFoldersError, Result};
use crate::core::state::{Folder, ParsedDocument};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDocument {
    #[serde(default)]
    next_id: Option<u32>,
    #[serde(default, rename = "activeFolder", skip_serializing_if = "Option::is_none")]
    active_folder: Option<u32>,
    folders: Vec<WireFolder>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFolder {
    id: u32,
    name: String,
    #[serde(default)]
    bookmarks: Vec<String>,
}

pub struct DocumentSerializer;

impl DocumentSerializer {
    pub fn serialize<'a>(
        folders: impl IntoIterator<Item = &'a Folder>,
        next_id: u32,
        active_folder_id: Option<u32>,
    ) -> Result<String> {
        let document = WireDocument {
            next_id: Some(next_id),
            active_folder: active_folder_id,
            folders: folders
                .into_iter()
                .map(|folder| WireFolder {
                    id: folder.id,
                    name: folder.name.clone(),
                    bookmarks: folder.bookmark_keys.clone(),
                })
                .collect(),
        };

        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// `None` means "no usable data"; the reason is logged.
    pub fn deserialize(text: &str) -> Option<ParsedDocument> {
        match Self::parse_document(text) {
            Ok(document) => Some(document),
            Err(e) => {
                log::warn!("Ignoring unreadable folder document: {e}");
                None
            }
        }
    }

    pub fn parse_document(text: &str) -> Result<ParsedDocument> {
        let wire: WireDocument = serde_json::from_str(text)
            .map_err(|e| BookmarkFoldersError::malformed_document(e.to_string()))?;

        let mut folders = BTreeMap::new();
        for wire_folder in wire.folders {
            if wire_folder.id == 0 {
                return Err(BookmarkFoldersError::ZeroFolderId);
            }
            if folders.contains_key(&wire_folder.id) {
                return Err(BookmarkFoldersError::DuplicateFolderId { id: wire_folder.id });
            }

            let mut folder = Folder::new(wire_folder.id, wire_folder.name);
            for key in wire_folder.bookmarks {
                folder.push_bookmark(key);
            }
            folders.insert(folder.id, folder);
        }

        let next_id = match wire.next_id {
            Some(next_id) => next_id,
            None => match folders.keys().next_back() {
                None => 1,
                Some(max) => max.checked_add(1).ok_or_else(|| {
                    BookmarkFoldersError::malformed_document(format!(
                        "no id left after folder {max}; nextId is required"
                    ))
                })?,
            },
        };

        Ok(ParsedDocument {
            folders,
            next_id,
            active_folder_id: wire.active_folder,
        })
    }
}
