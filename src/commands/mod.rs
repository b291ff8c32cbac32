pub mod active;
pub mod bookmark;
pub mod folder;
pub mod list;
pub mod namespace;

pub use active::*;
pub use bookmark::*;
pub use folder::*;
pub use list::*;
pub use namespace::*;
