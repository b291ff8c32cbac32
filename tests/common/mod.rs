//! Shared test utilities for bookmark-folders
//!
//! Integration tests run the real binary against a throwaway instance directory.

pub mod assertions;
pub mod instance;
