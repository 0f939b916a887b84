//! File actions module.
//!
//! This module provides functionality for:
//! - Removing the deletion candidates of duplicate groups
//! - Permanent deletion (default) or move to system trash
//! - Asking the user before anything is removed
//!
//! ```no_run
//! use dupsweep::actions::delete::permanent_delete;
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate.txt");
//! let result = permanent_delete(&path);
//! ```

pub mod delete;
pub mod prompt;

// Re-export commonly used types
pub use delete::{
    delete_duplicates, delete_to_trash, permanent_delete, validate_survivor, DeleteConfig,
    DeleteError, DeleteMode, DeleteResult, DeleteSummary,
};
pub use prompt::confirm;
