//! Run output module.
//!
//! The run log is a plain-text side channel written next to the console
//! output. It records which folders were expanded, every duplicate group,
//! and the number of deleted files.
//!
//! ```no_run
//! use dupsweep::output::RunLog;
//! use std::path::Path;
//!
//! let mut log = RunLog::create(Path::new("result.txt")).unwrap();
//! log.folder(Path::new("/home/user/Downloads")).unwrap();
//! log.finish().unwrap();
//! ```

pub mod report;

pub use report::{RunLog, RunLogError};
