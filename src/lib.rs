//! Ptask - a project-lifecycle task runner
//!
//! Ptask ships a small set of named, interdependent project tasks (`test`,
//! `clean`, `update`, `setup`) declared in YAML sources, resolves their
//! prerequisite graph into a linear plan, and runs the plan one command at a
//! time, activating the project environment around the tasks that need it.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod runner;

// Re-export commonly used types
pub use error::{PtaskError, Result};
pub use registry::{Registry, Task, TaskId};

/// Current version of Ptask
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
