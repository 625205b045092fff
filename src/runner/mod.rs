//! Task execution
//!
//! This module holds the dependency resolver, the environment activator,
//! and the engine that runs a resolved plan one command at a time.

pub mod command;
pub mod context;
pub mod engine;
pub mod env;
pub mod interpolate;
pub mod plan;

// Re-export main types
pub use command::*;
pub use context::*;
pub use engine::*;
pub use env::*;
pub use interpolate::*;
pub use plan::*;
