//! Error types for Ptask

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Ptask operations
pub type Result<T> = std::result::Result<T, PtaskError>;

/// Process exit code for structural failures: unknown tasks, dependency
/// cycles, duplicate registrations, malformed definition sources. Kept
/// outside the small codes task commands conventionally exit with, and
/// clear of 126/127 which shells reserve.
pub const STRUCTURAL_EXIT_CODE: i32 = 125;

/// Process exit code when a running task is interrupted (128 + SIGINT).
pub const INTERRUPT_EXIT_CODE: i32 = 130;

/// Main error type for Ptask
#[derive(Error, Debug)]
pub enum PtaskError {
    /// Definition-source errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Structural errors in the task graph
    #[error("{0}")]
    Resolve(#[from] ResolveError),

    /// Task execution errors
    #[error("{0}")]
    Execution(#[from] ExecutionError),

    /// Variable interpolation errors
    #[error("interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PtaskError {
    /// Map this error to the process exit status.
    ///
    /// Command failures forward the child's own exit code; everything
    /// structural (bad graph, bad definitions) uses a code outside the
    /// range ordinary commands exit with, so callers can tell "the task
    /// failed" apart from "the runner refused".
    pub fn exit_code(&self) -> i32 {
        match self {
            PtaskError::Execution(e) => e.exit_code(),
            PtaskError::Config(_)
            | PtaskError::Resolve(_)
            | PtaskError::Interpolation(_)
            | PtaskError::Io(_)
            | PtaskError::Yaml(_) => STRUCTURAL_EXIT_CODE,
        }
    }
}

/// Definition-source reading and parsing errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read task definitions '{path}': {error}")]
    Source { path: PathBuf, error: String },
}

/// Structural errors in the task graph, surfaced before anything runs
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("task '{0}' is not defined")]
    UnknownTask(String),

    #[error("cyclic task dependency: {0}")]
    CyclicDependency(String),

    #[error("task '{name}' is declared more than once in {source_label}")]
    DuplicateTask { name: String, source_label: String },
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("environment descriptor '{0}' not found (run `pl setup` first)")]
    EnvironmentNotFound(PathBuf),

    #[error("environment descriptor '{path}' is unreadable: {error}")]
    EnvironmentInvalid { path: PathBuf, error: String },

    #[error("task '{task}' failed with exit code {code}")]
    CommandFailed { task: String, code: i32 },

    #[error("task '{task}' was interrupted")]
    Interrupted { task: String },

    #[error("failed to spawn command for task '{task}': {error}")]
    Spawn { task: String, error: String },
}

impl ExecutionError {
    /// Exit status for the failing invocation.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionError::CommandFailed { code, .. } => *code,
            ExecutionError::Interrupted { .. } => INTERRUPT_EXIT_CODE,
            // 127 is the shell's own "cannot run this" code
            ExecutionError::Spawn { .. } => 127,
            ExecutionError::EnvironmentNotFound(_)
            | ExecutionError::EnvironmentInvalid { .. } => 1,
        }
    }
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("recursive interpolation detected")]
    RecursiveInterpolation,
}

/// Specialized result type for graph resolution operations
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;
