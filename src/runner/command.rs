//! Command execution
//!
//! This module holds the runtime command representation and the code that
//! hands a single command to the shell.

use crate::config;
use crate::error::ExecutionError;
use crate::runner::{interpolate, Context};
use std::process::{Command as StdCommand, Stdio};

/// Runtime representation of a command
#[derive(Debug, Clone)]
pub enum Command {
    /// Simple command string
    Simple(String),

    /// Complex command with options
    Complex {
        exec: String,
        print: String,
        quiet: bool,
        dir: Option<String>,
    },
}

impl Command {
    /// Create from a definition-source command
    pub fn from_config(config: config::Command) -> Self {
        match config {
            config::Command::Simple(cmd) => Command::Simple(cmd),
            config::Command::Complex(detail) => Command::Complex {
                print: detail.print.clone().unwrap_or_else(|| detail.exec.clone()),
                exec: detail.exec,
                quiet: detail.quiet,
                dir: detail.dir,
            },
        }
    }

    /// Get the command to execute
    pub fn exec(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { exec, .. } => exec,
        }
    }

    /// Get what to print
    pub fn print(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { print, .. } => print,
        }
    }

    /// Check if the command echo is suppressed
    pub fn is_quiet(&self) -> bool {
        match self {
            Command::Simple(_) => false,
            Command::Complex { quiet, .. } => *quiet,
        }
    }

    /// Get the working directory
    pub fn dir(&self) -> Option<&str> {
        match self {
            Command::Simple(_) => None,
            Command::Complex { dir, .. } => dir.as_deref(),
        }
    }
}

/// Execute a command on behalf of the named task
pub fn execute_command(task: &str, cmd: &Command, ctx: &Context) -> crate::Result<()> {
    let exec_str = interpolate(cmd.exec(), &ctx.vars)?;

    if !cmd.is_quiet() {
        let print_str =
            interpolate(cmd.print(), &ctx.vars).unwrap_or_else(|_| cmd.print().to_string());
        ctx.print_command(&print_str);
    }

    // Determine working directory
    let working_dir = if let Some(dir) = cmd.dir() {
        let interpolated_dir = interpolate(dir, &ctx.vars)?;
        ctx.project_root.join(interpolated_dir)
    } else {
        ctx.project_root.clone()
    };

    // Build the command
    let mut command = StdCommand::new(&ctx.interpreter[0]);

    // Add interpreter args (e.g., "-c" for sh/bash)
    if ctx.interpreter.len() > 1 {
        command.args(&ctx.interpreter[1..]);
    }

    // Add the actual command to execute
    command.arg(&exec_str);

    command.current_dir(&working_dir);

    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    // Export context variables to the child
    for (key, value) in &ctx.vars {
        command.env(key, value);
    }

    let status = command.status().map_err(|e| ExecutionError::Spawn {
        task: task.to_string(),
        error: e.to_string(),
    })?;

    if status.success() {
        return Ok(());
    }

    // A child killed by a signal reports no exit code
    match status.code() {
        Some(code) => Err(ExecutionError::CommandFailed {
            task: task.to_string(),
            code,
        }
        .into()),
        None => Err(ExecutionError::Interrupted {
            task: task.to_string(),
        }
        .into()),
    }
}
