//! Execution context for task running
//!
//! The context tracks the state shared by every command in a run: the
//! project root, exported variables, the interpreter, and how chatty the
//! output is. Progress lines go to stdout, diagnostics to stderr.

use colored::Colorize;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Execution context shared by all tasks in one invocation
pub struct Context {
    /// Project root; working directory for commands
    pub project_root: PathBuf,

    /// Variables exported into every command's environment
    pub vars: HashMap<String, String>,

    /// Command interpreter (e.g., ["sh", "-c"])
    pub interpreter: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            project_root: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            vars: HashMap::new(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            verbosity: Verbosity::Normal,
        }
    }

    /// Set the project root
    pub fn with_project_root(mut self, root: PathBuf) -> Self {
        self.project_root = root;
        self
    }

    /// Set variables
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set a single variable
    pub fn set_var(&mut self, key: String, value: String) {
        self.vars.insert(key, value);
    }

    /// Get a variable value
    pub fn get_var(&self, key: &str) -> Option<&String> {
        self.vars.get(key)
    }

    /// Print a task start boundary
    pub fn print_task_start(&self, task_name: &str) {
        if self.verbosity >= Verbosity::Normal {
            println!("{} {}", "==>".cyan().bold(), task_name.bold());
        }
    }

    /// Print a task end boundary
    pub fn print_task_ok(&self, task_name: &str) {
        if self.verbosity >= Verbosity::Normal {
            println!("{} {}", "ok:".green().bold(), task_name);
        }
    }

    /// Print the final confirmation after a fully successful chain
    pub fn print_summary(&self, count: usize) {
        if self.verbosity >= Verbosity::Normal {
            println!(
                "{} {} task{} completed",
                "done:".green().bold(),
                count,
                if count == 1 { "" } else { "s" }
            );
        }
    }

    /// Print a command echo
    pub fn print_command(&self, rendered: &str) {
        if self.verbosity >= Verbosity::Normal {
            println!("{} {}", "$".dimmed(), rendered);
        }
    }

    /// Print a debug message (only in verbose mode)
    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("{} {}", "debug:".dimmed(), message);
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
