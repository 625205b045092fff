//! Main CLI application

use crate::config::{
    builtin_sources, find_project_file, merged_settings, parse_source_file, Settings, Source,
};
use crate::error::PtaskError;
use crate::registry::Registry;
use crate::runner::{
    resolve, Activator, Context, Engine, Verbosity, DEFAULT_ENV_DESCRIPTOR,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::env;
use std::io;
use std::path::PathBuf;

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// The finalized task registry
    registry: Registry,
    /// Merged scalar settings from all sources
    settings: Settings,
    /// Project root; commands run here
    root: PathBuf,
}

impl App {
    /// Create a new app, discovering the project definition file if present
    pub fn new() -> Result<Self, PtaskError> {
        Self::from_project_file(find_project_file())
    }

    /// Create an app with a specific project definition file
    pub fn with_project_file(path: PathBuf) -> Result<Self, PtaskError> {
        Self::from_project_file(Some(path))
    }

    fn from_project_file(path: Option<PathBuf>) -> Result<Self, PtaskError> {
        match path {
            Some(path) => {
                let source = parse_source_file(&path)?;
                Self::build(Some((path, source)))
            }
            None => Self::build(None),
        }
    }

    fn build(project: Option<(PathBuf, Source)>) -> Result<Self, PtaskError> {
        let mut sources = builtin_sources()?;

        let root = match project {
            Some((path, source)) => {
                // A bare file name has an empty parent; treat it as cwd
                let root = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => env::current_dir()?,
                };
                sources.push(source);
                root
            }
            None => env::current_dir()?,
        };

        // Project-local .env is ambient for every task
        dotenvy::from_path(root.join(".env")).ok();

        let settings = merged_settings(&sources);
        let registry = Registry::from_sources(&sources)?;
        let command = build_command(&settings);

        Ok(App {
            command,
            registry,
            settings,
            root,
        })
    }

    /// Run the application with command line arguments
    pub fn run(mut self) -> Result<(), PtaskError> {
        let matches = self.command.clone().get_matches();

        let verbosity = get_verbosity(&matches);

        if let Some(shell) = matches.get_one::<Shell>("completions") {
            let name = self.command.get_name().to_string();
            generate(*shell, &mut self.command, name, &mut io::stdout());
            return Ok(());
        }

        if matches.get_flag("list") {
            self.print_tasks();
            return Ok(());
        }

        let requested: Vec<String> = matches
            .get_many::<String>("tasks")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default();

        if requested.is_empty() {
            // No task specified, show help
            self.command.print_help()?;
            println!();
            return Ok(());
        }

        // Resolve before anything runs; structural errors stop the
        // invocation with no partial execution
        let plan = resolve(&self.registry, &requested)?;

        let mut ctx = Context::new()
            .with_project_root(self.root.clone())
            .with_verbosity(verbosity);
        ctx.set_var(
            "PROJECT_ROOT".to_string(),
            self.root.display().to_string(),
        );
        if let Some(interpreter) = &self.settings.interpreter {
            ctx = ctx.with_interpreter(interpreter.clone());
        }

        let descriptor = self.root.join(
            self.settings
                .environment
                .as_deref()
                .unwrap_or(DEFAULT_ENV_DESCRIPTOR),
        );
        let activator = Activator::new(descriptor);

        let mut engine = Engine::new(&self.registry, activator);
        engine.run(&plan, &ctx)?;

        ctx.print_summary(plan.len());

        Ok(())
    }

    /// Print the public tasks with their usage lines
    fn print_tasks(&self) {
        let mut tasks: Vec<_> = self
            .registry
            .iter()
            .map(|(_, task)| task)
            .filter(|task| !task.internal)
            .collect();
        tasks.sort_by(|a, b| a.name.cmp(&b.name));

        for task in tasks {
            println!(
                "  {:<16} {}",
                task.name.bold(),
                task.usage.as_deref().unwrap_or_default()
            );
        }
    }
}

/// Build the clap command from merged settings
fn build_command(settings: &Settings) -> Command {
    Command::new(settings.name.clone().unwrap_or_else(|| "pl".to_string()))
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            settings
                .usage
                .clone()
                .unwrap_or_else(|| "A project-lifecycle task runner".to_string()),
        )
        .arg(
            Arg::new("tasks")
                .value_name("TASK")
                .num_args(0..)
                .help("Task names to run, in order"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to the project task definition file"),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List the available tasks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Generate a shell completion script")
                .value_parser(clap::value_parser!(Shell)),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Run the CLI application with provided arguments
pub fn run() -> Result<(), PtaskError> {
    // Check if --file flag is provided first
    let args: Vec<String> = env::args().collect();
    let file_path = extract_file_arg(&args);

    let app = if let Some(path) = file_path {
        App::with_project_file(path)?
    } else {
        App::new()?
    };

    app.run()
}

/// Extract --file argument before clap parsing
fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    for i in 0..args.len() {
        if (args[i] == "--file" || args[i] == "-f") && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_verbosity_normal() {
        let cmd = Command::new("test")
            .arg(Arg::new("quiet").long("quiet").action(ArgAction::SetTrue))
            .arg(Arg::new("silent").long("silent").action(ArgAction::SetTrue))
            .arg(Arg::new("verbose").long("verbose").action(ArgAction::SetTrue));
        let matches = cmd.get_matches_from(vec!["test"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Normal);
    }

    #[test]
    fn test_get_verbosity_silent_wins() {
        let cmd = Command::new("test")
            .arg(Arg::new("quiet").long("quiet").action(ArgAction::SetTrue))
            .arg(Arg::new("silent").long("silent").action(ArgAction::SetTrue))
            .arg(Arg::new("verbose").long("verbose").action(ArgAction::SetTrue));
        let matches = cmd.get_matches_from(vec!["test", "--silent", "--verbose"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Silent);
    }

    #[test]
    fn test_extract_file_arg() {
        let args = vec![
            "pl".to_string(),
            "--file".to_string(),
            "test.yml".to_string(),
        ];
        let path = extract_file_arg(&args);
        assert_eq!(path, Some(PathBuf::from("test.yml")));
    }

    #[test]
    fn test_extract_file_arg_short() {
        let args = vec!["pl".to_string(), "-f".to_string(), "test.yml".to_string()];
        let path = extract_file_arg(&args);
        assert_eq!(path, Some(PathBuf::from("test.yml")));
    }

    #[test]
    fn test_build_command_default_name() {
        let cmd = build_command(&Settings::default());
        assert_eq!(cmd.get_name(), "pl");
    }

    #[test]
    fn test_multiple_task_names_parse_in_order() {
        let cmd = build_command(&Settings::default());
        let matches = cmd.get_matches_from(vec!["pl", "clean", "test"]);
        let tasks: Vec<&String> = matches.get_many::<String>("tasks").unwrap().collect();
        assert_eq!(tasks, vec!["clean", "test"]);
    }
}
