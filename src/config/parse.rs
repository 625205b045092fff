//! Definition-source loading and discovery
//!
//! The registry is built from an ordered list of sources: the built-in
//! definitions compiled into the binary, then an optional project-level
//! file found by walking up from the working directory. Later sources
//! shadow earlier ones.

use crate::config::types::Config;
use crate::error::{ConfigError, PtaskError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Project-level definition file names to search for
const PROJECT_FILE_NAMES: &[&str] = &["pl.yml", "pl.yaml"];

/// Built-in collaborator tasks: submodule sync, environment install,
/// dependency install, git-hook install. Opaque to the engine.
const TOOLCHAIN_SOURCE: &str = include_str!("../../tasks/toolchain.yml");

/// Built-in public tasks: test, clean, update, setup.
const PROJECT_SOURCE: &str = include_str!("../../tasks/project.yml");

/// One definition source: a parsed document plus the label used in
/// duplicate-registration errors and task listings.
#[derive(Debug, Clone)]
pub struct Source {
    pub label: String,
    pub config: Config,
}

/// Scalar settings merged across sources (last source that sets one wins)
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub name: Option<String>,
    pub usage: Option<String>,
    pub interpreter: Option<Vec<String>>,
    pub environment: Option<String>,
}

/// Parse a definition source from a YAML string
pub fn parse_source(yaml: &str, label: &str) -> Result<Source, PtaskError> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(Source {
        label: label.to_string(),
        config,
    })
}

/// Parse a definition source from a file
pub fn parse_source_file(path: &Path) -> Result<Source, PtaskError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Source {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    let config: Config =
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Source {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

    Ok(Source {
        label: path.display().to_string(),
        config,
    })
}

/// The built-in definition sources, in their fixed include order
pub fn builtin_sources() -> Result<Vec<Source>, PtaskError> {
    Ok(vec![
        parse_source(TOOLCHAIN_SOURCE, "builtin:toolchain")?,
        parse_source(PROJECT_SOURCE, "builtin:project")?,
    ])
}

/// Find the project definition file by searching current and parent directories
pub fn find_project_file() -> Option<PathBuf> {
    find_project_file_from(env::current_dir().ok()?)
}

/// Find the project definition file starting from a specific directory
pub fn find_project_file_from(start_dir: PathBuf) -> Option<PathBuf> {
    let mut current_dir = start_dir;

    loop {
        for file_name in PROJECT_FILE_NAMES {
            let path = current_dir.join(file_name);
            if path.exists() && path.is_file() {
                return Some(path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return None,
        }
    }
}

/// Merge the scalar settings of an ordered source list
pub fn merged_settings(sources: &[Source]) -> Settings {
    let mut settings = Settings::default();

    for source in sources {
        if let Some(name) = &source.config.name {
            settings.name = Some(name.clone());
        }
        if let Some(usage) = &source.config.usage {
            settings.usage = Some(usage.clone());
        }
        if let Some(interpreter) = &source.config.interpreter {
            settings.interpreter = Some(interpreter.clone());
        }
        if let Some(environment) = &source.config.environment {
            settings.environment = Some(environment.clone());
        }
    }

    settings
}
