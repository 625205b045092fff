//! Environment activation
//!
//! Tasks flagged as environment-requiring run inside the project
//! environment: the descriptor file written by the environment installer is
//! parsed as `KEY=VALUE` lines, its variables are applied to the process
//! environment after saving the prior values, and a guard restores them when
//! the wrapped execution ends, however it ends.

use crate::error::{ExecutionError, ExecutionResult};
use std::cell::Cell;
use std::env;
use std::path::PathBuf;

/// Default descriptor location, relative to the project root
pub const DEFAULT_ENV_DESCRIPTOR: &str = ".venv/activate.env";

/// Scoped activator for the project environment
///
/// At most one activation is live at a time; a nested request runs its body
/// inside the existing activation instead of re-applying the descriptor.
#[derive(Debug)]
pub struct Activator {
    descriptor: PathBuf,
    active: Cell<bool>,
}

impl Activator {
    /// Create an activator for the descriptor at the given path
    pub fn new(descriptor: PathBuf) -> Self {
        Activator {
            descriptor,
            active: Cell::new(false),
        }
    }

    /// Whether an activation is currently live
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Run `body` inside the activated environment
    ///
    /// Activation state never outlives this call: the guard restores the
    /// saved variables on success, on error, and while unwinding.
    pub fn with_environment<T, E>(
        &self,
        body: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<ExecutionError>,
    {
        if self.active.get() {
            // Reuse the live activation
            return body();
        }

        let vars = self.load_descriptor().map_err(E::from)?;
        let _guard = EnvGuard::activate(self, vars);
        body()
    }

    /// Read the descriptor into a list of variable assignments
    fn load_descriptor(&self) -> ExecutionResult<Vec<(String, String)>> {
        if !self.descriptor.is_file() {
            return Err(ExecutionError::EnvironmentNotFound(self.descriptor.clone()));
        }

        let iter = dotenvy::from_path_iter(&self.descriptor).map_err(|e| {
            ExecutionError::EnvironmentInvalid {
                path: self.descriptor.clone(),
                error: e.to_string(),
            }
        })?;

        let mut vars = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| ExecutionError::EnvironmentInvalid {
                path: self.descriptor.clone(),
                error: e.to_string(),
            })?;
            vars.push((key, value));
        }

        Ok(vars)
    }
}

/// Live activation: saved variable values, restored on drop
struct EnvGuard<'a> {
    activator: &'a Activator,
    saved: Vec<(String, Option<String>)>,
}

impl<'a> EnvGuard<'a> {
    fn activate(activator: &'a Activator, vars: Vec<(String, String)>) -> Self {
        let mut saved = Vec::with_capacity(vars.len());
        for (key, value) in vars {
            saved.push((key.clone(), env::var(&key).ok()));
            env::set_var(&key, &value);
        }
        activator.active.set(true);
        EnvGuard { activator, saved }
    }
}

impl Drop for EnvGuard<'_> {
    fn drop(&mut self) {
        // Restore in reverse in case the descriptor set a key twice
        for (key, old) in self.saved.drain(..).rev() {
            match old {
                Some(value) => env::set_var(&key, value),
                None => env::remove_var(&key),
            }
        }
        self.activator.active.set(false);
    }
}
