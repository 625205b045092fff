//! Task registry
//!
//! The registry holds every declared task for one process run. It is built
//! by an ordered sequence of `load` calls, one per definition source, and
//! then finalized: prerequisite names are resolved to typed [`TaskId`]s
//! exactly once, so unknown names surface before anything executes. After
//! finalization the registry is read-only.

use crate::config::{self, Source};
use crate::error::{ResolveError, ResolveResult};
use crate::runner::Command;
use std::collections::HashMap;

/// Typed reference to a registered task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(usize);

/// Runtime task representation
///
/// This differs from [`config::Task`] by carrying resolved prerequisite ids
/// and runtime commands instead of raw names and YAML values.
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name
    pub name: String,

    /// Usage description
    pub usage: Option<String>,

    /// Whether this task is hidden from task listings
    pub internal: bool,

    /// Whether this task runs inside the activated project environment
    pub requires_env: bool,

    /// Prerequisite tasks, in declared order
    pub needs: Vec<TaskId>,

    /// Commands to execute; empty for aggregate tasks
    pub commands: Vec<Command>,

    /// Label of the source that declared this task
    pub source: String,
}

/// The finalized, read-only task registry
#[derive(Debug)]
pub struct Registry {
    tasks: Vec<Task>,
    index: HashMap<String, TaskId>,
}

impl Registry {
    /// Build a registry from an ordered list of definition sources
    pub fn from_sources(sources: &[Source]) -> ResolveResult<Self> {
        let mut builder = RegistryBuilder::new();
        for source in sources {
            builder.load(source)?;
        }
        builder.finalize()
    }

    /// Look up a task by name
    pub fn lookup(&self, name: &str) -> ResolveResult<TaskId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ResolveError::UnknownTask(name.to_string()))
    }

    /// Get a task by id
    pub fn get(&self, id: TaskId) -> &Task {
        &self.tasks[id.0]
    }

    /// Iterate over all registered tasks
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &Task)> {
        self.tasks.iter().enumerate().map(|(i, t)| (TaskId(i), t))
    }

    /// Number of registered tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Raw entry held between `load` and `finalize`
#[derive(Debug, Clone)]
struct RawEntry {
    name: String,
    def: config::Task,
    source: String,
}

/// Accumulates sources before prerequisite names are resolved
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<RawEntry>,
    index: HashMap<String, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one definition source into the namespace
    pub fn load(&mut self, source: &Source) -> ResolveResult<()> {
        // Intra-source declaration order carries no meaning; sort for
        // deterministic task ids.
        let mut names: Vec<&String> = source.config.tasks.keys().collect();
        names.sort();

        for name in names {
            let def = source.config.tasks[name].clone();
            self.register(name, def, &source.label)?;
        }

        Ok(())
    }

    /// Register a single task declaration
    ///
    /// A name seen again from the same source is an error; a name seen from
    /// a later source shadows the earlier definition, keeping its id so
    /// already-issued references stay valid.
    pub fn register(
        &mut self,
        name: &str,
        def: config::Task,
        source_label: &str,
    ) -> ResolveResult<()> {
        if let Some(&slot) = self.index.get(name) {
            if self.entries[slot].source == source_label {
                return Err(ResolveError::DuplicateTask {
                    name: name.to_string(),
                    source_label: source_label.to_string(),
                });
            }
            self.entries[slot] = RawEntry {
                name: name.to_string(),
                def,
                source: source_label.to_string(),
            };
        } else {
            self.index.insert(name.to_string(), self.entries.len());
            self.entries.push(RawEntry {
                name: name.to_string(),
                def,
                source: source_label.to_string(),
            });
        }

        Ok(())
    }

    /// Resolve prerequisite names to typed ids and freeze the registry
    pub fn finalize(self) -> ResolveResult<Registry> {
        let index: HashMap<String, TaskId> = self
            .index
            .iter()
            .map(|(name, &slot)| (name.clone(), TaskId(slot)))
            .collect();

        let mut tasks = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            let mut needs = Vec::with_capacity(entry.def.needs.len());
            for dep in &entry.def.needs {
                let id = index
                    .get(dep)
                    .copied()
                    .ok_or_else(|| ResolveError::UnknownTask(dep.clone()))?;
                needs.push(id);
            }

            tasks.push(Task {
                name: entry.name,
                usage: entry.def.usage,
                internal: entry.def.internal,
                requires_env: entry.def.env,
                needs,
                commands: entry.def.run.into_iter().map(Command::from_config).collect(),
                source: entry.source,
            });
        }

        Ok(Registry { tasks, index })
    }
}
