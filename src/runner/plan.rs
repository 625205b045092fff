//! Dependency resolution
//!
//! Turns requested task names into an execution plan: a linear, deduplicated
//! sequence with every prerequisite ahead of its dependent. Resolution is
//! pure; nothing here runs a command.

use crate::error::{ResolveError, ResolveResult};
use crate::registry::{Registry, TaskId};
use std::collections::HashSet;

/// The ordered, deduplicated sequence of tasks to run for one invocation
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    steps: Vec<TaskId>,
}

impl ExecutionPlan {
    /// Tasks in execution order
    pub fn tasks(&self) -> &[TaskId] {
        &self.steps
    }

    /// Number of planned tasks
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan is empty
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Task names in execution order
    pub fn names<'r>(&self, registry: &'r Registry) -> Vec<&'r str> {
        self.steps
            .iter()
            .map(|&id| registry.get(id).name.as_str())
            .collect()
    }
}

/// Resolve requested task names into an execution plan
///
/// Depth-first expansion: for each requested name in order, prerequisites
/// are visited in their declared order before the task itself. A task
/// already planned is skipped, so each task appears at most once however
/// many paths reach it.
pub fn resolve(registry: &Registry, requested: &[String]) -> ResolveResult<ExecutionPlan> {
    let mut planned = HashSet::new();
    let mut expanding = Vec::new();
    let mut steps = Vec::new();

    for name in requested {
        let id = registry.lookup(name)?;
        visit(registry, id, &mut planned, &mut expanding, &mut steps)?;
    }

    Ok(ExecutionPlan { steps })
}

fn visit(
    registry: &Registry,
    id: TaskId,
    planned: &mut HashSet<TaskId>,
    expanding: &mut Vec<TaskId>,
    steps: &mut Vec<TaskId>,
) -> ResolveResult<()> {
    if planned.contains(&id) {
        return Ok(());
    }

    // A task met again while still expanding is a cycle
    if let Some(pos) = expanding.iter().position(|&e| e == id) {
        let mut names: Vec<&str> = expanding[pos..]
            .iter()
            .map(|&e| registry.get(e).name.as_str())
            .collect();
        names.push(registry.get(id).name.as_str());
        return Err(ResolveError::CyclicDependency(names.join(" -> ")));
    }

    expanding.push(id);
    for &dep in &registry.get(id).needs {
        visit(registry, dep, planned, expanding, steps)?;
    }
    expanding.pop();

    planned.insert(id);
    steps.push(id);

    Ok(())
}
