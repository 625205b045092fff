//! Plan execution
//!
//! Runs an execution plan start to end, one task at a time. The first
//! failure halts the chain: later tasks are never started and the failing
//! command's exit status becomes the process exit status.

use crate::registry::{Registry, Task, TaskId};
use crate::runner::{execute_command, Activator, Context, ExecutionPlan};
use std::collections::HashMap;

/// Per-task execution state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Sequential fail-fast executor for a resolved plan
pub struct Engine<'r> {
    registry: &'r Registry,
    activator: Activator,
    states: HashMap<TaskId, TaskState>,
}

impl<'r> Engine<'r> {
    pub fn new(registry: &'r Registry, activator: Activator) -> Self {
        Engine {
            registry,
            activator,
            states: HashMap::new(),
        }
    }

    /// State of a task as of the last `run` call
    pub fn state(&self, id: TaskId) -> TaskState {
        self.states.get(&id).copied().unwrap_or(TaskState::Pending)
    }

    /// Run the plan in order, halting on the first failure
    pub fn run(&mut self, plan: &ExecutionPlan, ctx: &Context) -> crate::Result<()> {
        self.states.clear();
        for &id in plan.tasks() {
            self.states.insert(id, TaskState::Pending);
        }

        ctx.print_debug(&format!("plan: {}", plan.names(self.registry).join(", ")));

        for &id in plan.tasks() {
            let task = self.registry.get(id);

            self.states.insert(id, TaskState::Running);
            ctx.print_task_start(&task.name);

            let result = if task.requires_env {
                self.activator.with_environment(|| run_commands(task, ctx))
            } else {
                run_commands(task, ctx)
            };

            match result {
                Ok(()) => {
                    self.states.insert(id, TaskState::Succeeded);
                    ctx.print_task_ok(&task.name);
                }
                Err(e) => {
                    self.states.insert(id, TaskState::Failed);
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

fn run_commands(task: &Task, ctx: &Context) -> crate::Result<()> {
    for cmd in &task.commands {
        execute_command(&task.name, cmd, ctx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_source;
    use crate::error::{ExecutionError, PtaskError};
    use crate::runner::{resolve, Verbosity};
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    fn registry(yaml: &str) -> Registry {
        Registry::from_sources(&[parse_source(yaml, "test").unwrap()]).unwrap()
    }

    fn silent_ctx(root: &std::path::Path) -> Context {
        Context::new()
            .with_project_root(root.to_path_buf())
            .with_verbosity(Verbosity::Silent)
    }

    #[test]
    fn test_chain_succeeds_and_states_settle() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(
            r#"
tasks:
  first:
    run: echo one > first.txt
  second:
    needs: [first]
    run: echo two > second.txt
"#,
        );
        let plan = resolve(&registry, &["second".to_string()]).unwrap();
        let mut engine = Engine::new(&registry, Activator::new(temp_dir.path().join("none")));

        let result = engine.run(&plan, &silent_ctx(temp_dir.path()));
        assert!(result.is_ok());
        assert!(temp_dir.path().join("first.txt").exists());
        assert!(temp_dir.path().join("second.txt").exists());

        for &id in plan.tasks() {
            assert_eq!(engine.state(id), TaskState::Succeeded);
        }
    }

    #[test]
    fn test_failure_halts_chain_and_skips_rest() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(
            r#"
tasks:
  submodule-sync:
    run: exit 3
  deps-install:
    run: echo ran > deps.txt
  update:
    needs: [submodule-sync, deps-install]
"#,
        );
        let plan = resolve(&registry, &["update".to_string()]).unwrap();
        let mut engine = Engine::new(&registry, Activator::new(temp_dir.path().join("none")));

        let result = engine.run(&plan, &silent_ctx(temp_dir.path()));
        match result {
            Err(PtaskError::Execution(ExecutionError::CommandFailed { task, code })) => {
                assert_eq!(task, "submodule-sync");
                assert_eq!(code, 3);
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }

        // deps-install and update never started
        assert!(!temp_dir.path().join("deps.txt").exists());
        assert_eq!(
            engine.state(registry.lookup("submodule-sync").unwrap()),
            TaskState::Failed
        );
        assert_eq!(
            engine.state(registry.lookup("deps-install").unwrap()),
            TaskState::Pending
        );
        assert_eq!(
            engine.state(registry.lookup("update").unwrap()),
            TaskState::Pending
        );
    }

    #[test]
    fn test_aggregate_task_with_no_commands() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(
            r#"
tasks:
  leaf:
    run: echo ran > leaf.txt
  setup:
    needs: [leaf]
"#,
        );
        let plan = resolve(&registry, &["setup".to_string()]).unwrap();
        let mut engine = Engine::new(&registry, Activator::new(temp_dir.path().join("none")));

        assert!(engine.run(&plan, &silent_ctx(temp_dir.path())).is_ok());
        assert!(temp_dir.path().join("leaf.txt").exists());
    }

    #[test]
    fn test_env_task_sees_descriptor_variables() {
        let temp_dir = TempDir::new().unwrap();
        let descriptor = temp_dir.path().join("activate.env");
        fs::write(&descriptor, "PTASK_ENGINE_TEST_VAR=from-descriptor\n").unwrap();
        env::remove_var("PTASK_ENGINE_TEST_VAR");

        let registry = registry(
            r#"
tasks:
  test:
    env: true
    run: printf '%s' "$PTASK_ENGINE_TEST_VAR" > seen.txt
"#,
        );
        let plan = resolve(&registry, &["test".to_string()]).unwrap();
        let mut engine = Engine::new(&registry, Activator::new(descriptor));

        assert!(engine.run(&plan, &silent_ctx(temp_dir.path())).is_ok());

        let seen = fs::read_to_string(temp_dir.path().join("seen.txt")).unwrap();
        assert_eq!(seen, "from-descriptor");
        // activation did not leak past the task
        assert!(env::var("PTASK_ENGINE_TEST_VAR").is_err());
    }

    #[test]
    fn test_env_task_without_descriptor_fails_before_running() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(
            r#"
tasks:
  test:
    env: true
    run: echo ran > ran.txt
"#,
        );
        let plan = resolve(&registry, &["test".to_string()]).unwrap();
        let mut engine =
            Engine::new(&registry, Activator::new(temp_dir.path().join("missing.env")));

        let result = engine.run(&plan, &silent_ctx(temp_dir.path()));
        assert!(matches!(
            result,
            Err(PtaskError::Execution(ExecutionError::EnvironmentNotFound(_)))
        ));
        assert!(!temp_dir.path().join("ran.txt").exists());
    }
}
