//! Task registration, the runtime-floor gate, and execution ordering.
//!
//! The orchestrator wires the other modules into the two generation tasks the
//! build pipeline sees. Three rules from the surrounding build's lifecycle are
//! enforced here:
//!
//! - **Setup gate**: the host build runtime must be at least the supported floor.
//!   Checked once when the orchestrator is constructed, before any task exists.
//! - **Lazy classpaths**: a task's classpath is a stored zero-argument source,
//!   invoked when the task executes, never at registration. Dependency coordinates
//!   are only final at the configuration-freeze boundary, which lies after task
//!   registration; eager resolution would capture a half-built dependency graph.
//! - **Purge before generate**: each task deletes its stale output (when the purge
//!   flag is set) immediately before the generator is invoked, so the generator
//!   always writes into a clean target.
//!
//! The generator tools themselves sit behind [`GeneratorRunner`]; resolving
//! coordinates to files sits behind [`FileSetResolver`]. Both are collaborators
//! provided by the caller.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};

use crate::classpath::{self, LexerToolPredicate, ParserLibraryPredicate, ResolvedFileSet};
use crate::config::FrozenConfig;
use crate::constants::MINIMUM_HOST_RUNTIME_VERSION;
use crate::core::{GenError, Result};
use crate::purge::purge_outputs;

/// Version of the host build runtime, parsed leniently.
///
/// Host runtimes report two-component versions (`"8.5"`) and occasionally a `v`
/// prefix; missing components are padded with zeros before the semver comparison.
#[derive(Debug, Clone)]
pub struct HostRuntime {
    version: semver::Version,
}

impl HostRuntime {
    /// Parses a host runtime version string.
    pub fn new(version: &str) -> Result<Self> {
        let trimmed = version.trim().trim_start_matches('v');
        let mut parts: Vec<&str> = trimmed.splitn(3, '.').collect();
        while parts.len() < 3 {
            parts.push("0");
        }
        let normalized = parts.join(".");
        let parsed = semver::Version::parse(&normalized).map_err(|source| {
            GenError::RuntimeVersionInvalid { version: version.to_string(), source }
        })?;
        Ok(Self { version: parsed })
    }

    /// The parsed runtime version.
    pub fn version(&self) -> &semver::Version {
        &self.version
    }

    fn ensure_supported(&self) -> Result<()> {
        // The floor is a compile-time constant and always parses.
        let floor = semver::Version::parse(MINIMUM_HOST_RUNTIME_VERSION)
            .expect("runtime floor is a valid semver");
        if self.version < floor {
            return Err(GenError::RuntimeVersionTooOld {
                found: self.version.to_string(),
                required: MINIMUM_HOST_RUNTIME_VERSION.to_string(),
            });
        }
        Ok(())
    }
}

/// Resolves the two named dependency-configuration sets to files.
///
/// Implemented by the surrounding build's resolution machinery. Each set is
/// resolved independently; whether results are cached across calls is the
/// implementor's concern.
pub trait FileSetResolver: Send + Sync {
    /// The dedicated, caller-curated generator classpath set (may be empty).
    fn dedicated_classpath(&self) -> anyhow::Result<ResolvedFileSet>;

    /// The ambient compile classpath of the enclosing project.
    fn compile_classpath(&self) -> anyhow::Result<ResolvedFileSet>;
}

/// A stored classpath computation, invoked at task execution time.
pub type ClasspathSource = Box<dyn Fn() -> anyhow::Result<ResolvedFileSet> + Send + Sync>;

/// Which generation task an invocation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// The lexer generation task.
    GenerateLexer,
    /// The parser generation task.
    GenerateParser,
}

/// Everything a generator tool needs for one run.
#[derive(Debug, Clone)]
pub struct GeneratorInvocation {
    /// The task being executed.
    pub task: TaskKind,
    /// Concrete generator-tool version.
    pub generator_version: String,
    /// Concrete lexer-tool version.
    pub lexer_version: String,
    /// The narrowed classpath for this invocation.
    pub classpath: ResolvedFileSet,
    /// Output targets the generator writes (already purged when so configured).
    pub output_paths: Vec<PathBuf>,
}

/// The external generator tool seam.
pub trait GeneratorRunner {
    /// Runs the generator for one prepared invocation.
    fn run(&self, invocation: &GeneratorInvocation) -> anyhow::Result<()>;
}

struct GenerationTask {
    kind: TaskKind,
    classpath: ClasspathSource,
}

/// Wires configuration, classpath selection, and purging into the two tasks.
pub struct TaskOrchestrator {
    config: Arc<FrozenConfig>,
    lexer: GenerationTask,
    parser: GenerationTask,
}

impl TaskOrchestrator {
    /// Registers the two generation tasks against a frozen configuration.
    ///
    /// Fails with [`GenError::RuntimeVersionTooOld`] when the host runtime is below
    /// the supported floor; this is a one-time gate, checked before anything else.
    /// Classpath sources are registered here but not invoked.
    pub fn new(
        config: FrozenConfig,
        host: &HostRuntime,
        file_sets: Arc<dyn FileSetResolver>,
    ) -> Result<Self> {
        host.ensure_supported()?;
        let config = Arc::new(config);

        let lexer_sets = Arc::clone(&file_sets);
        let lexer = GenerationTask {
            kind: TaskKind::GenerateLexer,
            classpath: Box::new(move || {
                let dedicated = lexer_sets.dedicated_classpath()?;
                let ambient = lexer_sets.compile_classpath()?;
                Ok(classpath::select(&dedicated, &ambient, &LexerToolPredicate))
            }),
        };

        let parser_sets = Arc::clone(&file_sets);
        let parser = GenerationTask {
            kind: TaskKind::GenerateParser,
            classpath: Box::new(move || {
                let dedicated = parser_sets.dedicated_classpath()?;
                let ambient = parser_sets.compile_classpath()?;
                Ok(classpath::select(&dedicated, &ambient, &ParserLibraryPredicate))
            }),
        };

        debug!(
            generator = %config.generator_version,
            lexer = %config.lexer_version,
            "generation tasks registered"
        );
        Ok(Self { config, lexer, parser })
    }

    /// The frozen configuration the tasks were registered against.
    pub fn config(&self) -> &FrozenConfig {
        &self.config
    }

    /// Executes the lexer generation task: purge, resolve classpath, run.
    pub async fn run_lexer(&self, runner: &dyn GeneratorRunner) -> anyhow::Result<()> {
        let task = &self.config.lexer;
        self.execute(
            &self.lexer,
            vec![task.output_file.clone()],
            task.purge_old_files,
            runner,
        )
        .await
    }

    /// Executes the parser generation task.
    ///
    /// The parser-code and PSI-root directories are purged independently; both are
    /// handed to the generator as output targets.
    pub async fn run_parser(&self, runner: &dyn GeneratorRunner) -> anyhow::Result<()> {
        let task = &self.config.parser;
        self.execute(
            &self.parser,
            vec![task.parser_dir.clone(), task.psi_dir.clone()],
            task.purge_old_files,
            runner,
        )
        .await
    }

    /// Executes both generation tasks, lexer first.
    pub async fn run_all(&self, runner: &dyn GeneratorRunner) -> anyhow::Result<()> {
        self.run_lexer(runner).await?;
        self.run_parser(runner).await
    }

    async fn execute(
        &self,
        task: &GenerationTask,
        output_paths: Vec<PathBuf>,
        purge_old_files: bool,
        runner: &dyn GeneratorRunner,
    ) -> anyhow::Result<()> {
        purge_outputs(&output_paths, purge_old_files)
            .await
            .with_context(|| format!("failed to clean outputs for {:?}", task.kind))?;

        let classpath = (task.classpath)()
            .with_context(|| format!("failed to resolve the classpath for {:?}", task.kind))?;
        info!(task = ?task.kind, classpath_entries = classpath.len(), "running generator");

        let invocation = GeneratorInvocation {
            task: task.kind,
            generator_version: self.config.generator_version.clone(),
            lexer_version: self.config.lexer_version.clone(),
            classpath,
            output_paths,
        };
        runner
            .run(&invocation)
            .with_context(|| format!("generator execution failed for {:?}", task.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{frozen_config_with_outputs, RecordingRunner, StaticFileSets};
    use std::path::Path;
    use tempfile::TempDir;

    fn jar(dir: &Path, name: &str) -> PathBuf {
        dir.join(name)
    }

    #[test]
    fn runtime_versions_parse_leniently() {
        assert_eq!(HostRuntime::new("8.5").unwrap().version().to_string(), "8.5.0");
        assert_eq!(HostRuntime::new("v8.5.2").unwrap().version().to_string(), "8.5.2");
        assert_eq!(HostRuntime::new("7").unwrap().version().to_string(), "7.0.0");
    }

    #[test]
    fn garbage_runtime_versions_are_rejected() {
        match HostRuntime::new("not-a-version") {
            Err(GenError::RuntimeVersionInvalid { version, .. }) => {
                assert_eq!(version, "not-a-version");
            }
            other => panic!("expected RuntimeVersionInvalid, got {other:?}"),
        }
    }

    #[test]
    fn setup_gate_rejects_runtimes_below_the_floor() {
        let temp = TempDir::new().unwrap();
        let config = frozen_config_with_outputs(temp.path(), None);
        let sets = Arc::new(StaticFileSets::default());

        let host = HostRuntime::new("6.8").unwrap();
        match TaskOrchestrator::new(config.clone(), &host, sets.clone()) {
            Err(GenError::RuntimeVersionTooOld { found, required }) => {
                assert_eq!(found, "6.8.0");
                assert_eq!(required, "7.4.0");
            }
            other => panic!("expected RuntimeVersionTooOld, got {:?}", other.err()),
        }

        let host = HostRuntime::new("7.4").unwrap();
        assert!(TaskOrchestrator::new(config, &host, sets).is_ok());
    }

    #[test]
    fn classpath_sources_are_not_invoked_at_registration() {
        let temp = TempDir::new().unwrap();
        let config = frozen_config_with_outputs(temp.path(), None);
        let sets = Arc::new(StaticFileSets::default());

        let host = HostRuntime::new("8.5").unwrap();
        let _orchestrator = TaskOrchestrator::new(config, &host, sets.clone()).unwrap();

        assert_eq!(sets.resolution_calls(), 0);
    }

    #[tokio::test]
    async fn classpath_is_reevaluated_on_every_run() {
        let temp = TempDir::new().unwrap();
        let config = frozen_config_with_outputs(temp.path(), None);
        let sets = Arc::new(StaticFileSets::default());
        let host = HostRuntime::new("8.5").unwrap();
        let orchestrator = TaskOrchestrator::new(config, &host, sets.clone()).unwrap();
        let runner = RecordingRunner::default();

        orchestrator.run_lexer(&runner).await.unwrap();
        let after_first = sets.resolution_calls();
        orchestrator.run_lexer(&runner).await.unwrap();

        assert!(after_first > 0);
        assert_eq!(sets.resolution_calls(), after_first * 2);
    }

    #[tokio::test]
    async fn lexer_run_purges_then_invokes_the_generator() {
        let temp = TempDir::new().unwrap();
        let mut config = frozen_config_with_outputs(temp.path(), None);
        config.lexer.purge_old_files = true;
        tokio::fs::create_dir_all(config.lexer.output_file.parent().unwrap()).await.unwrap();
        tokio::fs::write(&config.lexer.output_file, "stale").await.unwrap();

        let repo = temp.path().join("repo");
        let sets = Arc::new(StaticFileSets::with_compile(vec![
            jar(&repo, "jflex-1.9.1.jar"),
            jar(&repo, "guava-30.jar"),
        ]));
        let host = HostRuntime::new("8.5").unwrap();
        let orchestrator = TaskOrchestrator::new(config.clone(), &host, sets).unwrap();
        let runner = RecordingRunner::default();

        orchestrator.run_lexer(&runner).await.unwrap();

        assert!(!config.lexer.output_file.exists());
        let invocations = runner.invocations();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].task, TaskKind::GenerateLexer);
        assert_eq!(invocations[0].output_paths, vec![config.lexer.output_file.clone()]);
        assert!(invocations[0].classpath.contains_file_named("jflex-1.9.1.jar"));
        assert!(!invocations[0].classpath.contains_file_named("guava-30.jar"));
    }

    #[tokio::test]
    async fn parser_run_purges_both_sub_paths() {
        let temp = TempDir::new().unwrap();
        let mut config = frozen_config_with_outputs(temp.path(), None);
        config.parser.purge_old_files = true;
        for dir in [&config.parser.parser_dir, &config.parser.psi_dir] {
            tokio::fs::create_dir_all(dir).await.unwrap();
            tokio::fs::write(dir.join("Old.java"), "stale").await.unwrap();
        }

        let repo = temp.path().join("repo");
        let sets = Arc::new(StaticFileSets::with_compile(vec![
            jar(&repo, "guava-30.1.1.jar"),
            jar(&repo, "kotlin-stdlib-1.9.0.jar"),
        ]));
        let host = HostRuntime::new("8.5").unwrap();
        let orchestrator = TaskOrchestrator::new(config.clone(), &host, sets).unwrap();
        let runner = RecordingRunner::default();

        orchestrator.run_parser(&runner).await.unwrap();

        assert!(!config.parser.parser_dir.exists());
        assert!(!config.parser.psi_dir.exists());
        let invocations = runner.invocations();
        assert_eq!(invocations[0].task, TaskKind::GenerateParser);
        assert_eq!(invocations[0].classpath.len(), 1);
        assert!(invocations[0].classpath.contains_file_named("guava-30.1.1.jar"));
    }

    #[tokio::test]
    async fn dedicated_classpath_is_trusted_wholesale() {
        let temp = TempDir::new().unwrap();
        let config = frozen_config_with_outputs(temp.path(), None);
        let repo = temp.path().join("repo");
        let sets = Arc::new(
            StaticFileSets::with_compile(vec![jar(&repo, "jflex-1.9.1.jar")])
                .and_dedicated(vec![jar(&repo, "curated.jar")]),
        );
        let host = HostRuntime::new("8.5").unwrap();
        let orchestrator = TaskOrchestrator::new(config, &host, sets).unwrap();
        let runner = RecordingRunner::default();

        orchestrator.run_lexer(&runner).await.unwrap();

        let invocations = runner.invocations();
        assert_eq!(invocations[0].classpath.len(), 1);
        assert!(invocations[0].classpath.contains_file_named("curated.jar"));
    }

    #[tokio::test]
    async fn run_all_executes_lexer_before_parser() {
        let temp = TempDir::new().unwrap();
        let config = frozen_config_with_outputs(temp.path(), None);
        let sets = Arc::new(StaticFileSets::default());
        let host = HostRuntime::new("8.5").unwrap();
        let orchestrator = TaskOrchestrator::new(config, &host, sets).unwrap();
        let runner = RecordingRunner::default();

        orchestrator.run_all(&runner).await.unwrap();

        let kinds: Vec<_> = runner.invocations().iter().map(|i| i.task).collect();
        assert_eq!(kinds, vec![TaskKind::GenerateLexer, TaskKind::GenerateParser]);
    }
}
