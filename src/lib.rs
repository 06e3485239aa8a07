//! grammargen - classpath resolution and task orchestration for grammar code generation
//!
//! This crate wires two external code-generation tools (a JFlex-style lexer generator
//! and a Grammar-Kit-style parser generator) into a larger build pipeline. The
//! generators themselves are external collaborators; what lives here is the part that
//! is easy to get wrong:
//!
//! - **Version resolution**: turning the `"latest"` sentinel into a concrete release
//!   tag by following a single HTTP redirect, while never touching the network for
//!   explicitly pinned versions.
//! - **Dependency declaration**: choosing between a minimal two-coordinate dependency
//!   declaration and a broad platform-inclusive one, depending on whether a host
//!   platform version is configured, and attaching the exclusion rules that keep
//!   known-bad transitive dependencies off the generator classpath.
//! - **Classpath narrowing**: filtering a large resolved file set down to the jars a
//!   specific generator invocation actually needs, unless the caller supplied a
//!   dedicated classpath that is trusted wholesale.
//! - **Stale-output purge**: deleting the previous generation's output immediately
//!   before a generator runs, so regeneration is idempotent regardless of prior
//!   failures or renamed outputs.
//!
//! # Lifecycle
//!
//! Configuration follows a two-phase model:
//!
//! 1. **Configure** - a [`config::GeneratorConfig`] records intent (versions, flags,
//!    output paths). It can be built programmatically or loaded from TOML.
//! 2. **Freeze** - [`config::GeneratorConfig::freeze`] runs once, resolves the
//!    generator version (at most one network call per build), validates paths, and
//!    produces an immutable [`config::FrozenConfig`] consumed by everything else.
//!
//! Task classpaths are deliberately *not* computed at registration time. Each task
//! stores a zero-argument source that is invoked when the task actually executes,
//! because dependency coordinates are only final at the freeze boundary.
//!
//! # Core Modules
//!
//! - [`config`] - two-phase configuration (configure/freeze) with TOML loading
//! - [`version`] - `"latest"` release-tag resolution via HTTP redirect
//! - [`deps`] - dependency coordinates, exclusion rules, and the two declaration branches
//! - [`classpath`] - resolved file sets and name-predicate filtering
//! - [`purge`] - recursive stale-output deletion
//! - [`orchestrator`] - task registration, runtime-floor gate, and execution ordering
//! - [`repository`] - fixed artifact-repository endpoints and archive layout
//! - [`core`] - error types shared across the crate
//!
//! # Example
//!
//! ```rust,no_run
//! use grammargen::config::GeneratorConfig;
//! use grammargen::orchestrator::{HostRuntime, TaskOrchestrator};
//! use grammargen::version::VersionResolver;
//!
//! # async fn example(file_sets: std::sync::Arc<dyn grammargen::orchestrator::FileSetResolver>,
//! #                  runner: &dyn grammargen::orchestrator::GeneratorRunner) -> anyhow::Result<()> {
//! let mut config = GeneratorConfig::load(std::path::Path::new("grammargen.toml")).await?;
//! config.generator_version = "2022.3.2".to_string();
//!
//! let resolver = VersionResolver::new()?;
//! let frozen = config.freeze(&resolver).await?;
//!
//! let host = HostRuntime::new("8.5")?;
//! let orchestrator = TaskOrchestrator::new(frozen, &host, file_sets)?;
//! orchestrator.run_all(runner).await?;
//! # Ok(())
//! # }
//! ```

pub mod classpath;
pub mod config;
pub mod constants;
pub mod core;
pub mod deps;
pub mod orchestrator;
pub mod purge;
pub mod repository;
pub mod version;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
