//! Core types shared across grammargen.
//!
//! Currently this is the error taxonomy. Everything that can fail in this crate is
//! fatal and surfaced synchronously to the invoking build orchestrator: there is no
//! retry logic and no partial-success mode. Either a task's prerequisites
//! (classpath + clean output target) are fully satisfied, or the task does not run.

pub mod error;

pub use error::GenError;

/// Convenience result type used by APIs that fail with a typed [`GenError`].
pub type Result<T> = std::result::Result<T, GenError>;
