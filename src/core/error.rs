//! Error handling for grammargen
//!
//! Failures fall into three families, matching the phases of a build:
//!
//! - **Setup** - the host build runtime is too old (or its version is unparseable).
//!   Raised once, before any task runs.
//! - **Version resolution** - the network lookup behind the `"latest"` sentinel
//!   failed: transport error, a response that is not a redirect, or a redirect
//!   without a usable `Location` header. Never retried; the build step needing the
//!   version aborts.
//! - **Purge** - deleting stale generator output failed. Carries the offending path
//!   so the orchestrator can report exactly what was left behind.
//!
//! Configuration-file problems (unreadable or invalid TOML, missing required
//! fields) get their own variants since they surface before the freeze boundary.
//!
//! Orchestration seams that aggregate several failure sources return
//! [`anyhow::Result`] with context; code that callers match on returns `GenError`.

use std::path::PathBuf;
use thiserror::Error;

/// The error type for all grammargen operations.
///
/// Every variant is fatal: the invoking build orchestrator is expected to abort the
/// affected step. None of these conditions is retried automatically.
#[derive(Error, Debug)]
pub enum GenError {
    /// Host build runtime is older than the supported floor.
    ///
    /// Raised by the orchestrator's one-time setup gate, before any task is
    /// registered or run.
    #[error("host runtime version {found} is not supported, {required} or newer is required")]
    RuntimeVersionTooOld {
        /// Version reported by the host runtime.
        found: String,
        /// Oldest supported version.
        required: String,
    },

    /// Host runtime reported a version string that does not parse.
    #[error("invalid host runtime version '{version}'")]
    RuntimeVersionInvalid {
        /// The unparseable version string.
        version: String,
        /// Underlying semver parse failure.
        #[source]
        source: semver::Error,
    },

    /// Transport-level failure while looking up the latest generator release.
    #[error("failed to look up the latest generator release")]
    VersionLookupFailed {
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The latest-release endpoint answered with something other than a redirect.
    #[error("latest-release lookup returned HTTP {status}, expected a redirect")]
    VersionLookupNotRedirect {
        /// Status code of the unexpected response.
        status: reqwest::StatusCode,
    },

    /// The latest-release redirect carried no usable `Location` header.
    #[error("latest-release redirect is missing a usable Location header")]
    VersionLookupMissingLocation,

    /// Deleting stale generator output failed.
    #[error("failed to delete stale output at {}", path.display())]
    Purge {
        /// The path that could not be deleted.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration is incomplete or inconsistent.
    #[error("configuration error: {message}")]
    Config {
        /// Description of what is wrong with the configuration.
        message: String,
    },

    /// A configuration file could not be parsed.
    #[error("invalid configuration file {file}")]
    ConfigParse {
        /// Path of the offending file.
        file: String,
        /// Underlying TOML parse failure.
        #[source]
        source: toml::de::Error,
    },

    /// I/O error outside of the purge path (e.g. reading a configuration file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_floor_message_names_both_versions() {
        let err = GenError::RuntimeVersionTooOld {
            found: "6.8".to_string(),
            required: "7.4.0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("6.8"));
        assert!(msg.contains("7.4.0"));
    }

    #[test]
    fn purge_error_names_the_offending_path() {
        let err = GenError::Purge {
            path: PathBuf::from("/tmp/gen/parser"),
            source: std::io::Error::other("disk on fire"),
        };
        assert!(err.to_string().contains("/tmp/gen/parser"));
    }

    #[test]
    fn io_errors_convert_automatically() {
        fn read() -> super::super::Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here")?)
        }
        match read() {
            Err(GenError::Io(_)) => {}
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
