//! Two-phase configuration: record intent, then freeze into an immutable snapshot.
//!
//! The build pipeline sets configuration values before dependency resolution starts
//! and must never change them afterwards. That boundary is modelled explicitly:
//!
//! 1. [`GeneratorConfig`] is the *configure*-phase record. It only stores what the
//!    caller asked for; nothing is validated or resolved yet. It can be assembled
//!    in code or loaded from a TOML file.
//! 2. [`GeneratorConfig::freeze`] runs once, validates the output paths, resolves
//!    the generator version (network at most once, and only when the `"latest"`
//!    sentinel was requested), and produces a [`FrozenConfig`].
//!
//! Everything downstream takes `&FrozenConfig`. There is no global mutable
//! configuration state and no way to mutate a snapshot once produced.
//!
//! # Configuration file
//!
//! ```toml
//! generator_version = "latest"     # or a pinned release tag
//! lexer_version = "1.9.1"
//! platform_version = "231.8109.175"  # optional, switches the declaration branch
//!
//! [lexer]
//! purge_old_files = true
//! output_file = "gen/MyLexer.java"
//!
//! [parser]
//! purge_old_files = true
//! output_root = "gen"
//! parser_source_dir = "org/example/parser"
//! psi_source_dir = "org/example/psi"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::constants::{DEFAULT_LEXER_TOOL_VERSION, LATEST_VERSION_SENTINEL};
use crate::core::{GenError, Result};
use crate::version::VersionResolver;

/// Configure-phase settings for the lexer generation task.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LexerTaskConfig {
    /// Whether the previous output file is deleted before generation.
    pub purge_old_files: bool,
    /// The single file the lexer generator writes.
    pub output_file: PathBuf,
}

/// Configure-phase settings for the parser generation task.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ParserTaskConfig {
    /// Whether previous outputs are deleted before generation.
    pub purge_old_files: bool,
    /// Root directory the parser generator writes under.
    pub output_root: PathBuf,
    /// Parser-code directory, relative to `output_root`.
    pub parser_source_dir: PathBuf,
    /// PSI-root directory, relative to `output_root`.
    pub psi_source_dir: PathBuf,
}

/// Configure-phase record of everything the caller asked for.
///
/// Nothing here is resolved or validated until [`freeze`](Self::freeze).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Requested generator-tool version; defaults to the `"latest"` sentinel.
    pub generator_version: String,
    /// Requested lexer-tool version; defaults to the pinned release.
    pub lexer_version: String,
    /// Optional host-platform version. Presence switches dependency declaration
    /// from the minimal compile-only branch to the dedicated-classpath branch.
    pub platform_version: Option<String>,
    /// Lexer task settings.
    pub lexer: LexerTaskConfig,
    /// Parser task settings.
    pub parser: ParserTaskConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generator_version: LATEST_VERSION_SENTINEL.to_string(),
            lexer_version: DEFAULT_LEXER_TOOL_VERSION.to_string(),
            platform_version: None,
            lexer: LexerTaskConfig::default(),
            parser: ParserTaskConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a configuration from TOML text.
    ///
    /// `file` is only used to label parse errors.
    pub fn from_toml_str(content: &str, file: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|source| GenError::ConfigParse { file: file.to_string(), source })
    }

    /// Loads a configuration from a TOML file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Freezes the configuration into an immutable snapshot.
    ///
    /// Runs once per build, at the boundary where configuration stops changing and
    /// resolution begins. Resolving the generator version is the only network
    /// access in the crate and happens here at most once; explicitly pinned
    /// versions never touch the network.
    pub async fn freeze(self, resolver: &VersionResolver) -> Result<FrozenConfig> {
        self.validate()?;

        let generator_version =
            resolver.resolve_generator_version(&self.generator_version).await?;
        debug!(version = %generator_version, "configuration frozen");

        let parser_dir = self.parser.output_root.join(&self.parser.parser_source_dir);
        let psi_dir = self.parser.output_root.join(&self.parser.psi_source_dir);

        Ok(FrozenConfig {
            generator_version,
            lexer_version: self.lexer_version,
            platform_version: self.platform_version,
            lexer: FrozenLexerTask {
                purge_old_files: self.lexer.purge_old_files,
                output_file: self.lexer.output_file,
            },
            parser: FrozenParserTask {
                purge_old_files: self.parser.purge_old_files,
                output_root: self.parser.output_root,
                parser_dir,
                psi_dir,
            },
        })
    }

    fn validate(&self) -> Result<()> {
        if self.generator_version.trim().is_empty() {
            return Err(GenError::Config {
                message: "generator_version must not be empty".to_string(),
            });
        }
        if self.lexer_version.trim().is_empty() {
            return Err(GenError::Config { message: "lexer_version must not be empty".to_string() });
        }
        if self.lexer.output_file.as_os_str().is_empty() {
            return Err(GenError::Config {
                message: "lexer.output_file must be set".to_string(),
            });
        }
        if self.parser.output_root.as_os_str().is_empty() {
            return Err(GenError::Config {
                message: "parser.output_root must be set".to_string(),
            });
        }
        if self.parser.parser_source_dir.as_os_str().is_empty()
            || self.parser.psi_source_dir.as_os_str().is_empty()
        {
            return Err(GenError::Config {
                message: "parser.parser_source_dir and parser.psi_source_dir must be set"
                    .to_string(),
            });
        }
        Ok(())
    }
}

/// Frozen lexer task settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenLexerTask {
    /// Whether the previous output file is deleted before generation.
    pub purge_old_files: bool,
    /// The single file the lexer generator writes.
    pub output_file: PathBuf,
}

/// Frozen parser task settings, with sub-paths already joined onto the root.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenParserTask {
    /// Whether previous outputs are deleted before generation.
    pub purge_old_files: bool,
    /// Root directory the parser generator writes under.
    pub output_root: PathBuf,
    /// Absolute-or-project-relative parser-code directory (`output_root` joined
    /// with the configured sub-path).
    pub parser_dir: PathBuf,
    /// PSI-root directory (`output_root` joined with the configured sub-path).
    pub psi_dir: PathBuf,
}

/// Immutable configuration snapshot produced by [`GeneratorConfig::freeze`].
///
/// The generator version in here is always concrete; the `"latest"` sentinel never
/// survives freezing.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenConfig {
    /// Concrete generator-tool version.
    pub generator_version: String,
    /// Concrete lexer-tool version.
    pub lexer_version: String,
    /// Optional host-platform version (branch selector for dependency declaration).
    pub platform_version: Option<String>,
    /// Lexer task settings.
    pub lexer: FrozenLexerTask,
    /// Parser task settings.
    pub parser: FrozenParserTask,
}
