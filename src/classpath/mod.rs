//! Resolved file sets and the predicates that narrow them.
//!
//! A generator runs in its own classloader, and handing it the whole compile
//! classpath of the enclosing project is a reliable way to produce classloading
//! failures. This module implements the narrowing rule:
//!
//! - if the caller resolved a *dedicated* classpath for the generator, trust it
//!   completely and hand it over unfiltered;
//! - otherwise filter the ambient compile classpath down to the jars the specific
//!   generator is known to need, by file base name.
//!
//! Name predicates are only ever applied to the ambient set. The dedicated set is
//! assumed curated by whoever populated it.

use std::path::{Path, PathBuf};

use crate::constants::{LEXER_TOOL_NAME_PREFIX, PARSER_REQUIRED_LIBRARIES};

/// An unordered collection of resolved artifact files.
///
/// Produced once per dependency-configuration set by the surrounding build's
/// resolution machinery and treated as immutable afterwards. Iteration order is
/// whatever the resolver produced; order is not a contracted guarantee and nothing
/// in this crate depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFileSet {
    files: Vec<PathBuf>,
}

impl ResolvedFileSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the set contains no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of files in the set.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Iterates over the contained files.
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    /// The contained files as a slice.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Whether the set contains a file with the given base name.
    pub fn contains_file_named(&self, name: &str) -> bool {
        self.files.iter().any(|f| base_name(f) == Some(name))
    }
}

impl From<Vec<PathBuf>> for ResolvedFileSet {
    fn from(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

impl FromIterator<PathBuf> for ResolvedFileSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self { files: iter.into_iter().collect() }
    }
}

/// A matcher over a resolved file's base name.
///
/// Implementations decide whether a jar belongs on a specific generator's
/// classpath. Applied only when filtering the ambient compile classpath.
pub trait NamePredicate {
    /// Whether a file with this base name belongs on the classpath.
    fn matches(&self, file_name: &str) -> bool;
}

/// Selects the lexer-tool jars: any file whose base name starts with the fixed
/// tool-name prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexerToolPredicate;

impl NamePredicate for LexerToolPredicate {
    fn matches(&self, file_name: &str) -> bool {
        file_name.starts_with(LEXER_TOOL_NAME_PREFIX)
    }
}

/// Selects the jars the parser generator needs from a host distribution.
///
/// A jar matches when its base name case-insensitively equals `<name>.jar` or is a
/// `<name>-<version>.jar` of any name in [`PARSER_REQUIRED_LIBRARIES`]. The suffix
/// check on the versioned form keeps renamed leftovers (backup files, source
/// archives with extra extensions) off the classpath.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserLibraryPredicate;

impl NamePredicate for ParserLibraryPredicate {
    fn matches(&self, file_name: &str) -> bool {
        PARSER_REQUIRED_LIBRARIES.iter().any(|lib| {
            file_name.eq_ignore_ascii_case(&format!("{lib}.jar"))
                || (file_name.starts_with(&format!("{lib}-")) && file_name.ends_with(".jar"))
        })
    }
}

/// Chooses the classpath for a generator invocation.
///
/// A non-empty `primary` (the dedicated, caller-curated set) is returned wholesale;
/// `predicate` and `fallback` are ignored. Otherwise every file in `fallback` whose
/// base name satisfies `predicate` is returned. Files are never deduplicated or
/// reordered beyond the input order.
pub fn select(
    primary: &ResolvedFileSet,
    fallback: &ResolvedFileSet,
    predicate: &dyn NamePredicate,
) -> ResolvedFileSet {
    if !primary.is_empty() {
        return primary.clone();
    }
    fallback
        .iter()
        .filter(|file| base_name(file).is_some_and(|name| predicate.matches(name)))
        .cloned()
        .collect()
}

fn base_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
