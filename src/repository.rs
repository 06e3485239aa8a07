//! Fixed artifact sources the surrounding build fetches from.
//!
//! grammargen never downloads anything itself; it only tells the build *where*
//! coordinates resolve. Two plain repositories serve the generator/lexer tools and
//! the platform modules, and one `[revision]`-keyed archive layout serves the
//! generator-tool release archives.

use crate::constants::{DEPENDENCY_CACHE_URL, GENERATOR_ARCHIVE_PATTERN, PLATFORM_RELEASES_URL};

/// A named artifact repository consumed by the surrounding build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactRepository {
    /// Registration name of the repository.
    pub name: &'static str,
    /// Base URL of the repository.
    pub url: &'static str,
}

/// General dependency cache serving generator and lexer artifacts.
pub const DEPENDENCY_CACHE: ArtifactRepository =
    ArtifactRepository { name: "intellij-dependencies", url: DEPENDENCY_CACHE_URL };

/// Release repository serving the host-platform modules.
pub const PLATFORM_RELEASES: ArtifactRepository =
    ArtifactRepository { name: "intellij-platform-releases", url: PLATFORM_RELEASES_URL };

/// The repositories to register, in lookup order.
pub fn repositories() -> [ArtifactRepository; 2] {
    [DEPENDENCY_CACHE, PLATFORM_RELEASES]
}

/// Expands the `[revision]`-keyed archive layout for one generator release.
pub fn generator_archive_url(version: &str) -> String {
    GENERATOR_ARCHIVE_PATTERN.replace("[revision]", version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_url_substitutes_every_revision_marker() {
        let url = generator_archive_url("2022.3.2");
        assert_eq!(
            url,
            "https://github.com/JetBrains/Grammar-Kit/releases/download/2022.3.2/grammar-kit-2022.3.2.zip"
        );
        assert!(!url.contains("[revision]"));
    }

    #[test]
    fn both_repositories_are_registered() {
        let repos = repositories();
        assert_eq!(repos.len(), 2);
        assert!(repos.iter().all(|r| r.url.starts_with("https://")));
    }
}
