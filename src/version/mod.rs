//! Resolution of the `"latest"` generator version via an HTTP redirect.
//!
//! The generator tool publishes releases behind a fixed "latest release" URL that
//! answers with a redirect; the final `/`-separated segment of the `Location`
//! header is the release tag. That is the only response shape supported.
//!
//! Explicit versions always win: anything other than the sentinel is returned
//! unchanged without any network access. A sentinel lookup is attempted exactly
//! once per build (the result is read into the frozen configuration); any failure
//! is fatal to the build step that needed the version and is never retried.

use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use tracing::debug;

use crate::constants::{LATEST_RELEASE_URL, LATEST_VERSION_SENTINEL};
use crate::core::{GenError, Result};

/// Resolves a symbolic `"latest"` version tag to a concrete version string.
///
/// Redirect following is disabled on the underlying client: the redirect *is* the
/// answer, not a hop to follow.
pub struct VersionResolver {
    client: reqwest::Client,
    latest_release_url: String,
}

impl VersionResolver {
    /// Creates a resolver against the fixed latest-release endpoint.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_endpoint(LATEST_RELEASE_URL)
    }

    /// Creates a resolver against a custom latest-release endpoint.
    pub fn with_endpoint(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().redirect(Policy::none()).build()?;
        Ok(Self { client, latest_release_url: url.into() })
    }

    /// Resolves the requested generator version.
    ///
    /// Returns `requested` unchanged unless it is the `"latest"` sentinel, in which
    /// case the latest-release endpoint is queried once. A connection failure, a
    /// non-redirect response, or a missing/empty `Location` header is fatal.
    pub async fn resolve_generator_version(&self, requested: &str) -> Result<String> {
        if requested != LATEST_VERSION_SENTINEL {
            return Ok(requested.to_string());
        }

        debug!(url = %self.latest_release_url, "looking up latest generator release");
        let response = self
            .client
            .head(&self.latest_release_url)
            .send()
            .await
            .map_err(|source| GenError::VersionLookupFailed { source })?;

        let status = response.status();
        if !status.is_redirection() {
            return Err(GenError::VersionLookupNotRedirect { status });
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(GenError::VersionLookupMissingLocation)?;

        let version = location
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or(GenError::VersionLookupMissingLocation)?;

        debug!(%version, "resolved latest generator release");
        Ok(version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{unreachable_resolver, StubServer};

    #[tokio::test]
    async fn explicit_versions_pass_through_without_network_access() {
        // Pointing at a closed port guarantees any request would error out.
        let resolver = unreachable_resolver();

        let version = resolver.resolve_generator_version("2021.1.2").await.unwrap();

        assert_eq!(version, "2021.1.2");
    }

    #[tokio::test]
    async fn sentinel_resolves_to_the_redirect_target_tag() {
        let server =
            StubServer::redirect_to("https://github.com/JetBrains/Grammar-Kit/releases/tag/2022.3.2");
        let resolver = VersionResolver::with_endpoint(server.url()).unwrap();

        let version = resolver.resolve_generator_version("latest").await.unwrap();

        assert_eq!(version, "2022.3.2");
    }

    #[tokio::test]
    async fn trailing_slash_in_the_redirect_target_is_tolerated() {
        let server = StubServer::redirect_to("https://example.com/releases/tag/2020.1/");
        let resolver = VersionResolver::with_endpoint(server.url()).unwrap();

        let version = resolver.resolve_generator_version("latest").await.unwrap();

        assert_eq!(version, "2020.1");
    }

    #[tokio::test]
    async fn non_redirect_response_is_fatal() {
        let server = StubServer::respond_with("HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
        let resolver = VersionResolver::with_endpoint(server.url()).unwrap();

        match resolver.resolve_generator_version("latest").await {
            Err(GenError::VersionLookupNotRedirect { status }) => assert_eq!(status.as_u16(), 200),
            other => panic!("expected VersionLookupNotRedirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn redirect_without_location_is_fatal() {
        let server = StubServer::respond_with("HTTP/1.1 302 Found\r\nContent-Length: 0\r\n\r\n");
        let resolver = VersionResolver::with_endpoint(server.url()).unwrap();

        match resolver.resolve_generator_version("latest").await {
            Err(GenError::VersionLookupMissingLocation) => {}
            other => panic!("expected VersionLookupMissingLocation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_failure_is_fatal_for_the_sentinel() {
        let resolver = unreachable_resolver();

        match resolver.resolve_generator_version("latest").await {
            Err(GenError::VersionLookupFailed { .. }) => {}
            other => panic!("expected VersionLookupFailed, got {other:?}"),
        }
    }
}
