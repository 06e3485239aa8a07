//! Test utilities for grammargen
//!
//! Helpers shared between unit tests and the integration suite: a one-shot HTTP
//! stub for redirect lookups, canned frozen configurations, and in-memory
//! implementations of the orchestrator's collaborator traits.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::thread;

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::classpath::ResolvedFileSet;
use crate::config::{FrozenConfig, FrozenLexerTask, FrozenParserTask};
use crate::orchestrator::{FileSetResolver, GeneratorInvocation, GeneratorRunner};
use crate::version::VersionResolver;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Safe to call from every test; only the first call installs a subscriber.
/// Respects `RUST_LOG` when no explicit level is given.
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// A localhost HTTP server answering exactly one request with a canned response.
///
/// Runs on its own OS thread so it never interacts with the tokio runtime driving
/// the test. The listener is dropped after the first connection.
pub struct StubServer {
    addr: SocketAddr,
    _handle: thread::JoinHandle<()>,
}

impl StubServer {
    /// Serves one request with the given raw HTTP response.
    pub fn respond_with(response: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let response = response.to_string();
        let handle = thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                // Drain the request head before answering, some clients treat an
                // early response as a protocol error.
                let mut buf = [0u8; 1024];
                let mut head = Vec::new();
                while let Ok(n) = stream.read(&mut buf) {
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&buf[..n]);
                    if head.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });
        Self { addr, _handle: handle }
    }

    /// Serves one request with a `302 Found` redirect to `location`.
    pub fn redirect_to(location: &str) -> Self {
        Self::respond_with(&format!(
            "HTTP/1.1 302 Found\r\nLocation: {location}\r\nContent-Length: 0\r\n\r\n"
        ))
    }

    /// URL of the stubbed latest-release endpoint.
    pub fn url(&self) -> String {
        format!("http://{}/releases/latest", self.addr)
    }
}

/// A resolver pointed at a closed port: any network access fails immediately.
///
/// Used to prove code paths that must not touch the network.
pub fn unreachable_resolver() -> VersionResolver {
    VersionResolver::with_endpoint("http://127.0.0.1:9/releases/latest")
        .expect("client construction does not fail")
}

/// A frozen configuration with placeholder relative output paths.
///
/// Suitable for tests that never touch the filesystem (dependency planning,
/// branch selection).
pub fn frozen_config(generator_version: &str, platform_version: Option<&str>) -> FrozenConfig {
    frozen_config_with_outputs(Path::new("."), platform_version)
        .with_generator_version(generator_version)
}

/// A frozen configuration whose output paths live under `root`.
pub fn frozen_config_with_outputs(
    root: &Path,
    platform_version: Option<&str>,
) -> FrozenConfig {
    let gen_root = root.join("gen");
    FrozenConfig {
        generator_version: "2022.3.2".to_string(),
        lexer_version: "1.9.1".to_string(),
        platform_version: platform_version.map(str::to_string),
        lexer: FrozenLexerTask {
            purge_old_files: false,
            output_file: gen_root.join("MyLexer.java"),
        },
        parser: FrozenParserTask {
            purge_old_files: false,
            output_root: gen_root.clone(),
            parser_dir: gen_root.join("parser"),
            psi_dir: gen_root.join("psi"),
        },
    }
}

impl FrozenConfig {
    /// Returns the snapshot with a different generator version (test-only helper).
    pub fn with_generator_version(mut self, version: &str) -> Self {
        self.generator_version = version.to_string();
        self
    }
}

/// In-memory [`FileSetResolver`] returning fixed sets and counting resolutions.
#[derive(Default)]
pub struct StaticFileSets {
    dedicated: ResolvedFileSet,
    compile: ResolvedFileSet,
    calls: AtomicUsize,
}

impl StaticFileSets {
    /// A resolver with the given ambient compile classpath and no dedicated set.
    pub fn with_compile(files: Vec<PathBuf>) -> Self {
        Self { compile: files.into(), ..Self::default() }
    }

    /// Adds a dedicated classpath set.
    pub fn and_dedicated(mut self, files: Vec<PathBuf>) -> Self {
        self.dedicated = files.into();
        self
    }

    /// How many set resolutions have been requested so far.
    pub fn resolution_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FileSetResolver for StaticFileSets {
    fn dedicated_classpath(&self) -> anyhow::Result<ResolvedFileSet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.dedicated.clone())
    }

    fn compile_classpath(&self) -> anyhow::Result<ResolvedFileSet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.compile.clone())
    }
}

/// A [`GeneratorRunner`] that records every invocation instead of generating.
#[derive(Default)]
pub struct RecordingRunner {
    invocations: Mutex<Vec<GeneratorInvocation>>,
}

impl RecordingRunner {
    /// The invocations recorded so far, in execution order.
    pub fn invocations(&self) -> Vec<GeneratorInvocation> {
        self.invocations.lock().expect("runner lock poisoned").clone()
    }
}

impl GeneratorRunner for RecordingRunner {
    fn run(&self, invocation: &GeneratorInvocation) -> anyhow::Result<()> {
        self.invocations.lock().expect("runner lock poisoned").push(invocation.clone());
        Ok(())
    }
}
