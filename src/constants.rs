//! Fixed coordinates, endpoints, and version floors used throughout grammargen.
//!
//! Everything the dependency-declaration branches and the classpath filters agree
//! on lives here: tool coordinates, the closed list of parser-required libraries,
//! exclusion targets, and the remote endpoints the surrounding build consumes.

/// Sentinel version meaning "resolve the newest generator release over the network".
pub const LATEST_VERSION_SENTINEL: &str = "latest";

/// Pinned default release of the lexer tool.
pub const DEFAULT_LEXER_TOOL_VERSION: &str = "1.9.1";

/// Maven group of the parser generator tool.
pub const GENERATOR_TOOL_GROUP: &str = "org.jetbrains";

/// Maven artifact of the parser generator tool.
pub const GENERATOR_TOOL_ARTIFACT: &str = "grammar-kit";

/// Maven group of the lexer tool.
pub const LEXER_TOOL_GROUP: &str = "org.jetbrains.intellij.deps.jflex";

/// Maven artifact of the lexer tool.
pub const LEXER_TOOL_ARTIFACT: &str = "jflex";

/// Base-name prefix identifying lexer-tool jars on a resolved classpath.
pub const LEXER_TOOL_NAME_PREFIX: &str = "jflex";

/// Group holding the host-platform modules declared on the dedicated classpath.
pub const PLATFORM_MODULE_GROUP: &str = "com.jetbrains.intellij.platform";

/// Platform modules the generator needs when no ambient platform dependency exists.
pub const PLATFORM_MODULES: [&str; 4] = ["core-impl", "indexing-impl", "analysis-impl", "lang-impl"];

/// Bytecode-manipulation library pinned independently of the platform version.
pub const BYTECODE_LIBRARY_GROUP: &str = "org.jetbrains.intellij.deps";
/// Artifact name of the pinned bytecode library.
pub const BYTECODE_LIBRARY_ARTIFACT: &str = "asm-all";
/// Pinned version of the bytecode library.
pub const BYTECODE_LIBRARY_VERSION: &str = "9.2";

/// Group whose `ant` and `idea` modules must never reach a generator classpath.
pub const PLUGINS_GROUP: &str = "org.jetbrains.plugins";

/// Groups stripped from the dedicated classpath: a distributed-object layer, a
/// marketplace client, a bitmap library, the plugins group, and Ant build tooling.
/// None of them is loadable (or wanted) inside a generator invocation.
pub const DEDICATED_EXCLUDED_GROUPS: [&str; 5] = [
    "com.jetbrains.rd",
    "com.jetbrains.marketplace",
    "org.roaringbitmap",
    "org.jetbrains.plugins",
    "org.apache.ant",
];

/// Auxiliary bill-of-materials coordinate carried for a downstream consumer of the
/// `bom` set. Unrelated to the generator/lexer domain; candidate for removal once
/// that consumer drops it.
pub const BOM_COORDINATE_GROUP: &str = "dev.thiagosouto";
/// Artifact of the auxiliary BOM coordinate.
pub const BOM_COORDINATE_ARTIFACT: &str = "plugin";
/// Version of the auxiliary BOM coordinate.
pub const BOM_COORDINATE_VERSION: &str = "1.3.4";
/// Group excluded from the auxiliary BOM set.
pub const BOM_EXCLUDED_GROUP: &str = "com.soywiz.korlibs.korte";
/// Module excluded from the auxiliary BOM set.
pub const BOM_EXCLUDED_MODULE: &str = "korte-jvm";

/// Libraries the parser generator must see on its classpath.
///
/// Host distributions rename or relocate some of these between a main platform jar
/// and a test-framework jar (`app` vs `platform-impl`, `util` vs `idea`), so both
/// spellings are listed to stay distribution-agnostic.
pub const PARSER_REQUIRED_LIBRARIES: [&str; 17] = [
    "app",
    "lib",
    "trove",
    "guava",
    "jdom",
    "log4j",
    "java-api",
    "java-impl",
    "util",
    "annotations",
    "picocontainer",
    "extensions",
    "idea",
    "openapi",
    "grammar-kit",
    "platform-api",
    "platform-impl",
];

/// Oldest host build-runtime release the orchestrator supports.
pub const MINIMUM_HOST_RUNTIME_VERSION: &str = "7.4.0";

/// Endpoint answering with a redirect whose `Location` names the newest generator release.
pub const LATEST_RELEASE_URL: &str = "https://github.com/JetBrains/Grammar-Kit/releases/latest";

/// General dependency cache serving generator and lexer artifacts.
pub const DEPENDENCY_CACHE_URL: &str =
    "https://cache-redirector.jetbrains.com/intellij-dependencies";

/// Release repository serving the host-platform modules.
pub const PLATFORM_RELEASES_URL: &str = "https://www.jetbrains.com/intellij-repository/releases";

/// `[revision]`-keyed layout of the generator-tool archive releases.
pub const GENERATOR_ARCHIVE_PATTERN: &str =
    "https://github.com/JetBrains/Grammar-Kit/releases/download/[revision]/grammar-kit-[revision].zip";
