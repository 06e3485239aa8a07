//! Dependency coordinates, exclusion rules, and the two declaration branches.
//!
//! A generator's classpath is declared, not hand-assembled: this module emits
//! coordinate sets that the surrounding build's resolution machinery turns into
//! files. Exactly one of two branches applies per build, keyed on whether a host
//! platform version is configured:
//!
//! - **Ambient branch** (no platform version): the enclosing project already
//!   carries the platform classes on its own classpath, so only the generator and
//!   lexer tools are added, compile-only, to avoid polluting compilation.
//! - **Dedicated branch** (platform version present): no ambient platform exists,
//!   so the generator's full transitive requirement set is declared explicitly and
//!   then pruned of transitive extras known to be absent or unnecessary here.
//!
//! Exclusion rules attach to a whole set, never to an individual coordinate: a rule
//! suppresses matching transitive dependencies pulled in by *any* coordinate of the
//! declaring set.

use std::fmt;

use tracing::debug;

use crate::config::FrozenConfig;
use crate::constants::{
    BOM_COORDINATE_ARTIFACT, BOM_COORDINATE_GROUP, BOM_COORDINATE_VERSION, BOM_EXCLUDED_GROUP,
    BOM_EXCLUDED_MODULE, BYTECODE_LIBRARY_ARTIFACT, BYTECODE_LIBRARY_GROUP,
    BYTECODE_LIBRARY_VERSION, DEDICATED_EXCLUDED_GROUPS, GENERATOR_TOOL_ARTIFACT,
    GENERATOR_TOOL_GROUP, LEXER_TOOL_ARTIFACT, LEXER_TOOL_GROUP, PLATFORM_MODULES,
    PLATFORM_MODULE_GROUP, PLUGINS_GROUP,
};

/// A `(group, artifact, version)` triple identifying one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCoordinate {
    /// Artifact group (reverse-domain namespace).
    pub group: String,
    /// Artifact name within the group.
    pub artifact: String,
    /// Concrete version string.
    pub version: String,
}

impl DependencyCoordinate {
    /// Creates a coordinate from its three components.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self { group: group.into(), artifact: artifact.into(), version: version.into() }
    }
}

impl fmt::Display for DependencyCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// Suppresses transitive dependencies matching a group, a module, or both.
///
/// Attached to a [`DependencySet`], scoped to every coordinate in that set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRule {
    /// Group to exclude, if constrained by group.
    pub group: Option<String>,
    /// Module to exclude, if constrained by module.
    pub module: Option<String>,
}

impl ExclusionRule {
    /// Excludes every module of a group.
    pub fn group(group: impl Into<String>) -> Self {
        Self { group: Some(group.into()), module: None }
    }

    /// Excludes a module name regardless of group.
    pub fn module(module: impl Into<String>) -> Self {
        Self { group: None, module: Some(module.into()) }
    }

    /// Excludes one specific module of one specific group.
    pub fn group_module(group: impl Into<String>, module: impl Into<String>) -> Self {
        Self { group: Some(group.into()), module: Some(module.into()) }
    }

    /// Whether a transitive dependency identified by `group`/`module` is suppressed
    /// by this rule. Unconstrained dimensions always match.
    pub fn suppresses(&self, group: &str, module: &str) -> bool {
        self.group.as_deref().is_none_or(|g| g == group)
            && self.module.as_deref().is_none_or(|m| m == module)
    }
}

/// A named dependency-configuration set: coordinates plus set-scoped exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    /// Name of the configuration set in the surrounding build.
    pub name: &'static str,
    /// Declared coordinates.
    pub coordinates: Vec<DependencyCoordinate>,
    /// Exclusions applied to the whole set.
    pub exclusions: Vec<ExclusionRule>,
}

impl DependencySet {
    fn named(name: &'static str) -> Self {
        Self { name, coordinates: Vec::new(), exclusions: Vec::new() }
    }

    /// Whether the set declares no coordinates.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Name of the ambient compile-only dependency set.
pub const COMPILE_ONLY_SET: &str = "grammarGenCompileOnly";
/// Name of the dedicated generator-classpath dependency set.
pub const DEDICATED_SET: &str = "grammarGenClasspath";
/// Name of the auxiliary bill-of-materials set.
pub const BOM_SET: &str = "grammarGenBom";

/// Which declaration branch a plan took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationBranch {
    /// Minimal compile-only declaration; the project supplies platform classes.
    Ambient,
    /// Full explicit declaration on the dedicated classpath set.
    Dedicated,
}

/// The dependency sets a build must register, emitted by [`DependencySetBuilder`].
///
/// Sets not used by the taken branch are present but empty, so callers can
/// register all three unconditionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyPlan {
    /// The branch that was taken.
    pub branch: DeclarationBranch,
    /// The ambient compile-only set (populated on the ambient branch).
    pub compile_only: DependencySet,
    /// The dedicated generator-classpath set (populated on the dedicated branch).
    pub dedicated: DependencySet,
    /// The auxiliary bill-of-materials set (populated on the ambient branch).
    pub bom: DependencySet,
}

/// Emits dependency coordinates into configuration sets from a frozen configuration.
pub struct DependencySetBuilder;

impl DependencySetBuilder {
    /// Builds the [`DependencyPlan`] for a frozen configuration.
    ///
    /// Branch selection is a pure function of whether `platform_version` is
    /// present; versions are read from the snapshot and never re-resolved here.
    pub fn plan(config: &FrozenConfig) -> DependencyPlan {
        match &config.platform_version {
            Some(platform_version) => Self::dedicated(config, platform_version),
            None => Self::ambient(config),
        }
    }

    fn ambient(config: &FrozenConfig) -> DependencyPlan {
        let mut compile_only = DependencySet::named(COMPILE_ONLY_SET);
        compile_only.coordinates.push(DependencyCoordinate::new(
            GENERATOR_TOOL_GROUP,
            GENERATOR_TOOL_ARTIFACT,
            &config.generator_version,
        ));
        compile_only.coordinates.push(DependencyCoordinate::new(
            LEXER_TOOL_GROUP,
            LEXER_TOOL_ARTIFACT,
            &config.lexer_version,
        ));
        compile_only.exclusions.push(ExclusionRule::group_module(PLUGINS_GROUP, "ant"));
        compile_only.exclusions.push(ExclusionRule::group_module(PLUGINS_GROUP, "idea"));

        let mut bom = DependencySet::named(BOM_SET);
        bom.coordinates.push(DependencyCoordinate::new(
            BOM_COORDINATE_GROUP,
            BOM_COORDINATE_ARTIFACT,
            BOM_COORDINATE_VERSION,
        ));
        bom.exclusions.push(ExclusionRule::group_module(BOM_EXCLUDED_GROUP, BOM_EXCLUDED_MODULE));

        debug!(
            generator = %config.generator_version,
            lexer = %config.lexer_version,
            "declared minimal compile-only generator dependencies"
        );

        DependencyPlan {
            branch: DeclarationBranch::Ambient,
            compile_only,
            dedicated: DependencySet::named(DEDICATED_SET),
            bom,
        }
    }

    fn dedicated(config: &FrozenConfig, platform_version: &str) -> DependencyPlan {
        let mut dedicated = DependencySet::named(DEDICATED_SET);
        dedicated.coordinates.push(DependencyCoordinate::new(
            GENERATOR_TOOL_GROUP,
            GENERATOR_TOOL_ARTIFACT,
            &config.generator_version,
        ));
        dedicated.coordinates.push(DependencyCoordinate::new(
            LEXER_TOOL_GROUP,
            LEXER_TOOL_ARTIFACT,
            &config.lexer_version,
        ));
        for module in PLATFORM_MODULES {
            dedicated.coordinates.push(DependencyCoordinate::new(
                PLATFORM_MODULE_GROUP,
                module,
                platform_version,
            ));
        }
        dedicated.coordinates.push(DependencyCoordinate::new(
            BYTECODE_LIBRARY_GROUP,
            BYTECODE_LIBRARY_ARTIFACT,
            BYTECODE_LIBRARY_VERSION,
        ));

        for group in DEDICATED_EXCLUDED_GROUPS {
            dedicated.exclusions.push(ExclusionRule::group(group));
        }
        dedicated.exclusions.push(ExclusionRule::module("idea"));

        debug!(
            generator = %config.generator_version,
            lexer = %config.lexer_version,
            platform = %platform_version,
            "declared full dedicated generator classpath"
        );

        DependencyPlan {
            branch: DeclarationBranch::Dedicated,
            compile_only: DependencySet::named(COMPILE_ONLY_SET),
            dedicated,
            bom: DependencySet::named(BOM_SET),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::frozen_config;

    #[test]
    fn absent_platform_version_takes_the_ambient_branch() {
        let config = frozen_config("2022.3.2", None);

        let plan = DependencySetBuilder::plan(&config);

        assert_eq!(plan.branch, DeclarationBranch::Ambient);
        assert_eq!(plan.compile_only.coordinates.len(), 2);
        assert_eq!(plan.bom.coordinates.len(), 1);
        assert!(plan.dedicated.is_empty());
    }

    #[test]
    fn ambient_branch_declares_tools_and_plugin_exclusions() {
        let config = frozen_config("2022.3.2", None);

        let plan = DependencySetBuilder::plan(&config);

        let rendered: Vec<String> =
            plan.compile_only.coordinates.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "org.jetbrains:grammar-kit:2022.3.2".to_string(),
                "org.jetbrains.intellij.deps.jflex:jflex:1.9.1".to_string(),
            ]
        );
        assert_eq!(
            plan.compile_only.exclusions,
            vec![
                ExclusionRule::group_module("org.jetbrains.plugins", "ant"),
                ExclusionRule::group_module("org.jetbrains.plugins", "idea"),
            ]
        );
        assert_eq!(plan.bom.exclusions.len(), 1);
    }

    #[test]
    fn present_platform_version_takes_the_dedicated_branch() {
        let config = frozen_config("2022.3.2", Some("231.8109.175"));

        let plan = DependencySetBuilder::plan(&config);

        assert_eq!(plan.branch, DeclarationBranch::Dedicated);
        assert_eq!(plan.dedicated.coordinates.len(), 7);
        assert!(plan.compile_only.is_empty());
        assert!(plan.bom.is_empty());
    }

    #[test]
    fn dedicated_branch_pins_platform_modules_to_the_configured_version() {
        let config = frozen_config("2022.3.2", Some("231.8109.175"));

        let plan = DependencySetBuilder::plan(&config);

        let platform: Vec<_> = plan
            .dedicated
            .coordinates
            .iter()
            .filter(|c| c.group == "com.jetbrains.intellij.platform")
            .collect();
        assert_eq!(platform.len(), 4);
        assert!(platform.iter().all(|c| c.version == "231.8109.175"));

        let asm = plan
            .dedicated
            .coordinates
            .iter()
            .find(|c| c.artifact == "asm-all")
            .expect("bytecode library is declared");
        assert_eq!(asm.version, "9.2");
    }

    #[test]
    fn dedicated_branch_carries_five_group_and_one_module_exclusion() {
        let config = frozen_config("2022.3.2", Some("231.8109.175"));

        let plan = DependencySetBuilder::plan(&config);

        let (groups, modules): (Vec<_>, Vec<_>) =
            plan.dedicated.exclusions.iter().partition(|e| e.group.is_some());
        assert_eq!(groups.len(), 5);
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0], &ExclusionRule::module("idea"));
    }

    #[test]
    fn exclusion_rules_match_per_dimension() {
        let by_group = ExclusionRule::group("com.jetbrains.rd");
        assert!(by_group.suppresses("com.jetbrains.rd", "rd-core"));
        assert!(by_group.suppresses("com.jetbrains.rd", "rd-framework"));
        assert!(!by_group.suppresses("org.roaringbitmap", "rd-core"));

        let by_module = ExclusionRule::module("idea");
        assert!(by_module.suppresses("org.jetbrains.plugins", "idea"));
        assert!(by_module.suppresses("anything.else", "idea"));
        assert!(!by_module.suppresses("org.jetbrains.plugins", "ant"));

        let both = ExclusionRule::group_module("org.jetbrains.plugins", "ant");
        assert!(both.suppresses("org.jetbrains.plugins", "ant"));
        assert!(!both.suppresses("org.jetbrains.plugins", "idea"));
    }
}
