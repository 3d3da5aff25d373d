use super::{ensure_tool, EcosystemProvider};
use crate::application::dto::ManifestInput;
use crate::config::AnalysisConfig;
use crate::ports::outbound::CommandRunner;
use crate::sbom_generation::domain::{DependencyGraph, Ecosystem};
use crate::sbom_generation::services::gradle_tree::{
    build_gradle_graph, parse_dependency_tree, parse_ignored_dependencies, parse_root_properties,
};
use crate::shared::security::read_text_file;
use crate::shared::Result;
use tracing::info;

const MANIFEST_NAMES: [&str; 2] = ["build.gradle", "build.gradle.kts"];
const CONFIGURATION: &str = "runtimeClasspath";

/// Gradle provider for Groovy and Kotlin build scripts
#[derive(Debug, Clone)]
pub struct GradleProvider<R> {
    runner: R,
}

impl<R: CommandRunner> GradleProvider<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> EcosystemProvider for GradleProvider<R> {
    fn name(&self) -> &'static str {
        "gradle"
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Maven
    }

    fn is_supported(&self, manifest_name: &str) -> bool {
        MANIFEST_NAMES.contains(&manifest_name)
    }

    fn build_graph(
        &self,
        manifest: &ManifestInput,
        config: &AnalysisConfig,
        transitive: bool,
    ) -> Result<DependencyGraph> {
        let manifest = manifest.materialize()?;
        let gradle = config.gradle.program.as_str();
        ensure_tool(&self.runner, &config.gradle, &["--version"])?;

        let script = read_text_file(manifest.path(), "build script")?;
        let ignored = parse_ignored_dependencies(&script);
        let dir = manifest.directory();

        let properties = self.runner.run(gradle, &["properties"], Some(dir))?;
        let root = parse_root_properties(&properties)?;

        let tree = self.runner.run(
            gradle,
            &["dependencies", "--configuration", CONFIGURATION],
            Some(dir),
        )?;
        let entries = parse_dependency_tree(&tree)?;

        let graph = build_gradle_graph(root, &entries, &ignored, transitive)?;
        info!(
            entries = entries.len(),
            components = graph.len(),
            ignored = ignored.len(),
            transitive,
            "built gradle dependency graph"
        );
        Ok(graph)
    }
}
