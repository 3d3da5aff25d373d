use super::{ensure_tool, EcosystemProvider};
use crate::application::dto::ManifestInput;
use crate::config::AnalysisConfig;
use crate::ports::outbound::CommandRunner;
use crate::sbom_generation::domain::{DependencyGraph, Ecosystem};
use crate::sbom_generation::services::go_modules::{
    apply_final_versions, build_module_graph, check_manifest_versions, parse_final_versions,
    parse_module_graph, root_token, GoModManifest,
};
use crate::shared::security::read_text_file;
use crate::shared::Result;
use tracing::info;

const MANIFEST_NAME: &str = "go.mod";

/// Go modules provider: `go mod graph` plus the go.mod ignore markers
#[derive(Debug, Clone)]
pub struct GoModulesProvider<R> {
    runner: R,
}

impl<R: CommandRunner> GoModulesProvider<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> EcosystemProvider for GoModulesProvider<R> {
    fn name(&self) -> &'static str {
        "go-modules"
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Golang
    }

    fn is_supported(&self, manifest_name: &str) -> bool {
        manifest_name == MANIFEST_NAME
    }

    fn build_graph(
        &self,
        manifest: &ManifestInput,
        config: &AnalysisConfig,
        transitive: bool,
    ) -> Result<DependencyGraph> {
        let manifest = manifest.materialize()?;
        let go = config.go.program.as_str();
        ensure_tool(&self.runner, &config.go, &["version"])?;

        let content = read_text_file(manifest.path(), MANIFEST_NAME)?;
        let go_mod = GoModManifest::parse(&content, manifest.path())?;
        let dir = manifest.directory();

        let output = self.runner.run(go, &["mod", "graph"], Some(dir))?;
        let mut edges = parse_module_graph(&output)?;
        let root = root_token(&edges, &go_mod)?;

        if config.match_manifest_versions {
            check_manifest_versions(&edges, &root, &go_mod)?;
        }

        if transitive && config.go_mvs_enabled {
            self.runner.run(go, &["mod", "download"], Some(dir))?;
            let listing = self.runner.run(go, &["list", "-m", "all"], Some(dir))?;
            edges = apply_final_versions(&edges, &parse_final_versions(&listing));
        }

        let graph = build_module_graph(&edges, &root, &go_mod, transitive)?;
        info!(
            root = root.as_str(),
            edges = edges.len(),
            components = graph.len(),
            transitive,
            "built go module graph"
        );
        Ok(graph)
    }
}
