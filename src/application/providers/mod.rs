//! Ecosystem providers: each one invokes its native tool, parses the
//! output and builds the dependency graph through the domain services.

mod golang_gomodules;
mod java_gradle;
mod javascript_npm;
mod javascript_pnpm;
mod javascript_yarn;
mod registry;

pub use golang_gomodules::GoModulesProvider;
pub use java_gradle::GradleProvider;
pub use javascript_npm::NpmProvider;
pub use javascript_pnpm::PnpmProvider;
pub use javascript_yarn::YarnProvider;
pub use registry::{Provider, ProviderRegistry};

use crate::adapters::outbound::formatters::CycloneDxFormatter;
use crate::application::dto::ManifestInput;
use crate::config::{AnalysisConfig, ToolPath};
use crate::ports::outbound::{CommandRunner, SbomFormatter};
use crate::sbom_generation::domain::{DependencyGraph, Ecosystem, Provided};
use crate::sbom_generation::services::SbomGenerator;
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::io;
use std::path::Path;

/// Capability set shared by every provider
pub trait EcosystemProvider {
    /// Short provider name used in diagnostics
    fn name(&self) -> &'static str;

    fn ecosystem(&self) -> Ecosystem;

    /// Whether this provider handles the manifest file name
    fn is_supported(&self, manifest_name: &str) -> bool;

    /// Whether the lock file this provider needs sits in `manifest_dir`.
    ///
    /// `None` stands for a manifest passed as content, which has no
    /// directory of its own. Providers without a lock file accept anything.
    fn validate_lock_file(&self, _manifest_dir: Option<&Path>) -> bool {
        true
    }

    /// Builds the graph for `manifest`: every transitive dependency when
    /// `transitive` is set, the root's direct dependencies otherwise
    fn build_graph(
        &self,
        manifest: &ManifestInput,
        config: &AnalysisConfig,
        transitive: bool,
    ) -> Result<DependencyGraph>;

    /// Stack analysis: the full transitive SBOM of the manifest at `manifest`
    ///
    /// # Arguments
    /// * `manifest` - Path of the manifest file
    /// * `config` - Resolved options for this call
    ///
    /// # Returns
    /// CycloneDX JSON tagged with this provider's ecosystem
    fn provide_stack(&self, manifest: &Path, config: &AnalysisConfig) -> Result<Provided> {
        let input = ManifestInput::Path(manifest.to_path_buf());
        let graph = self.build_graph(&input, config, true)?;
        self.serialize(&graph)
    }

    /// Component analysis: the direct dependencies of the manifest
    fn provide_component(&self, manifest: &ManifestInput, config: &AnalysisConfig) -> Result<Provided> {
        let graph = self.build_graph(manifest, config, false)?;
        self.serialize(&graph)
    }

    /// Serializes `graph` as CycloneDX JSON tagged with this ecosystem
    fn serialize(&self, graph: &DependencyGraph) -> Result<Provided> {
        let metadata = SbomGenerator::generate_default_metadata();
        let content = CycloneDxFormatter::new().format(graph, &metadata)?;
        Ok(Provided::cyclonedx(self.ecosystem(), content))
    }
}

/// Runs the tool's version query, turning an unresolvable executable into
/// `ToolNotFound` naming the option that overrides its path
///
/// # Returns
/// The trimmed version output
fn ensure_tool<R: CommandRunner>(runner: &R, tool: &ToolPath, version_args: &[&str]) -> Result<String> {
    match runner.run(&tool.program, version_args, None) {
        Ok(version) => {
            let version = version.trim().to_string();
            tracing::debug!(tool = tool.tool, version = version.as_str(), "tool available");
            Ok(version)
        }
        Err(err) => {
            let not_found = matches!(
                err.downcast_ref::<SbomError>(),
                Some(SbomError::ToolSpawn { source, .. }) if source.kind() == io::ErrorKind::NotFound
            );
            if not_found {
                Err(SbomError::ToolNotFound {
                    tool: tool.tool.to_string(),
                    path: tool.program.clone(),
                    env_key: tool.env_key.to_string(),
                }
                .into())
            } else {
                Err(err)
            }
        }
    }
}
