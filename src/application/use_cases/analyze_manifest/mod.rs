use crate::application::dto::{AnalysisKind, AnalysisRequest, AnalysisResponse, ManifestInput};
use crate::application::providers::{EcosystemProvider, ProviderRegistry};
use crate::config::AnalysisConfig;
use crate::ports::inbound::ManifestAnalysisPort;
use crate::ports::outbound::{CommandRunner, ProgressReporter};
use crate::shared::error::SbomError;
use crate::shared::security::validate_regular_file;
use crate::shared::Result;
use std::path::PathBuf;

/// AnalyzeManifestUseCase - stack and component analysis of one manifest
///
/// Selects the provider for the manifest, resolves the analysis options
/// against the environment and hands the graph to the CycloneDX serializer.
///
/// # Type Parameters
/// * `R` - CommandRunner implementation shared by every provider
/// * `PR` - ProgressReporter implementation
pub struct AnalyzeManifestUseCase<R, PR> {
    registry: ProviderRegistry<R>,
    progress_reporter: PR,
}

impl<R, PR> AnalyzeManifestUseCase<R, PR>
where
    R: CommandRunner + Clone,
    PR: ProgressReporter,
{
    /// Creates the use case with the default provider set
    pub fn new(runner: R, progress_reporter: PR) -> Self {
        Self::with_registry(ProviderRegistry::with_defaults(runner), progress_reporter)
    }

    pub fn with_registry(registry: ProviderRegistry<R>, progress_reporter: PR) -> Self {
        Self {
            registry,
            progress_reporter,
        }
    }

    fn validate_manifest(&self, manifest: &ManifestInput) -> Result<String> {
        if let ManifestInput::Path(path) = manifest {
            validate_regular_file(path, "manifest")?;
        }
        manifest
            .manifest_name()
            .map(str::to_string)
            .ok_or_else(|| {
                SbomError::InvalidManifestPath {
                    path: match manifest {
                        ManifestInput::Path(path) => path.clone(),
                        ManifestInput::Content { manifest_name, .. } => {
                            PathBuf::from(manifest_name)
                        }
                    },
                    reason: "Manifest file name is not valid UTF-8".to_string(),
                }
                .into()
            })
    }
}

impl<R, PR> ManifestAnalysisPort for AnalyzeManifestUseCase<R, PR>
where
    R: CommandRunner + Clone,
    PR: ProgressReporter,
{
    fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse> {
        let manifest_name = self.validate_manifest(&request.manifest)?;
        let provider = self
            .registry
            .match_manifest(&manifest_name, request.manifest.manifest_dir())?;
        let config = AnalysisConfig::resolve(&request.options)?;

        self.progress_reporter.report(&format!(
            "🔍 Running {} analysis of {} with the {} provider",
            request.kind,
            manifest_name,
            provider.name()
        ));
        tracing::info!(
            manifest = manifest_name.as_str(),
            provider = provider.name(),
            kind = %request.kind,
            "starting analysis"
        );

        let graph = provider.build_graph(&request.manifest, &config, request.kind.is_transitive())?;
        let component_count = graph.len();
        let provided = provider.serialize(&graph)?;

        let scope = match request.kind {
            AnalysisKind::Stack => "component(s)",
            AnalysisKind::Component => "component(s), direct dependencies only",
        };
        self.progress_reporter.report_completion(&format!(
            "✅ SBOM ready: {} {}",
            component_count, scope
        ));

        Ok(AnalysisResponse::new(provided, component_count))
    }
}
