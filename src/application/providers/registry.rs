use super::{EcosystemProvider, GoModulesProvider, GradleProvider, NpmProvider, PnpmProvider, YarnProvider};
use crate::application::dto::ManifestInput;
use crate::config::AnalysisConfig;
use crate::ports::outbound::CommandRunner;
use crate::sbom_generation::domain::{DependencyGraph, Ecosystem};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::path::Path;

/// Closed set of supported providers
#[derive(Debug, Clone)]
pub enum Provider<R> {
    GoModules(GoModulesProvider<R>),
    Npm(NpmProvider<R>),
    Pnpm(PnpmProvider<R>),
    Yarn(YarnProvider<R>),
    Gradle(GradleProvider<R>),
}

impl<R: CommandRunner> Provider<R> {
    fn inner(&self) -> &dyn EcosystemProvider {
        match self {
            Provider::GoModules(p) => p,
            Provider::Npm(p) => p,
            Provider::Pnpm(p) => p,
            Provider::Yarn(p) => p,
            Provider::Gradle(p) => p,
        }
    }
}

impl<R: CommandRunner> EcosystemProvider for Provider<R> {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn ecosystem(&self) -> Ecosystem {
        self.inner().ecosystem()
    }

    fn is_supported(&self, manifest_name: &str) -> bool {
        self.inner().is_supported(manifest_name)
    }

    fn validate_lock_file(&self, manifest_dir: Option<&Path>) -> bool {
        self.inner().validate_lock_file(manifest_dir)
    }

    fn build_graph(
        &self,
        manifest: &ManifestInput,
        config: &AnalysisConfig,
        transitive: bool,
    ) -> Result<DependencyGraph> {
        self.inner().build_graph(manifest, config, transitive)
    }
}

/// Selects the provider for a manifest file name and the lock file beside it
#[derive(Debug, Clone)]
pub struct ProviderRegistry<R> {
    providers: Vec<Provider<R>>,
}

impl<R: CommandRunner + Clone> ProviderRegistry<R> {
    /// Go modules, npm, pnpm, yarn and Gradle, all sharing `runner`
    pub fn with_defaults(runner: R) -> Self {
        Self::new(vec![
            Provider::GoModules(GoModulesProvider::new(runner.clone())),
            Provider::Npm(NpmProvider::new(runner.clone())),
            Provider::Pnpm(PnpmProvider::new(runner.clone())),
            Provider::Yarn(YarnProvider::new(runner.clone())),
            Provider::Gradle(GradleProvider::new(runner)),
        ])
    }
}

impl<R: CommandRunner> ProviderRegistry<R> {
    pub fn new(providers: Vec<Provider<R>>) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> &[Provider<R>] {
        &self.providers
    }

    /// Picks the single provider that claims the manifest.
    ///
    /// A provider claims it when it supports the file name and finds its
    /// lock file in `manifest_dir`, which is how package.json goes to npm,
    /// pnpm or yarn.
    ///
    /// # Arguments
    /// * `manifest_name` - Bare file name such as `go.mod`
    /// * `manifest_dir` - Directory of a manifest on disk, `None` for content
    ///
    /// # Errors
    /// * `NoProviderMatch` when no provider claims the manifest
    /// * `AmbiguousProvider` when several do, e.g. package.json beside both
    ///   a package-lock.json and a yarn.lock
    pub fn match_manifest(&self, manifest_name: &str, manifest_dir: Option<&Path>) -> Result<&Provider<R>> {
        let candidates: Vec<&Provider<R>> = self
            .providers
            .iter()
            .filter(|p| p.is_supported(manifest_name) && p.validate_lock_file(manifest_dir))
            .collect();

        match candidates.as_slice() {
            [provider] => {
                tracing::debug!(manifest = manifest_name, provider = provider.name(), "provider matched");
                Ok(*provider)
            }
            [] => Err(SbomError::NoProviderMatch {
                manifest: manifest_name.to_string(),
            }
            .into()),
            _ => Err(SbomError::AmbiguousProvider {
                manifest: manifest_name.to_string(),
                candidates: candidates.iter().map(|p| p.name().to_string()).collect(),
            }
            .into()),
        }
    }
}
