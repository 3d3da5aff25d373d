use super::{ensure_tool, EcosystemProvider};
use crate::application::dto::ManifestInput;
use crate::config::AnalysisConfig;
use crate::ports::outbound::CommandRunner;
use crate::sbom_generation::domain::{DependencyGraph, Ecosystem};
use crate::sbom_generation::services::npm_listing::PackageManifest;
use crate::sbom_generation::services::yarn_listing::{
    build_yarn_berry_graph, build_yarn_classic_graph, YarnBerryListing, YarnClassicListing,
};
use crate::shared::error::SbomError;
use crate::shared::security::read_text_file;
use crate::shared::Result;
use std::path::Path;
use tracing::info;

const MANIFEST_NAME: &str = "package.json";
const LOCK_FILE_NAME: &str = "yarn.lock";

/// Yarn release line, told apart by `yarn --version`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YarnFlavor {
    /// 1.x
    Classic,
    /// 2.x and later
    Berry,
}

impl YarnFlavor {
    pub fn from_version(version: &str) -> Self {
        if version.trim().starts_with("1.") {
            YarnFlavor::Classic
        } else {
            YarnFlavor::Berry
        }
    }
}

/// Yarn provider, selected by a `yarn.lock` next to package.json
#[derive(Debug, Clone)]
pub struct YarnProvider<R> {
    runner: R,
}

impl<R: CommandRunner> YarnProvider<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> EcosystemProvider for YarnProvider<R> {
    fn name(&self) -> &'static str {
        "yarn"
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn is_supported(&self, manifest_name: &str) -> bool {
        manifest_name == MANIFEST_NAME
    }

    fn validate_lock_file(&self, manifest_dir: Option<&Path>) -> bool {
        manifest_dir.is_some_and(|dir| dir.join(LOCK_FILE_NAME).is_file())
    }

    fn build_graph(
        &self,
        manifest: &ManifestInput,
        config: &AnalysisConfig,
        transitive: bool,
    ) -> Result<DependencyGraph> {
        let manifest = manifest.materialize()?;
        let yarn = config.yarn.program.as_str();
        let flavor = YarnFlavor::from_version(&ensure_tool(&self.runner, &config.yarn, &["--version"])?);

        let content = read_text_file(manifest.path(), MANIFEST_NAME)?;
        let package = PackageManifest::parse(&content, manifest.path())?;
        let dir = manifest.directory();
        if !dir.join(LOCK_FILE_NAME).exists() {
            return Err(SbomError::InvalidManifestPath {
                path: dir.join(LOCK_FILE_NAME),
                reason: "yarn analysis needs an existing yarn.lock".to_string(),
            }
            .into());
        }

        let graph = match flavor {
            YarnFlavor::Classic => {
                let mut args = vec!["list", "--prod", "--frozen-lockfile", "--json"];
                if !transitive {
                    args.push("--depth=0");
                }
                let output = self.runner.run(yarn, &args, Some(dir))?;
                build_yarn_classic_graph(&YarnClassicListing::parse(&output)?, &package, transitive)?
            }
            YarnFlavor::Berry => {
                let args: &[&str] = if transitive {
                    &["info", "--recursive", "--json"]
                } else {
                    &["info", "--json"]
                };
                let output = self.runner.run(yarn, args, Some(dir))?;
                build_yarn_berry_graph(&YarnBerryListing::parse(&output)?, &package, transitive)?
            }
        };

        info!(
            ?flavor,
            components = graph.len(),
            ignored = package.exhortignore.len(),
            transitive,
            "built yarn dependency graph"
        );
        Ok(graph)
    }
}
