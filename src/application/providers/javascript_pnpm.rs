use super::{ensure_tool, EcosystemProvider};
use crate::application::dto::ManifestInput;
use crate::config::AnalysisConfig;
use crate::ports::outbound::CommandRunner;
use crate::sbom_generation::domain::{DependencyGraph, Ecosystem};
use crate::sbom_generation::services::npm_listing::{build_npm_graph, NpmListing, PackageManifest};
use crate::shared::security::read_text_file;
use crate::shared::Result;
use std::path::Path;
use tracing::info;

const MANIFEST_NAME: &str = "package.json";
const LOCK_FILE_NAME: &str = "pnpm-lock.yaml";

/// pnpm provider, selected by a `pnpm-lock.yaml` next to package.json
#[derive(Debug, Clone)]
pub struct PnpmProvider<R> {
    runner: R,
}

impl<R: CommandRunner> PnpmProvider<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> EcosystemProvider for PnpmProvider<R> {
    fn name(&self) -> &'static str {
        "pnpm"
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
        let pnpm = config.pnpm.program.as_str();
        ensure_tool(&self.runner, &config.pnpm, &["--version"])?;

        let content = read_text_file(manifest.path(), MANIFEST_NAME)?;
        let package = PackageManifest::parse(&content, manifest.path())?;

        let dir = manifest.directory();
        let dir_arg = dir.to_string_lossy().into_owned();
        if !dir.join(LOCK_FILE_NAME).exists() {
            info!(dir = %dir_arg, "no lock file, generating one");
            self.runner
                .run(pnpm, &["install", "--lockfile-only", "--dir", dir_arg.as_str()], None)?;
        }

        let depth = if transitive { "--depth=Infinity" } else { "--depth=0" };
        let output = self.runner.run(
            pnpm,
            &["ls", "--dir", dir_arg.as_str(), depth, "--prod", "--json"],
            None,
        )?;

        let listing = NpmListing::parse_pnpm(&output)?;
        let graph = build_npm_graph(&listing, &package.exhortignore)?;
        info!(
            components = graph.len(),
            ignored = package.exhortignore.len(),
            transitive,
            "built pnpm dependency graph"
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::providers::testing::ScriptedRunner;
    use crate::sbom_generation::services::npm_listing::npm_purl;
    use std::fs;
    use tempfile::TempDir;

    const LISTING: &str = r#"[{
  "name": "app",
  "version": "1.0.0",
  "path": "/work/app",
  "dependencies": {
    "zod": {"from": "zod", "version": "3.22.4"},
    "axios": {"from": "axios", "version": "1.6.0", "dependencies": {"follow-redirects": {"from": "follow-redirects", "version": "1.15.3"}}},
    "jsonwebtoken": {"from": "jsonwebtoken", "version": "8.5.1"}
  }
}]"#;

    fn manifest_dir(with_lock: bool) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name":"app","version":"1.0.0","exhortignore":["jsonwebtoken"]}"#,
        )
        .unwrap();
        if with_lock {
            fs::write(dir.path().join("pnpm-lock.yaml"), "lockfileVersion: '6.0'\n").unwrap();
        }
        dir
    }

    fn runner() -> ScriptedRunner {
        ScriptedRunner::default()
            .respond("pnpm --version", "8.10.2")
            .respond("pnpm ls", LISTING)
    }

    #[test]
    fn test_lock_file_selects_pnpm() {
        let provider = PnpmProvider::new(ScriptedRunner::default());
        assert!(provider.is_supported("package.json"));
        assert!(provider.validate_lock_file(Some(manifest_dir(true).path())));
        assert!(!provider.validate_lock_file(Some(manifest_dir(false).path())));
        assert!(!provider.validate_lock_file(None));
    }

    #[test]
    fn test_stack_listing_keeps_order_and_filters_ignored() {
        let dir = manifest_dir(true);
        let runner = runner();
        let provider = PnpmProvider::new(runner.clone());

        let graph = provider
            .build_graph(
                &ManifestInput::Path(dir.path().join("package.json")),
                &AnalysisConfig::default(),
                true,
            )
            .unwrap();

        let children: Vec<String> = graph
            .dependencies_of(graph.root().unwrap())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(children, vec!["pkg:npm/zod@3.22.4", "pkg:npm/axios@1.6.0"]);
        assert!(graph.contains(&npm_purl("follow-redirects", Some("1.15.3")).unwrap()));

        let ls = runner
            .calls()
            .into_iter()
            .find(|c| c.starts_with("pnpm ls"))
            .unwrap();
        assert!(ls.ends_with(" --depth=Infinity --prod --json"));
        assert!(!runner.calls().iter().any(|c| c.starts_with("pnpm install")));
    }

    #[test]
    fn test_component_listing_uses_depth_zero() {
        let dir = manifest_dir(true);
        let runner = runner();
        let provider = PnpmProvider::new(runner.clone());

        let provided = provider
            .provide_component(
                &ManifestInput::Path(dir.path().join("package.json")),
                &AnalysisConfig::default(),
            )
            .unwrap();

        assert_eq!(provided.ecosystem, Ecosystem::Npm);
        assert!(runner.calls().iter().any(|c| c.contains("--depth=0")));
    }

    #[test]
    fn test_missing_pnpm_names_its_option() {
        let dir = manifest_dir(true);
        let provider = PnpmProvider::new(ScriptedRunner::default());

        let err = provider
            .provide_stack(&dir.path().join("package.json"), &AnalysisConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("EXHORT_PNPM_PATH"));
    }
}
