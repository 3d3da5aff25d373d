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
const LOCK_FILE_NAME: &str = "package-lock.json";

/// npm provider: `npm ls --json` against the lock file, with the
/// `exhortignore` array of package.json as the ignore list
#[derive(Debug, Clone)]
pub struct NpmProvider<R> {
    runner: R,
}

impl<R: CommandRunner> NpmProvider<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> EcosystemProvider for NpmProvider<R> {
    fn name(&self) -> &'static str {
        "npm"
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn is_supported(&self, manifest_name: &str) -> bool {
        manifest_name == MANIFEST_NAME
    }

    /// Content manifests have no lock file yet; one is generated for them
    fn validate_lock_file(&self, manifest_dir: Option<&Path>) -> bool {
        manifest_dir.map_or(true, |dir| dir.join(LOCK_FILE_NAME).is_file())
    }

    fn build_graph(
        &self,
        manifest: &ManifestInput,
        config: &AnalysisConfig,
        transitive: bool,
    ) -> Result<DependencyGraph> {
        let manifest = manifest.materialize()?;
        let npm = config.npm.program.as_str();
        ensure_tool(&self.runner, &config.npm, &["--version"])?;

        let content = read_text_file(manifest.path(), MANIFEST_NAME)?;
        let package = PackageManifest::parse(&content, manifest.path())?;

        let dir = manifest.directory();
        let prefix = dir.to_string_lossy().into_owned();
        if !dir.join(LOCK_FILE_NAME).exists() {
            info!(dir = %prefix, "no lock file, generating one");
            self.runner
                .run(npm, &["i", "--package-lock-only", "--prefix", prefix.as_str()], None)?;
        }

        let mut args = vec!["ls"];
        if transitive {
            args.push("--all");
        }
        args.extend(["--omit=dev", "--package-lock-only", "--json", "--prefix", prefix.as_str()]);
        let output = self.runner.run(npm, &args, None)?;

        let listing = NpmListing::parse(&output)?;
        let graph = build_npm_graph(&listing, &package.exhortignore)?;
        info!(
            components = graph.len(),
            ignored = package.exhortignore.len(),
            transitive,
            "built npm dependency graph"
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::providers::testing::ScriptedRunner;
    use std::fs;
    use tempfile::TempDir;

    const LISTING: &str = r#"{
  "name": "app",
  "version": "1.0.0",
  "dependencies": {
    "a": {"version": "1.0.0", "dependencies": {"b": {"version": "2.0.0"}}},
    "jsonwebtoken": {"version": "8.5.1"}
  }
}"#;

    fn manifest_dir(with_lock: bool) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name":"app","version":"1.0.0","exhortignore":["jsonwebtoken"]}"#,
        )
        .unwrap();
        if with_lock {
            fs::write(dir.path().join("package-lock.json"), "{}").unwrap();
        }
        dir
    }

    #[test]
    fn test_lock_file_selects_npm() {
        let provider = NpmProvider::new(ScriptedRunner::default());
        assert!(provider.validate_lock_file(Some(manifest_dir(true).path())));
        assert!(!provider.validate_lock_file(Some(manifest_dir(false).path())));
        assert!(provider.validate_lock_file(None));
    }

    #[test]
    fn test_stack_listing_uses_all_and_filters_ignored() {
        let dir = manifest_dir(true);
        let runner = ScriptedRunner::default()
            .respond("npm --version", "10.2.0")
            .respond("npm ls", LISTING);
        let provider = NpmProvider::new(runner.clone());

        let provided = provider
            .provide_stack(&dir.path().join("package.json"), &AnalysisConfig::default())
            .unwrap();

        assert_eq!(provided.ecosystem, Ecosystem::Npm);
        assert!(provided.content.contains("pkg:npm/b@2.0.0"));
        assert!(!provided.content.contains("jsonwebtoken"));

        let ls = runner
            .calls()
            .into_iter()
            .find(|c| c.starts_with("npm ls"))
            .unwrap();
        assert!(ls.starts_with("npm ls --all --omit=dev --package-lock-only --json --prefix "));
        assert!(!runner.calls().iter().any(|c| c.starts_with("npm i ")));
    }

    #[test]
    fn test_component_listing_omits_all() {
        let dir = manifest_dir(true);
        let runner = ScriptedRunner::default()
            .respond("npm --version", "10.2.0")
            .respond("npm ls", LISTING);
        let provider = NpmProvider::new(runner.clone());

        provider
            .build_graph(
                &ManifestInput::Path(dir.path().join("package.json")),
                &AnalysisConfig::default(),
                false,
            )
            .unwrap();

        assert!(runner
            .calls()
            .iter()
            .any(|c| c.starts_with("npm ls --omit=dev")));
    }

    #[test]
    fn test_missing_lock_file_is_generated_first() {
        let dir = manifest_dir(false);
        let runner = ScriptedRunner::default()
            .respond("npm --version", "10.2.0")
            .respond("npm i --package-lock-only", "")
            .respond("npm ls", LISTING);
        let provider = NpmProvider::new(runner.clone());

        provider
            .build_graph(
                &ManifestInput::Path(dir.path().join("package.json")),
                &AnalysisConfig::default(),
                true,
            )
            .unwrap();

        let calls = runner.calls();
        let install = calls
            .iter()
            .position(|c| c.starts_with("npm i --package-lock-only --prefix "))
            .unwrap();
        let list = calls.iter().position(|c| c.starts_with("npm ls")).unwrap();
        assert!(install < list);
    }

    #[test]
    fn test_content_input_with_custom_npm_path() {
        let runner = ScriptedRunner::default()
            .respond("/opt/node/bin/npm --version", "10.2.0")
            .respond("/opt/node/bin/npm i", "")
            .respond("/opt/node/bin/npm ls", LISTING);
        let provider = NpmProvider::new(runner.clone());
        let mut config = AnalysisConfig::default();
        config.npm.program = "/opt/node/bin/npm".to_string();

        let provided = provider
            .provide_component(
                &ManifestInput::Content {
                    manifest_name: "package.json".to_string(),
                    content: r#"{"name":"app","version":"1.0.0"}"#.to_string(),
                },
                &config,
            )
            .unwrap();

        assert!(provided.content.contains("pkg:npm/jsonwebtoken@8.5.1"));
        assert!(runner.calls().iter().all(|c| c.starts_with("/opt/node/bin/npm")));
    }
}
