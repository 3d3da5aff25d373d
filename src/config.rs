//! Analysis configuration.
//!
//! Options arrive per call as a string map, optionally loaded from a YAML
//! file. They are resolved once into an [`AnalysisConfig`] in the order
//! explicit option > environment variable > built-in default, and that
//! structure is handed down to the providers.

use anyhow::Context;
use serde_yaml_ng::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::shared::error::SbomError;
use crate::shared::Result;

/// Go strict mode: fail when installed and declared versions differ
pub const MATCH_MANIFEST_VERSIONS: &str = "MATCH_MANIFEST_VERSIONS";
/// Rewrite Go module edges to the versions MVS selected
pub const GO_MVS_LOGIC_ENABLED: &str = "EXHORT_GO_MVS_LOGIC_ENABLED";
pub const GO_PATH: &str = "EXHORT_GO_PATH";
pub const NPM_PATH: &str = "EXHORT_NPM_PATH";
pub const PNPM_PATH: &str = "EXHORT_PNPM_PATH";
pub const YARN_PATH: &str = "EXHORT_YARN_PATH";
pub const GRADLE_PATH: &str = "EXHORT_GRADLE_PATH";

const KNOWN_KEYS: [&str; 7] = [
    MATCH_MANIFEST_VERSIONS,
    GO_MVS_LOGIC_ENABLED,
    GO_PATH,
    NPM_PATH,
    PNPM_PATH,
    YARN_PATH,
    GRADLE_PATH,
];

/// Explicit per-call options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    values: BTreeMap<String, String>,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Overlays `other` on top of these options
    pub fn merge(&mut self, other: AnalysisOptions) {
        self.values.extend(other.values);
    }

    /// Loads a flat YAML mapping of option keys to scalar values.
    ///
    /// Unknown keys are kept and reported with a warning.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
                path.display()
            )
        })?;
        Self::from_yaml(&content).with_context(|| {
            format!(
                "Failed to parse config file: {}\n\n💡 Hint: Use a flat YAML mapping such as `MATCH_MANIFEST_VERSIONS: true`.",
                path.display()
            )
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, Value> = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_yaml_ng::from_str(content)?
        };

        let mut options = AnalysisOptions::new();
        for (key, value) in raw {
            let value = match value {
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(SbomError::InvalidOption {
                        key,
                        value: format!("{:?}", other),
                        expected: "a scalar value".to_string(),
                    }
                    .into())
                }
            };
            if !KNOWN_KEYS.contains(&key.as_str()) {
                tracing::warn!(key = key.as_str(), "unknown option in config file");
            }
            options.set(&key, value);
        }
        Ok(options)
    }
}

/// Executable for one ecosystem tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPath {
    pub tool: &'static str,
    pub env_key: &'static str,
    pub program: String,
}

/// Configuration resolved for a single analysis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub match_manifest_versions: bool,
    pub go_mvs_enabled: bool,
    pub go: ToolPath,
    pub npm: ToolPath,
    pub pnpm: ToolPath,
    pub yarn: ToolPath,
    pub gradle: ToolPath,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            match_manifest_versions: false,
            go_mvs_enabled: false,
            go: default_tool("go", GO_PATH),
            npm: default_tool("npm", NPM_PATH),
            pnpm: default_tool("pnpm", PNPM_PATH),
            yarn: default_tool("yarn", YARN_PATH),
            gradle: default_tool("gradle", GRADLE_PATH),
        }
    }
}

fn default_tool(tool: &'static str, env_key: &'static str) -> ToolPath {
    ToolPath {
        tool,
        env_key,
        program: tool.to_string(),
    }
}

impl AnalysisConfig {
    /// Resolves against the process environment
    pub fn resolve(options: &AnalysisOptions) -> Result<Self> {
        Self::resolve_with(options, |key| std::env::var(key).ok())
    }

    /// Resolves against `env`, which stands in for the process environment
    ///
    /// # Arguments
    /// * `options` - Explicit options; these win over the environment
    /// * `env` - Lookup for environment variables; blank values count as unset
    ///
    /// # Errors
    /// Returns `InvalidOption` if a boolean option is not `true` or `false`
    pub fn resolve_with<F>(options: &AnalysisOptions, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| -> Option<String> {
            options
                .get(key)
                .map(str::to_string)
                .or_else(|| env(key).filter(|v| !v.trim().is_empty()))
        };

        let mut config = AnalysisConfig::default();
        if let Some(value) = lookup(MATCH_MANIFEST_VERSIONS) {
            config.match_manifest_versions = parse_bool(MATCH_MANIFEST_VERSIONS, &value)?;
        }
        if let Some(value) = lookup(GO_MVS_LOGIC_ENABLED) {
            config.go_mvs_enabled = parse_bool(GO_MVS_LOGIC_ENABLED, &value)?;
        }
        for tool in [
            &mut config.go,
            &mut config.npm,
            &mut config.pnpm,
            &mut config.yarn,
            &mut config.gradle,
        ] {
            if let Some(program) = lookup(tool.env_key) {
                tool.program = program;
            }
        }

        tracing::debug!(
            match_manifest_versions = config.match_manifest_versions,
            go_mvs_enabled = config.go_mvs_enabled,
            go = config.go.program.as_str(),
            npm = config.npm.program.as_str(),
            pnpm = config.pnpm.program.as_str(),
            yarn = config.yarn.program.as_str(),
            gradle = config.gradle.program.as_str(),
            "resolved analysis configuration"
        );
        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SbomError::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
            expected: "true or false".to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::resolve_with(&AnalysisOptions::new(), env_of(&[])).unwrap();
        assert!(!config.match_manifest_versions);
        assert!(!config.go_mvs_enabled);
        assert_eq!(config.go.program, "go");
        assert_eq!(config.npm.program, "npm");
        assert_eq!(config.pnpm.program, "pnpm");
        assert_eq!(config.yarn.program, "yarn");
        assert_eq!(config.gradle.program, "gradle");
    }

    #[test]
    fn test_javascript_tool_paths_resolve_independently() {
        let options = AnalysisOptions::new().with(YARN_PATH, "/opt/yarn/bin/yarn");
        let env = env_of(&[(PNPM_PATH, "/usr/local/bin/pnpm"), (YARN_PATH, "/usr/bin/yarn")]);
        let config = AnalysisConfig::resolve_with(&options, env).unwrap();

        assert_eq!(config.npm.program, "npm");
        assert_eq!(config.pnpm.program, "/usr/local/bin/pnpm");
        assert_eq!(config.yarn.program, "/opt/yarn/bin/yarn");
        assert_eq!(config.yarn.env_key, YARN_PATH);
    }

    #[test]
    fn test_option_wins_over_environment() {
        let options = AnalysisOptions::new()
            .with(MATCH_MANIFEST_VERSIONS, "false")
            .with(GO_PATH, "/opt/go/bin/go");
        let env = env_of(&[
            (MATCH_MANIFEST_VERSIONS, "true"),
            (GO_PATH, "/usr/bin/go"),
            (GO_MVS_LOGIC_ENABLED, "TRUE"),
        ]);
        let config = AnalysisConfig::resolve_with(&options, env).unwrap();

        assert!(!config.match_manifest_versions);
        assert!(config.go_mvs_enabled);
        assert_eq!(config.go.program, "/opt/go/bin/go");
    }

    #[test]
    fn test_blank_environment_value_is_unset() {
        let config = AnalysisConfig::resolve_with(
            &AnalysisOptions::new(),
            env_of(&[(MATCH_MANIFEST_VERSIONS, "  ")]),
        )
        .unwrap();
        assert!(!config.match_manifest_versions);
    }

    #[test]
    fn test_invalid_bool_is_configuration_error() {
        let options = AnalysisOptions::new().with(GO_MVS_LOGIC_ENABLED, "yes");
        let err = AnalysisConfig::resolve_with(&options, env_of(&[])).unwrap_err();
        match err.downcast_ref::<SbomError>() {
            Some(SbomError::InvalidOption { key, value, .. }) => {
                assert_eq!(key, GO_MVS_LOGIC_ENABLED);
                assert_eq!(value, "yes");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_yaml_converts_scalars_and_keeps_unknown_keys() {
        let options = AnalysisOptions::from_yaml(
            "MATCH_MANIFEST_VERSIONS: true\nEXHORT_NPM_PATH: /opt/npm\nEXHORT_DEV_MODE: 1\n",
        )
        .unwrap();
        assert_eq!(options.get(MATCH_MANIFEST_VERSIONS), Some("true"));
        assert_eq!(options.get(NPM_PATH), Some("/opt/npm"));
        assert_eq!(options.get("EXHORT_DEV_MODE"), Some("1"));
    }

    #[test]
    fn test_from_yaml_rejects_nested_values() {
        let err = AnalysisOptions::from_yaml("EXHORT_GO_PATH:\n  - a\n  - b\n").unwrap_err();
        assert!(err.to_string().contains("EXHORT_GO_PATH"));
        assert!(AnalysisOptions::from_yaml("").unwrap().get(GO_PATH).is_none());
    }

    #[test]
    fn test_merge_overlays_values() {
        let mut base = AnalysisOptions::new()
            .with(MATCH_MANIFEST_VERSIONS, "false")
            .with(GO_PATH, "go1");
        base.merge(AnalysisOptions::new().with(MATCH_MANIFEST_VERSIONS, "true"));
        assert_eq!(base.get(MATCH_MANIFEST_VERSIONS), Some("true"));
        assert_eq!(base.get(GO_PATH), Some("go1"));
    }

    #[test]
    fn test_load_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exhort.yml");
        fs::write(&path, "EXHORT_GO_MVS_LOGIC_ENABLED: false\n").unwrap();
        let options = AnalysisOptions::load_from_path(&path).unwrap();
        assert_eq!(options.get(GO_MVS_LOGIC_ENABLED), Some("false"));

        let missing = AnalysisOptions::load_from_path(&dir.path().join("missing.yml"));
        assert!(missing.unwrap_err().to_string().contains("Failed to read config file"));
    }

    #[test]
    #[serial_test::serial]
    fn test_resolve_reads_process_environment() {
        let original = std::env::var(GRADLE_PATH).ok();
        std::env::set_var(GRADLE_PATH, "/opt/gradle/bin/gradle");

        let config = AnalysisConfig::resolve(&AnalysisOptions::new()).unwrap();
        assert_eq!(config.gradle.program, "/opt/gradle/bin/gradle");

        match original {
            Some(val) => std::env::set_var(GRADLE_PATH, val),
            None => std::env::remove_var(GRADLE_PATH),
        }
    }
}
