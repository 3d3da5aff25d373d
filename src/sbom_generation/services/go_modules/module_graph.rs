use super::manifest::GoModManifest;
use crate::sbom_generation::domain::{
    DependencyGraph, Ecosystem, PackageUrl, VersionDelimiter,
};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::HashMap;

/// Version given to the main module, which `go mod graph` prints bare
pub const DEFAULT_MAIN_MODULE_VERSION: &str = "v0.0.0";

const TOOLCHAIN_MODULES: [&str; 2] = ["go", "toolchain"];

/// One `parent child` row of `go mod graph`, kept as raw tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEdge {
    pub parent: String,
    pub child: String,
}

impl ModuleEdge {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

/// Module path of a `path@version` token
pub fn module_path(token: &str) -> &str {
    token.split_once('@').map_or(token, |(path, _)| path)
}

/// Version of a `path@version` token
pub fn module_version(token: &str) -> Option<&str> {
    token.split_once('@').map(|(_, version)| version)
}

/// Parses `go mod graph` output into edges, dropping toolchain rows
///
/// # Errors
/// Returns `ToolOutputParse` naming the line of any row that is not a
/// `parent child` pair
pub fn parse_module_graph(output: &str) -> Result<Vec<ModuleEdge>> {
    let mut edges = Vec::new();
    for (idx, line) in output.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let (Some(parent), Some(child), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(SbomError::ToolOutputParse {
                tool: "go mod graph".to_string(),
                details: format!("line {} is not a `parent child` pair: {}", idx + 1, line),
            }
            .into());
        };
        if TOOLCHAIN_MODULES.contains(&module_path(child)) {
            continue;
        }
        edges.push(ModuleEdge::new(parent, child));
    }
    Ok(edges)
}

/// Root token: parent of the first row, else the manifest's module path
pub fn root_token(edges: &[ModuleEdge], manifest: &GoModManifest) -> Result<String> {
    if let Some(first) = edges.first() {
        return Ok(first.parent.clone());
    }
    manifest.module().map(str::to_string).ok_or_else(|| {
        SbomError::InvalidGraph {
            reason: "module graph is empty and the manifest declares no module".to_string(),
        }
        .into()
    })
}

/// Fails on the first direct dependency whose graph version differs from
/// the version the manifest declares for it
///
/// # Errors
/// Returns `VersionMismatch` with the declared and installed versions
pub fn check_manifest_versions(
    edges: &[ModuleEdge],
    root: &str,
    manifest: &GoModManifest,
) -> Result<()> {
    for edge in edges.iter().filter(|e| e.parent == root) {
        let name = module_path(&edge.child);
        let installed = module_version(&edge.child).unwrap_or_default();
        if let Some(declared) = manifest.declared_version(name) {
            if declared != installed {
                return Err(SbomError::VersionMismatch {
                    name: name.to_string(),
                    manifest_version: declared.to_string(),
                    installed_version: installed.to_string(),
                }
                .into());
            }
        }
    }
    Ok(())
}

/// Parses `go list -m all` output into `module path -> selected version`.
///
/// The main module line carries no version and is skipped. Replaced modules
/// (`a v1 => b v2`) keep the version of the module being replaced.
pub fn parse_final_versions(output: &str) -> HashMap<String, String> {
    output
        .lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next()) {
                (Some(path), Some(version)) if version != "=>" => {
                    Some((path.to_string(), version.to_string()))
                }
                _ => None,
            }
        })
        .collect()
}

/// Rewrites every edge endpoint to the version MVS selected for it.
///
/// Bare parents (the main module) stay bare; modules missing from the
/// listing keep their edge-list version.
pub fn apply_final_versions(
    edges: &[ModuleEdge],
    final_versions: &HashMap<String, String>,
) -> Vec<ModuleEdge> {
    let rewrite = |token: &str| -> String {
        if module_version(token).is_none() {
            return token.to_string();
        }
        let path = module_path(token);
        match final_versions.get(path) {
            Some(version) => format!("{}@{}", path, version),
            None => token.to_string(),
        }
    };

    edges
        .iter()
        .map(|edge| ModuleEdge::new(rewrite(&edge.parent), rewrite(&edge.child)))
        .collect()
}

fn to_purl(token: &str) -> Result<PackageUrl> {
    Ok(PackageUrl::from_coordinate(Ecosystem::Golang, token, VersionDelimiter::At)?
        .with_default_version(DEFAULT_MAIN_MODULE_VERSION))
}

/// Builds the module graph from (already reconciled) edges.
///
/// Transitive mode adds every edge and then removes ignored modules by
/// exact purl. Direct mode keeps only the non-ignored children of the root.
/// Both modes finish with a name-based pass: an ignored module the root
/// still depends on directly, at whatever version, is removed by name.
///
/// # Arguments
/// * `edges` - `go mod graph` rows, reconciled with MVS when enabled
/// * `root` - Token of the main module, see [`root_token`]
/// * `manifest` - Parsed go.mod supplying the `exhortignore` markers
/// * `transitive` - Stack (`true`) or component (`false`) analysis
///
/// # Returns
/// The dependency graph rooted at the main module
pub fn build_module_graph(
    edges: &[ModuleEdge],
    root: &str,
    manifest: &GoModManifest,
    transitive: bool,
) -> Result<DependencyGraph> {
    let ignored = manifest.ignored_purls()?;
    let ignored_keys: Vec<String> = ignored.iter().map(ToString::to_string).collect();

    let mut graph = DependencyGraph::new();
    let root_id = graph.add_root(to_purl(root)?)?;

    if transitive {
        let mut current: Option<(&str, _)> = None;
        for edge in edges {
            let parent_id = match current {
                Some((parent, id)) if parent == edge.parent => id,
                _ => {
                    let purl = to_purl(&edge.parent)?;
                    let id = match graph.lookup(&purl) {
                        Some(id) => id,
                        None => graph.add_component(purl),
                    };
                    current = Some((edge.parent.as_str(), id));
                    id
                }
            };
            graph.add_dependency(parent_id, to_purl(&edge.child)?)?;
        }
        let removed = graph.filter_ignored_deps_including_version(&ignored_keys);
        tracing::debug!(removed, "removed ignored modules by exact version");
    } else {
        for edge in edges.iter().filter(|e| e.parent == root) {
            let child = to_purl(&edge.child)?;
            if ignored.contains(&child) {
                continue;
            }
            graph.add_dependency(root_id, child)?;
        }
    }

    for purl in &ignored {
        let name = purl.qualified_name();
        if graph.depends_directly_on(root_id, &name) {
            let removed = graph.filter_ignored_deps(&[name.as_str()]);
            tracing::debug!(module = %name, removed, "removed drifted ignored module by name");
        } else if graph.reachable_by_name(root_id, &name) {
            tracing::warn!(
                module = %name,
                "ignored module is still reachable through another dependency at a different version"
            );
        }
    }

    Ok(graph)
}
