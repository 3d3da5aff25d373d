//! Parsing of yarn's NDJSON listings.
//!
//! Yarn classic (`yarn list --json`) prints one `tree` event whose trees
//! are the hoisted packages; a child marked `shadow` refers to a package
//! listed elsewhere. Yarn berry (`yarn info --json`) prints one object per
//! package locator, the workspace itself included.

use super::npm_listing::{npm_purl, PackageManifest};
use crate::sbom_generation::domain::{ComponentId, DependencyGraph};
use crate::shared::error::SbomError;
use crate::shared::Result;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

const WORKSPACE_PROTOCOL: &str = "@workspace:";

/// Splits `name@reference` at the first `@` past a scope's leading one.
/// The reference itself may contain `@` (`patch:` locators do).
pub fn split_descriptor(descriptor: &str) -> Option<(&str, &str)> {
    let idx = descriptor.get(1..)?.find('@')? + 1;
    Some((&descriptor[..idx], &descriptor[idx + 1..]))
}

fn parse_error(tool: &str, details: impl Into<String>) -> anyhow::Error {
    SbomError::ToolOutputParse {
        tool: tool.to_string(),
        details: details.into(),
    }
    .into()
}

fn parse_lines<T: for<'de> Deserialize<'de>>(output: &str, tool: &str) -> Result<Vec<T>> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).map_err(|e| parse_error(tool, e.to_string())))
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
struct ClassicEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
struct ClassicTreeData {
    #[serde(default)]
    trees: Vec<ClassicNode>,
}

/// A package of the classic tree, named `name@version`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassicNode {
    pub name: String,
    #[serde(default)]
    pub children: Vec<ClassicNode>,
    #[serde(default)]
    pub shadow: bool,
}

/// `yarn list --json` output of yarn 1.x
#[derive(Debug, Clone, Default)]
pub struct YarnClassicListing {
    pub trees: Vec<ClassicNode>,
}

impl YarnClassicListing {
    /// # Errors
    /// `ToolOutputParse` when a line is not JSON or no `tree` event exists
    pub fn parse(output: &str) -> Result<Self> {
        let events: Vec<ClassicEvent> = parse_lines(output, "yarn list")?;
        let tree = events
            .into_iter()
            .find(|event| event.kind == "tree")
            .ok_or_else(|| parse_error("yarn list", "no tree event in output"))?;
        let data: ClassicTreeData =
            serde_json::from_value(tree.data).map_err(|e| parse_error("yarn list", e.to_string()))?;
        Ok(Self { trees: data.trees })
    }

    /// Every node that carries its own children, keyed by `name@version`
    fn index(&self) -> HashMap<&str, &ClassicNode> {
        fn visit<'a>(nodes: &'a [ClassicNode], index: &mut HashMap<&'a str, &'a ClassicNode>) {
            for node in nodes.iter().filter(|n| !n.shadow) {
                index.entry(node.name.as_str()).or_insert(node);
                visit(&node.children, index);
            }
        }
        let mut index = HashMap::new();
        visit(&self.trees, &mut index);
        index
    }
}

/// Builds the graph of a yarn classic project.
///
/// The manifest's runtime dependencies are the root's children, resolved
/// against the hoisted trees. Ignored names are removed at any version.
pub fn build_yarn_classic_graph(
    listing: &YarnClassicListing,
    manifest: &PackageManifest,
    transitive: bool,
) -> Result<DependencyGraph> {
    let mut graph = root_graph(manifest, "yarn list")?;
    let root = graph.root().ok_or_else(|| parse_error("yarn list", "graph has no root"))?;
    let index = listing.index();

    let mut visited = HashSet::new();
    for name in manifest.dependency_names() {
        let Some(node) = listing
            .trees
            .iter()
            .find(|n| split_descriptor(&n.name).is_some_and(|(n, _)| n == name))
        else {
            tracing::debug!(package = name, "declared dependency missing from yarn listing");
            continue;
        };
        add_classic_node(&mut graph, root, node, &index, &mut visited, transitive)?;
    }

    let removed = graph.filter_ignored_deps(&manifest.exhortignore);
    tracing::debug!(removed, "removed ignored yarn packages");
    Ok(graph)
}

fn add_classic_node<'a>(
    graph: &mut DependencyGraph,
    parent: ComponentId,
    node: &'a ClassicNode,
    index: &HashMap<&'a str, &'a ClassicNode>,
    visited: &mut HashSet<&'a str>,
    transitive: bool,
) -> Result<()> {
    let (name, version) =
        split_descriptor(&node.name).ok_or_else(|| parse_error("yarn list", format!("bad package {}", node.name)))?;
    let id = graph.add_dependency(parent, npm_purl(name, Some(version))?)?;
    if !transitive || !visited.insert(node.name.as_str()) {
        return Ok(());
    }

    let resolved = if node.shadow {
        index.get(node.name.as_str()).copied()
    } else {
        Some(node)
    };
    for child in resolved.map(|n| n.children.as_slice()).unwrap_or_default() {
        add_classic_node(graph, id, child, index, visited, transitive)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize)]
struct BerryDependency {
    locator: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BerryDetails {
    version: Option<String>,
    #[serde(default)]
    dependencies: Vec<BerryDependency>,
}

/// One `yarn info --json` object: a package locator and its details
#[derive(Debug, Clone, Deserialize)]
pub struct BerryPackage {
    pub value: String,
    #[serde(default)]
    children: BerryDetails,
}

impl BerryPackage {
    fn is_workspace(&self) -> bool {
        self.value.contains(WORKSPACE_PROTOCOL)
    }

    fn dependency_locators(&self) -> impl Iterator<Item = &str> {
        self.children.dependencies.iter().map(|d| d.locator.as_str())
    }
}

/// `yarn info --json` output of yarn 2 and later
#[derive(Debug, Clone, Default)]
pub struct YarnBerryListing {
    pub packages: Vec<BerryPackage>,
}

impl YarnBerryListing {
    pub fn parse(output: &str) -> Result<Self> {
        Ok(Self {
            packages: parse_lines(output, "yarn info")?,
        })
    }

    fn workspace(&self) -> Option<&BerryPackage> {
        self.packages.iter().find(|p| p.is_workspace())
    }
}

/// Version of a berry locator: `npm:1.2.3`, or the npm reference a
/// `patch:` locator wraps
fn locator_version(reference: &str) -> &str {
    if let Some(version) = reference.strip_prefix("npm:") {
        return version;
    }
    match reference.find("npm%3A") {
        Some(idx) => {
            let rest = &reference[idx + "npm%3A".len()..];
            rest.split('#').next().unwrap_or(rest)
        }
        None => reference,
    }
}

/// Builds the graph of a yarn berry project.
///
/// The root's children are the manifest's runtime dependencies, each
/// resolved through the workspace entry when the listing has one and by
/// package name otherwise.
pub fn build_yarn_berry_graph(
    listing: &YarnBerryListing,
    manifest: &PackageManifest,
    transitive: bool,
) -> Result<DependencyGraph> {
    let mut graph = root_graph(manifest, "yarn info")?;
    let root = graph.root().ok_or_else(|| parse_error("yarn info", "graph has no root"))?;
    let index: HashMap<&str, &BerryPackage> = listing
        .packages
        .iter()
        .map(|p| (p.value.as_str(), p))
        .collect();

    let workspace_deps: Vec<&str> = listing
        .workspace()
        .map(|w| w.dependency_locators().collect())
        .unwrap_or_default();
    let direct: Vec<&str> = manifest
        .dependency_names()
        .filter_map(|name| {
            let named = |locator: &&str| split_descriptor(locator).is_some_and(|(n, _)| n == name);
            workspace_deps.iter().copied().find(|l| named(l)).or_else(|| {
                listing
                    .packages
                    .iter()
                    .map(|p| p.value.as_str())
                    .find(|l| !l.contains(WORKSPACE_PROTOCOL) && named(l))
            })
        })
        .collect();

    let mut visited = HashSet::new();
    for locator in direct {
        add_berry_locator(&mut graph, root, locator, &index, &mut visited, transitive)?;
    }

    let removed = graph.filter_ignored_deps(&manifest.exhortignore);
    tracing::debug!(removed, "removed ignored yarn packages");
    Ok(graph)
}

fn add_berry_locator<'a>(
    graph: &mut DependencyGraph,
    parent: ComponentId,
    locator: &'a str,
    index: &HashMap<&'a str, &'a BerryPackage>,
    visited: &mut HashSet<&'a str>,
    transitive: bool,
) -> Result<()> {
    let (name, reference) =
        split_descriptor(locator).ok_or_else(|| parse_error("yarn info", format!("bad locator {}", locator)))?;
    let package = index.get(locator).copied();
    let version = package
        .and_then(|p| p.children.version.as_deref())
        .unwrap_or_else(|| locator_version(reference));

    let id = graph.add_dependency(parent, npm_purl(name, Some(version))?)?;
    if !transitive || !visited.insert(locator) {
        return Ok(());
    }
    if let Some(package) = package {
        for child in package.dependency_locators() {
            add_berry_locator(graph, id, child, index, visited, transitive)?;
        }
    }
    Ok(())
}

fn root_graph(manifest: &PackageManifest, tool: &str) -> Result<DependencyGraph> {
    let name = manifest
        .name
        .as_deref()
        .ok_or_else(|| parse_error(tool, "package.json has no name"))?;
    let mut graph = DependencyGraph::new();
    graph.add_root(npm_purl(name, manifest.version.as_deref())?)?;
    Ok(graph)
}
