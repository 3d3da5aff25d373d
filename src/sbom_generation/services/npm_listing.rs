use crate::sbom_generation::domain::{ComponentId, DependencyGraph, Ecosystem, PackageUrl};
use crate::shared::error::SbomError;
use crate::shared::Result;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::path::Path;

/// `npm ls --json` document. `pnpm ls --json` emits a one-element array
/// of the same shape.
///
/// Dependencies keep the order the tool printed them in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NpmListing {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(default, deserialize_with = "ordered_entries")]
    pub dependencies: Vec<(String, NpmListingEntry)>,
}

/// A nested dependency of the listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NpmListingEntry {
    pub version: Option<String>,
    #[serde(default, deserialize_with = "ordered_entries")]
    pub dependencies: Vec<(String, NpmListingEntry)>,
}

/// Reads a JSON object into `(key, value)` pairs in document order
fn ordered_entries<'de, D, T>(deserializer: D) -> std::result::Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    // serde_json's preserve_order keeps this map in insertion order
    let object = Map::<String, Value>::deserialize(deserializer)?;
    object
        .into_iter()
        .map(|(key, value)| {
            serde_json::from_value(value)
                .map(|entry| (key, entry))
                .map_err(D::Error::custom)
        })
        .collect()
}

impl NpmListing {
    /// Parses the output of `npm ls --json`
    ///
    /// # Errors
    /// `ToolOutputParse` when the output is not a listing document
    pub fn parse(output: &str) -> Result<Self> {
        serde_json::from_str(output).map_err(|e| listing_error("npm ls", e.to_string()))
    }

    /// Parses the output of `pnpm ls --json`, keeping its single project
    pub fn parse_pnpm(output: &str) -> Result<Self> {
        let mut projects: Vec<NpmListing> =
            serde_json::from_str(output).map_err(|e| listing_error("pnpm ls", e.to_string()))?;
        if projects.is_empty() {
            return Err(listing_error("pnpm ls", "listing contains no project".to_string()));
        }
        Ok(projects.swap_remove(0))
    }
}

fn listing_error(tool: &str, details: String) -> anyhow::Error {
    SbomError::ToolOutputParse {
        tool: tool.to_string(),
        details,
    }
    .into()
}

/// The fields of package.json this crate reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Runtime dependencies as `(name, version range)`, in declaration order
    #[serde(default, deserialize_with = "ordered_entries")]
    pub dependencies: Vec<(String, String)>,
    #[serde(default)]
    pub exhortignore: Vec<String>,
}

impl PackageManifest {
    /// Parses package.json
    ///
    /// # Arguments
    /// * `content` - package.json text
    /// * `path` - Where the text came from, reported in parse errors
    ///
    /// # Errors
    /// `ManifestParse` carrying the line of the JSON syntax error
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            SbomError::ManifestParse {
                path: path.to_path_buf(),
                line: e.line(),
                details: e.to_string(),
            }
            .into()
        })
    }

    /// Names of the runtime dependencies
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|(name, _)| name.as_str())
    }
}

/// npm purl; a `@scope/name` package puts the scope in the namespace
pub fn npm_purl(name: &str, version: Option<&str>) -> Result<PackageUrl> {
    let (namespace, name) = match name.split_once('/') {
        Some((scope, name)) => (Some(scope.to_string()), name),
        None => (None, name),
    };
    Ok(PackageUrl::new(
        Ecosystem::Npm,
        namespace,
        name,
        version.map(str::to_string),
    )?)
}

/// Builds the graph mirroring the nested listing, then drops every
/// component whose name is ignored
///
/// # Arguments
/// * `listing` - Parsed `npm ls` or `pnpm ls` output
/// * `ignored` - Package names from the `exhortignore` array
///
/// # Returns
/// The graph rooted at the listing's own package, children in listing order
pub fn build_npm_graph<S: AsRef<str>>(listing: &NpmListing, ignored: &[S]) -> Result<DependencyGraph> {
    let root_name = listing
        .name
        .as_deref()
        .ok_or_else(|| listing_error("npm ls", "listing has no package name".to_string()))?;

    let mut graph = DependencyGraph::new();
    let root = graph.add_root(npm_purl(root_name, listing.version.as_deref())?)?;
    add_all_dependencies(&mut graph, root, &listing.dependencies)?;

    let removed = graph.filter_ignored_deps(ignored);
    tracing::debug!(removed, "removed ignored npm packages");
    Ok(graph)
}

fn add_all_dependencies(
    graph: &mut DependencyGraph,
    parent: ComponentId,
    dependencies: &[(String, NpmListingEntry)],
) -> Result<()> {
    for (name, entry) in dependencies {
        let purl = npm_purl(name, entry.version.as_deref())?;
        let child = graph.add_dependency(parent, purl)?;
        if !entry.dependencies.is_empty() {
            add_all_dependencies(graph, child, &entry.dependencies)?;
        }
    }
    Ok(())
}
