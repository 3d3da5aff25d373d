use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::{DependencyGraph, PackageUrl, SbomMetadata};
use crate::shared::error::SbomError;
use crate::shared::Result;
use serde::Serialize;

const SPEC_VERSION: &str = "1.4";

#[derive(Debug, Serialize)]
struct Bom {
    #[serde(rename = "bomFormat")]
    bom_format: &'static str,
    #[serde(rename = "specVersion")]
    spec_version: &'static str,
    version: u32,
    #[serde(rename = "serialNumber")]
    serial_number: String,
    metadata: Metadata,
    components: Vec<Component>,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Serialize)]
struct Metadata {
    timestamp: String,
    tools: Vec<Tool>,
    component: Component,
}

#[derive(Debug, Serialize)]
struct Tool {
    vendor: String,
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct Component {
    #[serde(rename = "type")]
    component_type: &'static str,
    #[serde(rename = "bom-ref")]
    bom_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    purl: String,
}

#[derive(Debug, Serialize)]
struct Dependency {
    #[serde(rename = "ref")]
    bom_ref: String,
    #[serde(rename = "dependsOn")]
    depends_on: Vec<String>,
}

/// CycloneDxFormatter adapter for generating CycloneDX 1.4 JSON
///
/// The root becomes `metadata.component`; every other component is listed
/// under `components` keyed by its canonical purl, and each component gets
/// one `dependencies` record, root first.
pub struct CycloneDxFormatter;

impl CycloneDxFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CycloneDxFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for CycloneDxFormatter {
    fn format(&self, graph: &DependencyGraph, metadata: &SbomMetadata) -> Result<String> {
        let root = graph.root_component().ok_or_else(|| SbomError::InvalidGraph {
            reason: "graph has no root component".to_string(),
        })?;

        let bom = Bom {
            bom_format: "CycloneDX",
            spec_version: SPEC_VERSION,
            version: 1,
            serial_number: metadata.serial_number().to_string(),
            metadata: Metadata {
                timestamp: metadata.timestamp().to_string(),
                tools: vec![Tool {
                    vendor: metadata.tool_vendor().to_string(),
                    name: metadata.tool_name().to_string(),
                    version: metadata.tool_version().to_string(),
                }],
                component: self.build_component(root.purl(), "application"),
            },
            components: graph
                .components()
                .filter(|(id, _)| Some(*id) != graph.root())
                .map(|(_, c)| self.build_component(c.purl(), "library"))
                .collect(),
            dependencies: self.build_dependencies(graph),
        };

        serde_json::to_string_pretty(&bom).map_err(Into::into)
    }
}

impl CycloneDxFormatter {
    fn build_component(&self, purl: &PackageUrl, component_type: &'static str) -> Component {
        Component {
            component_type,
            bom_ref: purl.to_string(),
            group: purl.namespace().map(str::to_string),
            name: purl.name().to_string(),
            version: purl.version().map(str::to_string),
            purl: purl.to_string(),
        }
    }

    fn build_dependencies(&self, graph: &DependencyGraph) -> Vec<Dependency> {
        graph
            .relationships()
            .into_iter()
            .map(|(purl, children)| Dependency {
                bom_ref: purl.to_string(),
                depends_on: children.iter().map(ToString::to_string).collect(),
            })
            .collect()
    }
}
