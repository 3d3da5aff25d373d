pub mod dependency_graph;
pub mod provided;
pub mod purl;
pub mod sbom_metadata;

pub use dependency_graph::{Component, ComponentId, DependencyGraph};
pub use provided::{Provided, CYCLONEDX_JSON_CONTENT_TYPE};
pub use purl::{Ecosystem, PackageUrl, VersionDelimiter};
pub use sbom_metadata::SbomMetadata;
