use crate::sbom_generation::domain::{DependencyGraph, SbomMetadata};
use crate::shared::Result;

/// SbomFormatter port for serializing a dependency graph
///
/// Implementations must emit components and relationships in the order
/// the graph yields them, so identical inputs give identical documents.
pub trait SbomFormatter {
    /// Formats the graph as an SBOM document
    ///
    /// # Arguments
    /// * `graph` - The dependency graph; its root becomes the described component
    /// * `metadata` - Timestamp, serial number and tool information
    ///
    /// # Returns
    /// The serialized document
    ///
    /// # Errors
    /// Returns an error if the graph has no root or serialization fails
    fn format(&self, graph: &DependencyGraph, metadata: &SbomMetadata) -> Result<String>;
}
