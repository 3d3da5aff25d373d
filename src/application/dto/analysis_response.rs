use crate::sbom_generation::domain::Provided;

/// AnalysisResponse - result of the manifest analysis use case
#[derive(Debug, Clone)]
pub struct AnalysisResponse {
    pub provided: Provided,
    /// Number of components in the graph, root included
    pub component_count: usize,
}

impl AnalysisResponse {
    pub fn new(provided: Provided, component_count: usize) -> Self {
        Self {
            provided,
            component_count,
        }
    }
}
