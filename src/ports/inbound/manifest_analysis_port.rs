use crate::application::dto::{AnalysisRequest, AnalysisResponse};
use crate::shared::Result;

/// ManifestAnalysisPort - Inbound port for stack and component analysis
///
/// This is the application's public API: given a manifest, produce the
/// SBOM the remote analysis service consumes.
pub trait ManifestAnalysisPort {
    /// Analyzes the manifest named in `request`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The manifest path is invalid or unreadable
    /// - No provider, or more than one, supports the manifest
    /// - An option value is invalid
    /// - The ecosystem tool is missing or fails
    /// - The manifest or tool output cannot be parsed
    fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse>;
}
