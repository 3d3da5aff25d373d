/// Data Transfer Objects for application layer
///
/// DTOs carry requests and results between the CLI (or another driving
/// adapter) and the analysis use case.
mod analysis_kind;
mod analysis_request;
mod analysis_response;
mod manifest_input;

pub use analysis_kind::AnalysisKind;
pub use analysis_request::AnalysisRequest;
pub use analysis_response::AnalysisResponse;
pub use manifest_input::{ManifestInput, MaterializedManifest};
