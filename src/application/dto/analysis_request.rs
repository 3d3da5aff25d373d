use super::{AnalysisKind, ManifestInput};
use crate::config::AnalysisOptions;

/// AnalysisRequest - request DTO for the manifest analysis use case
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub manifest: ManifestInput,
    pub kind: AnalysisKind,
    /// Explicit options; they win over environment variables
    pub options: AnalysisOptions,
}

impl AnalysisRequest {
    pub fn new(manifest: ManifestInput, kind: AnalysisKind, options: AnalysisOptions) -> Self {
        Self {
            manifest,
            kind,
            options,
        }
    }

    pub fn stack(manifest: ManifestInput, options: AnalysisOptions) -> Self {
        Self::new(manifest, AnalysisKind::Stack, options)
    }

    pub fn component(manifest: ManifestInput, options: AnalysisOptions) -> Self {
        Self::new(manifest, AnalysisKind::Component, options)
    }
}
