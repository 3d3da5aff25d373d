use super::Ecosystem;

/// Media type of every SBOM produced by the providers
pub const CYCLONEDX_JSON_CONTENT_TYPE: &str = "application/vnd.cyclonedx+json";

/// Result of a stack or component analysis: the serialized SBOM and the
/// ecosystem the remote analysis service should interpret it under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provided {
    pub ecosystem: Ecosystem,
    pub content: String,
    pub content_type: String,
}

impl Provided {
    pub fn cyclonedx(ecosystem: Ecosystem, content: String) -> Self {
        Self {
            ecosystem,
            content,
            content_type: CYCLONEDX_JSON_CONTENT_TYPE.to_string(),
        }
    }
}
