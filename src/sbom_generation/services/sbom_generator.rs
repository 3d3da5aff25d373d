use crate::sbom_generation::domain::SbomMetadata;
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

const TOOL_VENDOR: &str = "exhort";
const TOOL_NAME: &str = "exhort-sbom";

/// SbomGenerator service for generating SBOM document metadata
pub struct SbomGenerator;

impl SbomGenerator {
    /// Generates SBOM metadata with current timestamp and unique serial number
    ///
    /// # Arguments
    /// * `tool_name` - Name of the tool generating the SBOM
    /// * `tool_version` - Version of the tool
    ///
    /// # Returns
    /// SbomMetadata with an RFC 3339 timestamp and a `urn:uuid:` serial number
    pub fn generate_metadata(tool_name: &str, tool_version: &str) -> SbomMetadata {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let serial_number = format!("urn:uuid:{}", Uuid::new_v4());

        SbomMetadata::new(
            timestamp,
            TOOL_VENDOR.to_string(),
            tool_name.to_string(),
            tool_version.to_string(),
            serial_number,
        )
    }

    /// Generates SBOM metadata for this tool, using the compile-time version
    pub fn generate_default_metadata() -> SbomMetadata {
        Self::generate_metadata(TOOL_NAME, env!("CARGO_PKG_VERSION"))
    }
}
