use crate::shared::Result;

/// OutputPresenter port for presenting final output
///
/// This port abstracts the output destination (stdout, file, etc.)
/// where the serialized SBOM is presented.
pub trait OutputPresenter {
    /// Presents the SBOM content to the output destination
    ///
    /// # Arguments
    /// * `content` - The serialized CycloneDX document
    ///
    /// # Returns
    /// Success or error if presentation fails
    ///
    /// # Errors
    /// Returns an error if:
    /// - Writing to the output destination fails
    /// - File permissions prevent writing
    fn present(&self, content: &str) -> Result<()>;
}
