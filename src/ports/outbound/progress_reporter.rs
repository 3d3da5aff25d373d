/// ProgressReporter port for user-facing progress lines
///
/// Progress never goes to stdout, which carries only the SBOM.
pub trait ProgressReporter {
    /// Reports a progress message
    ///
    /// # Arguments
    /// * `message` - A single line, without trailing newline
    fn report(&self, message: &str);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
