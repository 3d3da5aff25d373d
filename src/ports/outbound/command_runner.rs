use crate::shared::Result;
use std::path::Path;

/// CommandRunner port for invoking ecosystem tools (go, npm, gradle)
///
/// One call is one blocking subprocess. There is no timeout and no retry;
/// any failure is fatal to the analysis that issued it.
pub trait CommandRunner {
    /// Runs `program` with `args`, optionally inside `cwd`
    ///
    /// # Arguments
    /// * `program` - Executable name or path, as resolved from the options
    /// * `args` - Arguments passed verbatim
    /// * `cwd` - Working directory; `None` keeps the current one
    ///
    /// # Returns
    /// The process's standard output
    ///
    /// # Errors
    /// Returns an error if:
    /// - The executable cannot be found or spawned (`SbomError::ToolSpawn`)
    /// - The process exits non-zero (`SbomError::ToolInvocation`)
    /// - Standard output is not valid UTF-8
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<String>;
}
