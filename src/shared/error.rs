use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between argument problems
/// and failures while building the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the SBOM was produced
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (tool failure, manifest error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Failure class of an [`SbomError`].
///
/// Every class is fatal to the analysis call that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Tool absent, no or ambiguous provider match, bad option value
    Configuration,
    /// Tool could not be spawned or exited non-zero
    ToolInvocation,
    /// Graph or manifest/installed version inconsistencies
    DataIntegrity,
    /// Malformed manifest, purl or tool output
    Parse,
    /// Reading or writing files
    Io,
}

/// Application-specific errors for dependency graph construction.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// keeping the user-facing messages next to the variants.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("{tool} binary is not accessible at \"{path}\"\n\n💡 Hint: Install {tool} or point {env_key} at the executable")]
    ToolNotFound {
        tool: String,
        path: String,
        env_key: String,
    },

    #[error("No provider supports the manifest \"{manifest}\"\n\n💡 Hint: Supported manifests are go.mod, build.gradle, build.gradle.kts, and package.json next to its package-lock.json, pnpm-lock.yaml or yarn.lock")]
    NoProviderMatch { manifest: String },

    #[error("Manifest \"{manifest}\" is claimed by more than one provider: {}", candidates.join(", "))]
    AmbiguousProvider {
        manifest: String,
        candidates: Vec<String>,
    },

    #[error("Invalid value \"{value}\" for option {key}: expected {expected}")]
    InvalidOption {
        key: String,
        value: String,
        expected: String,
    },

    #[error("Command `{command}` failed\nDetails: {details}")]
    ToolInvocation { command: String, details: String },

    #[error("Failed to run `{command}`")]
    ToolSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("versions mismatch for dependency name {name}, manifest version={manifest_version}, installed Version={installed_version}\n\n💡 Hint: To allow a version mismatch between installed and requested packages, set the option or environment variable MATCH_MANIFEST_VERSIONS=false")]
    VersionMismatch {
        name: String,
        manifest_version: String,
        installed_version: String,
    },

    #[error("Invalid dependency graph: {reason}")]
    InvalidGraph { reason: String },

    #[error("Failed to parse manifest: {path} (line {line})\nDetails: {details}")]
    ManifestParse {
        path: PathBuf,
        line: usize,
        details: String,
    },

    #[error("Failed to parse {tool} output\nDetails: {details}")]
    ToolOutputParse { tool: String, details: String },

    #[error("Invalid package URL \"{input}\": {details}")]
    InvalidPurl { input: String, details: String },

    #[error("Invalid manifest path: {path}\nReason: {reason}\n\n💡 Hint: Please specify the path of a manifest file such as go.mod or package.json")]
    InvalidManifestPath { path: PathBuf, reason: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

impl SbomError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SbomError::ToolNotFound { .. }
            | SbomError::NoProviderMatch { .. }
            | SbomError::AmbiguousProvider { .. }
            | SbomError::InvalidOption { .. } => ErrorCategory::Configuration,
            SbomError::ToolInvocation { .. } | SbomError::ToolSpawn { .. } => {
                ErrorCategory::ToolInvocation
            }
            SbomError::VersionMismatch { .. } | SbomError::InvalidGraph { .. } => {
                ErrorCategory::DataIntegrity
            }
            SbomError::ManifestParse { .. }
            | SbomError::ToolOutputParse { .. }
            | SbomError::InvalidPurl { .. } => ErrorCategory::Parse,
            SbomError::InvalidManifestPath { .. }
            | SbomError::FileReadError { .. }
            | SbomError::FileWriteError { .. }
            | SbomError::SecurityError { .. } => ErrorCategory::Io,
        }
    }
}
