//! exhort-sbom - dependency graph construction for Go, JavaScript (npm, pnpm, yarn) and Gradle projects
//!
//! This library turns a project manifest (`go.mod`, `package.json`,
//! `build.gradle`, `build.gradle.kts`) into a CycloneDX 1.4 JSON SBOM by
//! running the ecosystem's own package manager and parsing its output,
//! following hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_generation`): purls, the dependency graph and
//!   the per-ecosystem parsers that feed it
//! - **Application Layer** (`application`): providers, the analysis use case and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use exhort_sbom::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! let use_case = AnalyzeManifestUseCase::new(
//!     ProcessCommandRunner::new(),
//!     StderrProgressReporter::new(),
//! );
//!
//! let request = AnalysisRequest::stack(
//!     ManifestInput::Path(PathBuf::from("go.mod")),
//!     AnalysisOptions::new(),
//! );
//! let response = use_case.analyze(request)?;
//! println!("{}", response.provided.content);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod logging;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
    pub use crate::adapters::outbound::formatters::CycloneDxFormatter;
    pub use crate::adapters::outbound::process::ProcessCommandRunner;
    pub use crate::application::dto::{
        AnalysisKind, AnalysisRequest, AnalysisResponse, ManifestInput,
    };
    pub use crate::application::providers::{
        EcosystemProvider, GoModulesProvider, GradleProvider, NpmProvider, PnpmProvider, Provider,
        ProviderRegistry, YarnProvider,
    };
    pub use crate::application::use_cases::AnalyzeManifestUseCase;
    pub use crate::config::{AnalysisConfig, AnalysisOptions};
    pub use crate::ports::inbound::ManifestAnalysisPort;
    pub use crate::ports::outbound::{
        CommandRunner, OutputPresenter, ProgressReporter, SbomFormatter,
    };
    pub use crate::sbom_generation::domain::{
        DependencyGraph, Ecosystem, PackageUrl, Provided, SbomMetadata,
    };
    pub use crate::sbom_generation::services::SbomGenerator;
    pub use crate::shared::error::SbomError;
    pub use crate::shared::Result;
}
