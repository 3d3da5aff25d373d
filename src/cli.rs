use clap::{Parser, Subcommand};
use exhort_sbom::application::dto::{AnalysisKind, ManifestInput};
use exhort_sbom::config::{
    AnalysisOptions, GO_MVS_LOGIC_ENABLED, GO_PATH, GRADLE_PATH, MATCH_MANIFEST_VERSIONS, NPM_PATH,
    PNPM_PATH, YARN_PATH,
};
use exhort_sbom::logging::LogFormat;
use exhort_sbom::shared::Result;
use std::path::PathBuf;

/// Build CycloneDX SBOMs for Go, JavaScript (npm, pnpm, yarn) and Gradle projects
#[derive(Parser, Debug)]
#[command(name = "exhort-sbom")]
#[command(version)]
#[command(
    about = "Build CycloneDX SBOMs for Go, JavaScript (npm, pnpm, yarn) and Gradle projects from their package managers",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// YAML file with analysis options; explicit flags take precedence
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fail when an installed Go module version differs from go.mod
    #[arg(long, global = true)]
    pub match_manifest_versions: bool,

    /// Rewrite Go module versions to the ones minimal version selection picked
    #[arg(long, global = true)]
    pub go_mvs: bool,

    /// go executable
    #[arg(long, global = true, value_name = "PATH")]
    pub go_path: Option<String>,

    /// npm executable
    #[arg(long, global = true, value_name = "PATH")]
    pub npm_path: Option<String>,

    /// pnpm executable
    #[arg(long, global = true, value_name = "PATH")]
    pub pnpm_path: Option<String>,

    /// yarn executable, classic or berry
    #[arg(long, global = true, value_name = "PATH")]
    pub yarn_path: Option<String>,

    /// gradle executable
    #[arg(long, global = true, value_name = "PATH")]
    pub gradle_path: Option<String>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Increase diagnostic verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Diagnostic format on stderr: compact or json
    #[arg(long, global = true, default_value = "compact")]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Full transitive dependency graph of the manifest
    Stack {
        /// go.mod, package.json, build.gradle or build.gradle.kts
        manifest: PathBuf,
    },
    /// Direct dependencies of the manifest only
    Component {
        /// go.mod, package.json, build.gradle or build.gradle.kts
        manifest: PathBuf,
    },
}

impl Command {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            Command::Stack { .. } => AnalysisKind::Stack,
            Command::Component { .. } => AnalysisKind::Component,
        }
    }

    pub fn manifest(&self) -> ManifestInput {
        match self {
            Command::Stack { manifest } | Command::Component { manifest } => {
                ManifestInput::Path(manifest.clone())
            }
        }
    }
}

impl Args {
    /// Config file values overlaid with the explicit flags
    pub fn analysis_options(&self) -> Result<AnalysisOptions> {
        let mut options = match &self.config {
            Some(path) => AnalysisOptions::load_from_path(path)?,
            None => AnalysisOptions::new(),
        };

        if self.match_manifest_versions {
            options.set(MATCH_MANIFEST_VERSIONS, "true");
        }
        if self.go_mvs {
            options.set(GO_MVS_LOGIC_ENABLED, "true");
        }
        for (key, value) in [
            (GO_PATH, &self.go_path),
            (NPM_PATH, &self.npm_path),
            (PNPM_PATH, &self.pnpm_path),
            (YARN_PATH, &self.yarn_path),
            (GRADLE_PATH, &self.gradle_path),
        ] {
            if let Some(value) = value {
                options.set(key, value.as_str());
            }
        }
        Ok(options)
    }
}
