mod cli;

use clap::Parser;
use cli::Args;
use exhort_sbom::adapters::outbound::console::StderrProgressReporter;
use exhort_sbom::adapters::outbound::process::ProcessCommandRunner;
use exhort_sbom::application::dto::AnalysisRequest;
use exhort_sbom::application::factories::{PresenterFactory, PresenterType};
use exhort_sbom::application::use_cases::AnalyzeManifestUseCase;
use exhort_sbom::logging;
use exhort_sbom::ports::inbound::ManifestAnalysisPort;
use exhort_sbom::shared::error::{ExitCode, SbomError};
use exhort_sbom::shared::Result;
use std::process;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                // --help and --version
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    if let Err(e) = logging::init_tracing(args.verbose, args.log_format) {
        eprintln!("⚠️  {}", e);
    }

    if let Err(e) = run(args) {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("\nCaused by: {}", err);
            source = err.source();
        }

        if let Some(category) = e.downcast_ref::<SbomError>().map(SbomError::category) {
            tracing::debug!(?category, "analysis failed");
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

fn run(args: Args) -> Result<()> {
    let options = args.analysis_options()?;
    let request = AnalysisRequest::new(args.command.manifest(), args.command.kind(), options);

    let use_case = AnalyzeManifestUseCase::new(ProcessCommandRunner::new(), StderrProgressReporter::new());
    let response = use_case.analyze(request)?;

    let presenter = PresenterFactory::create(PresenterType::from(args.output));
    presenter.present(&response.provided.content)?;

    Ok(())
}
