use crate::ports::outbound::ProgressReporter;
use owo_colors::OwoColorize;

/// StderrProgressReporter adapter for reporting progress to stderr
///
/// This adapter implements the ProgressReporter port, writing progress
/// lines to stderr so they never mix with the SBOM on stdout.
pub struct StderrProgressReporter;

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn report_error(&self, message: &str) {
        eprintln!("{}", message.yellow());
    }

    fn report_completion(&self, message: &str) {
        eprintln!("{}", message.green());
    }
}
