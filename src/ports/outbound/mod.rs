/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (native tools, file system, console).
pub mod command_runner;
pub mod formatter;
pub mod output_presenter;
pub mod progress_reporter;

pub use command_runner::CommandRunner;
pub use formatter::SbomFormatter;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
