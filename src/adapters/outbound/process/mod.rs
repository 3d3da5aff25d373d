/// Process adapter running ecosystem tools as child processes
mod command_runner;

pub use command_runner::ProcessCommandRunner;
