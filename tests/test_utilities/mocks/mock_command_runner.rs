use exhort_sbom::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type Response = std::result::Result<String, String>;

/// A command line the runner received, with its working directory
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub line: String,
    pub cwd: Option<PathBuf>,
}

/// Mock CommandRunner answering by command-line prefix
///
/// Unscripted commands fail the way a missing executable does, so an
/// empty mock behaves like a machine without the tool installed.
#[derive(Default, Clone)]
pub struct MockCommandRunner {
    responses: Arc<Mutex<Vec<(String, Response)>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(self, prefix: &str, output: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push((prefix.to_string(), Ok(output.to_string())));
        self
    }

    pub fn with_failure(self, prefix: &str, stderr: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push((prefix.to_string(), Err(stderr.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.line).collect()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<String> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(RecordedCall {
            line: line.clone(),
            cwd: cwd.map(Path::to_path_buf),
        });

        let responses = self.responses.lock().unwrap();
        match responses
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
        {
            Some((_, Ok(output))) => Ok(output.clone()),
            Some((_, Err(stderr))) => Err(SbomError::ToolInvocation {
                command: line,
                details: stderr.clone(),
            }
            .into()),
            None => Err(SbomError::ToolSpawn {
                command: line,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            }
            .into()),
        }
    }
}
