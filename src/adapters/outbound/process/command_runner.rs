use crate::ports::outbound::CommandRunner;
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::io;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// ProcessCommandRunner adapter for running tools with `std::process`
///
/// The executable is resolved with `which` before spawning, so a missing
/// tool surfaces as `ToolSpawn` with `io::ErrorKind::NotFound` whatever the
/// platform's spawn error would have been.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessCommandRunner;

impl ProcessCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

fn render(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<String> {
        let command_line = render(program, args);
        let executable = which::which(program).map_err(|e| SbomError::ToolSpawn {
            command: command_line.clone(),
            source: io::Error::new(io::ErrorKind::NotFound, e.to_string()),
        })?;

        debug!(command = command_line.as_str(), cwd = ?cwd, "running tool");
        let mut command = Command::new(&executable);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| SbomError::ToolSpawn {
            command: command_line.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let details = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(SbomError::ToolInvocation {
                command: command_line,
                details,
            }
            .into());
        }

        String::from_utf8(output.stdout).map_err(|e| {
            SbomError::ToolOutputParse {
                tool: command_line,
                details: format!("output is not valid UTF-8: {}", e),
            }
            .into()
        })
    }
}
