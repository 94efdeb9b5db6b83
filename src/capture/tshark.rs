//! Invocation of the external capture-analysis tool.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture tool `{tool}` not found")]
    ToolNotFound { tool: String },

    #[error("capture tool `{tool}` exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("could not run capture tool `{tool}`: {source}")]
    Io {
        tool: String,
        #[source]
        source: io::Error,
    },
}

/// Anything that can turn a capture file into a filtered hex dump.
pub trait CaptureSource {
    fn hex_dump(&self, capture_file: &Path, display_filter: &str) -> Result<String, CaptureError>;
}

/// `tshark -x -r <file> -Y <filter>`
#[derive(Debug, Clone)]
pub struct Tshark {
    program: PathBuf,
}

impl Tshark {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Tshark {
            program: program.into(),
        }
    }

    fn command(&self, capture_file: &Path, display_filter: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-x")
            .arg("-r")
            .arg(capture_file)
            .arg("-Y")
            .arg(display_filter);
        cmd
    }
}

impl CaptureSource for Tshark {
    fn hex_dump(&self, capture_file: &Path, display_filter: &str) -> Result<String, CaptureError> {
        let tool = self.program.display().to_string();
        info!("Running {} on {}", tool, capture_file.display());
        debug!("Display filter: {}", display_filter);

        let output = self
            .command(capture_file, display_filter)
            .output()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => CaptureError::ToolNotFound { tool: tool.clone() },
                _ => CaptureError::Io {
                    tool: tool.clone(),
                    source,
                },
            })?;

        if !output.status.success() {
            return Err(CaptureError::ToolFailed {
                tool,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("Capture tool produced {} bytes of output", stdout.len());
        Ok(stdout)
    }
}
