//! ffprobe-backed [`Probe`] implementation
//!
//! Runs `ffprobe -v error -print_format json -show_format -show_streams`
//! synchronously for each locator. There is no timeout: a hanging ffprobe
//! blocks the run.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use probeline_core::{Metadata, Probe, ProbeError};
use serde::Deserialize;

use crate::report::ProbeReport;

const BASE_ARGS: &[&str] = &[
    "-v",
    "error",
    "-print_format",
    "json",
    "-show_format",
    "-show_streams",
];

#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    program: PathBuf,
    extra_args: Vec<String>,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl FfprobeProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Extra arguments placed before the input (e.g. `-rw_timeout 10000000`).
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// First line of `ffprobe -version`, or why it could not be run.
    pub fn version(&self) -> Result<String, ProbeError> {
        let output = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .map_err(ProbeError::Launch)?;
        if !output.status.success() {
            return Err(exit_error(&output));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    fn command(&self, locator: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(BASE_ARGS)
            .args(&self.extra_args)
            .arg(input_arg(locator))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Probe `locator`, returning the raw JSON together with its typed view.
    pub fn probe_report(&self, locator: &str) -> Result<(Metadata, ProbeReport), ProbeError> {
        log::debug!("ffprobe {locator}");
        let output = self.command(locator).output().map_err(ProbeError::Launch)?;
        if !output.status.success() {
            return Err(exit_error(&output));
        }
        decode_output(&output.stdout)
    }
}

impl Probe for FfprobeProbe {
    fn probe(&self, locator: &str) -> Result<Metadata, ProbeError> {
        let (metadata, report) = self.probe_report(locator)?;
        log::debug!("{locator}: {}", report.summary());
        Ok(metadata)
    }
}

/// A leading `-` would be read as an option; route it through the file protocol.
fn input_arg(locator: &str) -> String {
    if locator.starts_with('-') {
        format!("file:{locator}")
    } else {
        locator.to_string()
    }
}

fn exit_error(output: &std::process::Output) -> ProbeError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    ProbeError::Exit {
        status: output.status.to_string(),
        stderr,
    }
}

/// Parse ffprobe stdout; output without a `format` section is rejected.
pub(crate) fn decode_output(stdout: &[u8]) -> Result<(Metadata, ProbeReport), ProbeError> {
    let metadata: Metadata = serde_json::from_slice(stdout)?;
    let report = ProbeReport::deserialize(&metadata)?;
    Ok((metadata, report))
}
