//! Launching the NDC binary

use crate::error::{NdcError, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Captured result of one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    /// Did the process exit successfully?
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Raw standard output
    pub stdout: Vec<u8>,
    /// Raw standard error
    pub stderr: Vec<u8>,
}

impl RawOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// Failed output (exit code 1) with the given stdout
    pub fn failed(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            success: false,
            code: Some(1),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }
}

impl From<Output> for RawOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// Something that can run the NDC binary with an argument vector
pub trait Executor {
    /// Run `bin` with `args` to completion and capture its output
    fn execute(&self, bin: &Path, args: &[OsString]) -> Result<RawOutput>;
}

/// Runs the binary as a child process and blocks until it exits
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&self, bin: &Path, args: &[OsString]) -> Result<RawOutput> {
        let output = Command::new(bin)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| NdcError::Spawn {
                bin: bin.to_path_buf(),
                source,
            })?;
        Ok(output.into())
    }
}

/// Render an invocation for log messages
pub fn render(bin: &Path, args: &[OsString]) -> String {
    let mut rendered = bin.display().to_string();
    for arg in args {
        rendered.push(' ');
        let arg = arg.to_string_lossy();
        if arg.is_empty() || arg.contains(' ') {
            rendered.push_str(&format!("{:?}", arg));
        } else {
            rendered.push_str(&arg);
        }
    }
    rendered
}

/// Executor backed by a closure, for tests
#[cfg(test)]
pub(crate) struct FnExecutor<F>(pub F);

#[cfg(test)]
impl<F> std::fmt::Debug for FnExecutor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnExecutor")
    }
}

#[cfg(test)]
impl<F> Executor for FnExecutor<F>
where
    F: Fn(&[String]) -> RawOutput,
{
    fn execute(&self, _bin: &Path, args: &[OsString]) -> Result<RawOutput> {
        let args: Vec<String> = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        Ok((self.0)(&args))
    }
}
