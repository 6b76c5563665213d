//! The NDC wrapper: command assembly, execution and output parsing

use crate::config::{NdcBuilder, NdcConfig};
use crate::entry::Entry;
use crate::error::{NdcError, Result, ToolErrorKind};
use crate::exec::{render, Executor, ProcessExecutor};
use crate::paths::expand_home;
use crate::profile::Profile;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Sub-command codes understood by the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// List a folder (no code)
    List,
    /// Find the first match (`F`)
    Find,
    /// Find every match (`FA`)
    FindAll,
    /// Copy a file out of the image (`G`)
    Get,
    /// Copy a file into the image (`P`)
    Put,
    /// Copy a native directory into the image (`PD`)
    PutDirectory,
    /// Delete from the image (`D`)
    Delete,
}

impl Command {
    /// The code passed as the first argument, if any
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Command::List => None,
            Command::Find => Some("F"),
            Command::FindAll => Some("FA"),
            Command::Get => Some("G"),
            Command::Put => Some("P"),
            Command::PutDirectory => Some("PD"),
            Command::Delete => Some("D"),
        }
    }
}

/// Wrapper around one NDC binary.
///
/// For every method:
///
/// * `image` is a path to a disk image on the native filesystem.
/// * `path` is a folder or file path inside the image.
/// * `src`, `dest` and `directory` are on the native filesystem.
#[derive(Debug, Clone)]
pub struct Ndc<E = ProcessExecutor> {
    bin: PathBuf,
    config: NdcConfig,
    version: String,
    executor: E,
}

impl Ndc {
    /// Check the binary at `bin` with the native profile
    pub fn new(bin: impl Into<PathBuf>) -> Result<Self> {
        NdcBuilder::new().bin(bin).build()
    }

    /// Create a new builder
    pub fn builder() -> NdcBuilder {
        NdcBuilder::new()
    }
}

impl<E: Executor> Ndc<E> {
    /// Run the configured binary through `executor` and check its version
    pub fn with_executor(config: NdcConfig, executor: E) -> Result<Self> {
        let bin = expand_home(&config.bin);

        let output = executor.execute(&bin, &[])?;
        let text = config.profile.encoding.decode(&output.stdout);
        let version = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| NdcError::EmptyOutput(bin.clone()))?
            .to_string();

        if !config.supports(&version) {
            return Err(NdcError::UnsupportedVersion(version));
        }
        tracing::info!("Using {} at {}", version, bin.display());

        Ok(Self {
            bin,
            config,
            version,
            executor,
        })
    }

    /// Version banner reported by the binary
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Resolved path to the binary
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// Configuration in use
    pub fn config(&self) -> &NdcConfig {
        &self.config
    }

    /// Platform conventions in use
    pub fn profile(&self) -> &Profile {
        &self.config.profile
    }

    /// Run the binary with `args`.
    ///
    /// Returns the output lines without the trailing status line, or the
    /// classified tool error.
    pub fn run(&self, args: &[OsString]) -> Result<Vec<String>> {
        let rendered = render(&self.bin, args);
        tracing::debug!("Running {}", rendered);

        let output = self.executor.execute(&self.bin, args)?;
        let encoding = self.config.profile.encoding;

        if !output.success {
            let mut text = encoding.decode(&output.stdout);
            text.push_str(&encoding.decode(&output.stderr));
            tracing::debug!("{} exited with {:?}", rendered, output.code);

            let text = text.trim();
            let err = if text.is_empty() {
                NdcError::Tool {
                    kind: ToolErrorKind::Unknown,
                    message: match output.code {
                        Some(code) => format!("exit code {}", code),
                        None => "terminated by signal".to_string(),
                    },
                }
            } else {
                NdcError::from_tool_output(text)
            };
            if let NdcError::Tool {
                kind: ToolErrorKind::Unknown,
                message,
            } = &err
            {
                tracing::warn!("Unrecognized error from {}: {}", rendered, message);
            }
            return Err(err);
        }

        let text = encoding.decode(&output.stdout);
        tracing::trace!("Output of {}: {:?}", rendered, text);

        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        // status message
        lines.pop();
        Ok(lines)
    }

    fn invoke(
        &self,
        command: Command,
        image: &Path,
        partition: u32,
        rest: &[OsString],
    ) -> Result<Vec<String>> {
        let mut args: Vec<OsString> = Vec::with_capacity(rest.len() + 3);
        if let Some(code) = command.code() {
            args.push(code.into());
        }
        args.push(expand_home(image).into_os_string());
        args.push(partition.to_string().into());
        args.extend(rest.iter().cloned());
        self.run(&args)
    }

    fn parse(&self, line: &str) -> Result<Entry> {
        Entry::parse(line, self.config.profile.timestamp_format)
    }

    /// List the folder `path`, without the `.` and `..` entries
    pub fn list(&self, image: impl AsRef<Path>, path: &str, partition: u32) -> Result<Vec<Entry>> {
        let lines = self.invoke(Command::List, image.as_ref(), partition, &[path.into()])?;

        let mut entries = Vec::with_capacity(lines.len());
        for line in &lines {
            let entry = self.parse(line)?;
            if !entry.is_dot() {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    /// First entry in `path` matching `pattern`, or `None`
    pub fn find(
        &self,
        image: impl AsRef<Path>,
        pattern: &str,
        path: &str,
        partition: u32,
    ) -> Result<Option<Entry>> {
        let lines = self.invoke(
            Command::Find,
            image.as_ref(),
            partition,
            &[path.into(), pattern.into()],
        )?;

        lines.first().map(|line| self.parse(line)).transpose()
    }

    /// Every entry in `path` matching `pattern`
    pub fn find_all(
        &self,
        image: impl AsRef<Path>,
        pattern: &str,
        path: &str,
        partition: u32,
    ) -> Result<Vec<Entry>> {
        let lines = self.invoke(
            Command::FindAll,
            image.as_ref(),
            partition,
            &[path.into(), pattern.into()],
        )?;

        lines.iter().map(|line| self.parse(line)).collect()
    }

    /// Copy the file at `path` out of the image into the native folder `dest`
    pub fn get(
        &self,
        image: impl AsRef<Path>,
        path: &str,
        dest: impl AsRef<Path>,
        partition: u32,
    ) -> Result<()> {
        self.invoke(
            Command::Get,
            image.as_ref(),
            partition,
            &[path.into(), expand_home(dest).into_os_string()],
        )?;
        Ok(())
    }

    /// Copy the native file `src` into the image folder `path`
    pub fn put(
        &self,
        image: impl AsRef<Path>,
        src: impl AsRef<Path>,
        path: &str,
        partition: u32,
    ) -> Result<()> {
        self.invoke(
            Command::Put,
            image.as_ref(),
            partition,
            &[expand_home(src).into_os_string(), path.into()],
        )?;
        Ok(())
    }

    /// Copy the native directory `directory` into the image folder `path`
    pub fn put_directory(
        &self,
        image: impl AsRef<Path>,
        directory: impl AsRef<Path>,
        path: &str,
        partition: u32,
    ) -> Result<()> {
        self.invoke(
            Command::PutDirectory,
            image.as_ref(),
            partition,
            &[expand_home(directory).into_os_string(), path.into()],
        )?;
        Ok(())
    }

    /// Delete `path` from the image
    pub fn delete(&self, image: impl AsRef<Path>, path: &str, partition: u32) -> Result<()> {
        self.invoke(Command::Delete, image.as_ref(), partition, &[path.into()])?;
        Ok(())
    }
}
