//! Wrapper configuration and builder

use crate::entry::DIRECTORY_TYPE;
use crate::error::Result;
use crate::exec::{Executor, ProcessExecutor};
use crate::runner::Ndc;
use crate::profile::{Profile, TextEncoding, TimestampFormat};
use std::path::PathBuf;

/// Default binary name, looked up on `PATH`
pub const DEFAULT_BIN: &str = "ndc";

/// Version banners of the releases this wrapper understands
pub const SUPPORTED_VERSIONS: [&str; 1] = ["NDC Ver.0 alpha06"];

/// Read-only configuration established at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdcConfig {
    /// Path to the NDC binary (may start with `~`)
    pub bin: PathBuf,
    /// Encoding, timestamp and separator conventions
    pub profile: Profile,
    /// Accepted version banners
    pub supported_versions: Vec<String>,
    /// Type string that marks a subdirectory in listings
    pub directory_type: String,
}

impl Default for NdcConfig {
    fn default() -> Self {
        Self {
            bin: PathBuf::from(DEFAULT_BIN),
            profile: Profile::native(),
            supported_versions: SUPPORTED_VERSIONS.iter().map(|v| v.to_string()).collect(),
            directory_type: DIRECTORY_TYPE.to_string(),
        }
    }
}

impl NdcConfig {
    /// Is `version` one of the accepted banners?
    pub fn supports(&self, version: &str) -> bool {
        self.supported_versions.iter().any(|v| v == version)
    }
}

/// Builder for constructing an [`Ndc`] wrapper
#[derive(Debug, Clone, Default)]
pub struct NdcBuilder {
    config: NdcConfig,
}

impl NdcBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: NdcConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the binary path
    pub fn bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.config.bin = bin.into();
        self
    }

    /// Set the whole platform profile
    pub fn profile(mut self, profile: Profile) -> Self {
        self.config.profile = profile;
        self
    }

    /// Override the output encoding
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.config.profile.encoding = encoding;
        self
    }

    /// Override the timestamp format
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.profile.timestamp_format = format;
        self
    }

    /// Override the image path separator
    pub fn separator(mut self, separator: char) -> Self {
        self.config.profile.separator = separator;
        self
    }

    /// Accept an additional version banner
    pub fn supported_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        if !self.config.supports(&version) {
            self.config.supported_versions.push(version);
        }
        self
    }

    /// Replace the accepted version banners
    pub fn supported_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.supported_versions = versions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the subdirectory type string
    pub fn directory_type(mut self, directory_type: impl Into<String>) -> Self {
        self.config.directory_type = directory_type.into();
        self
    }

    /// Check the binary version and build a wrapper that spawns child processes
    pub fn build(self) -> Result<Ndc> {
        Ndc::with_executor(self.config, ProcessExecutor)
    }

    /// Check the binary version and build a wrapper around a custom executor
    pub fn build_with<E: Executor>(self, executor: E) -> Result<Ndc<E>> {
        Ndc::with_executor(self.config, executor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NdcConfig::default();
        assert_eq!(config.bin, PathBuf::from("ndc"));
        assert!(config.supports("NDC Ver.0 alpha06"));
        assert!(!config.supports("NDC Ver.0 alpha05"));
        assert_eq!(config.directory_type, "<DIR>");
    }

    #[test]
    fn test_builder_overrides() {
        let builder = NdcBuilder::new()
            .bin("~/bin/ndc")
            .profile(Profile::windows())
            .timestamp_format(TimestampFormat::Permissive)
            .supported_version("NDC Ver.0 alpha07")
            .supported_version("NDC Ver.0 alpha07")
            .directory_type("DIR");

        let config = builder.config;
        assert_eq!(config.bin, PathBuf::from("~/bin/ndc"));
        assert_eq!(config.profile.encoding, TextEncoding::ShiftJis);
        assert_eq!(config.profile.timestamp_format, TimestampFormat::Permissive);
        assert_eq!(config.supported_versions.len(), 2);
        assert_eq!(config.directory_type, "DIR");
    }

    #[test]
    fn test_profile_field_overrides() {
        let config = NdcBuilder::new()
            .profile(Profile::unix())
            .encoding(TextEncoding::ShiftJis)
            .separator('\\')
            .config;
        assert_eq!(config.profile.encoding, TextEncoding::ShiftJis);
        assert_eq!(config.profile.separator, '\\');
        assert_eq!(config.profile.timestamp_format, Profile::unix().timestamp_format);
    }

    #[test]
    fn test_start_from_config() {
        let base = NdcConfig {
            bin: PathBuf::from("/opt/ndc/ndc"),
            profile: Profile::windows(),
            supported_versions: vec!["NDC Ver.0 alpha07".to_string()],
            directory_type: "DIR".to_string(),
        };

        let config = NdcBuilder::new().config(base.clone()).config;
        assert_eq!(config, base);

        let config = NdcBuilder::new().config(base).directory_type("<DIR>").config;
        assert_eq!(config.bin, PathBuf::from("/opt/ndc/ndc"));
        assert_eq!(config.directory_type, "<DIR>");
    }

    #[test]
    fn test_replace_versions() {
        let config = NdcBuilder::new().supported_versions(["X", "Y"]).config;
        assert!(config.supports("Y"));
        assert!(!config.supports("NDC Ver.0 alpha06"));
    }
}
