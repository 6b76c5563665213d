//! Error types and Result alias

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for NDC operations
pub type Result<T> = std::result::Result<T, NdcError>;

/// Full-width period that terminates every message the tool prints.
pub const SENTENCE_TERMINATOR: char = '。';

/// Classification of a failure reported by the NDC binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolErrorKind {
    /// The image could not be opened
    Permission,
    /// The folder named inside the image does not exist
    FileNotFound,
    /// The image path is invalid
    InvalidImagePath,
    /// The partition number is invalid
    InvalidPartition,
    /// Storing a file into the image failed
    FileStorageFailure,
    /// The native source path does not exist
    InvalidSourcePath,
    /// The native destination folder does not exist
    InvalidDestinationPath,
    /// A message that is not in the known table
    Unknown,
}

const KNOWN_SENTENCES: [(&str, ToolErrorKind); 7] = [
    ("イメージのオープンに失敗しました。", ToolErrorKind::Permission),
    ("指定のフォルダが存在しません。", ToolErrorKind::FileNotFound),
    ("イメージパスが不正です。", ToolErrorKind::InvalidImagePath),
    ("パーティション番号が不正です。", ToolErrorKind::InvalidPartition),
    ("ファイルの格納に失敗しました。", ToolErrorKind::FileStorageFailure),
    ("転送元パスが存在しません。", ToolErrorKind::InvalidSourcePath),
    ("転送先フォルダが存在しません。", ToolErrorKind::InvalidDestinationPath),
];

impl ToolErrorKind {
    /// Classify a message by exact match against the known sentences
    pub fn from_message(message: &str) -> Self {
        KNOWN_SENTENCES
            .iter()
            .find(|(sentence, _)| *sentence == message)
            .map(|(_, kind)| *kind)
            .unwrap_or(ToolErrorKind::Unknown)
    }

    /// The sentence the tool prints for this kind, if it has one
    pub fn sentence(&self) -> Option<&'static str> {
        KNOWN_SENTENCES
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(sentence, _)| *sentence)
    }

    /// Get a human-readable name for this kind
    pub fn name(&self) -> &'static str {
        match self {
            ToolErrorKind::Permission => "permission denied",
            ToolErrorKind::FileNotFound => "folder not found",
            ToolErrorKind::InvalidImagePath => "invalid image path",
            ToolErrorKind::InvalidPartition => "invalid partition",
            ToolErrorKind::FileStorageFailure => "file storage failure",
            ToolErrorKind::InvalidSourcePath => "invalid source path",
            ToolErrorKind::InvalidDestinationPath => "invalid destination path",
            ToolErrorKind::Unknown => "unrecognized error",
        }
    }
}

/// Cut `text` after its first full-width period.
///
/// Text without a terminator is returned whole.
pub fn first_sentence(text: &str) -> &str {
    match text.find(SENTENCE_TERMINATOR) {
        Some(idx) => &text[..idx + SENTENCE_TERMINATOR.len_utf8()],
        None => text,
    }
}

/// Errors that can occur when driving the NDC binary
#[derive(Debug, Error)]
pub enum NdcError {
    /// The binary reported a version that is not in the supported set
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),

    /// The binary printed nothing when asked for its version
    #[error("No version banner from {}", .0.display())]
    EmptyOutput(PathBuf),

    /// The binary exited with a failure status
    #[error("{}: {message}", .kind.name())]
    Tool {
        /// Classified failure
        kind: ToolErrorKind,
        /// First sentence of the tool's output
        message: String,
    },

    /// The binary could not be launched
    #[error("Failed to run {}: {source}", .bin.display())]
    Spawn {
        /// Binary that was launched
        bin: PathBuf,
        /// Underlying launch error
        source: std::io::Error,
    },

    /// I/O error on the native filesystem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A listing row did not have enough fields
    #[error("Malformed row: {0:?}")]
    MalformedRow(String),

    /// A listing row carried a timestamp that could not be parsed
    #[error("Unparsable timestamp {text:?}: {source}")]
    Timestamp {
        /// Raw timestamp text
        text: String,
        /// Parser error
        source: chrono::ParseError,
    },
}

impl NdcError {
    /// Build a tool error from raw output text, classifying its first sentence
    pub fn from_tool_output(text: &str) -> Self {
        let message = first_sentence(text.trim()).to_string();
        NdcError::Tool {
            kind: ToolErrorKind::from_message(&message),
            message,
        }
    }

    /// The tool error kind, if this is a tool failure
    pub fn tool_kind(&self) -> Option<ToolErrorKind> {
        match self {
            NdcError::Tool { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
