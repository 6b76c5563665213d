//! Platform profile: text encoding, timestamp format and image path separator

use crate::error::{NdcError, Result};
use chrono::{DateTime, NaiveDateTime};

/// Timestamp layout used by the Windows build of the tool
pub const SLASHED_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
/// Timestamp layout used by the Unix build of the tool (ctime style)
pub const CTIME_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Additional layouts accepted in permissive mode
const PERMISSIVE_FORMATS: [&str; 6] = [
    CTIME_FORMAT,
    SLASHED_FORMAT,
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d %H:%M",
];

/// Text encoding of the tool's console output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8
    Utf8,
    /// Shift-JIS (Windows code page 932)
    ShiftJis,
}

impl TextEncoding {
    /// Decode raw output bytes, replacing invalid sequences
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::ShiftJis => {
                let (text, _, _) = encoding_rs::SHIFT_JIS.decode(bytes);
                text.into_owned()
            }
        }
    }

    /// Get a human-readable name for this encoding
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::ShiftJis => "Shift-JIS",
        }
    }
}

/// How the last field of a listing row is turned into a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `YYYY/MM/DD HH:MM:SS`
    Slashed,
    /// `Weekday Month Day HH:MM:SS Year`
    Ctime,
    /// Any of the known layouts, RFC 3339 or RFC 2822
    Permissive,
}

impl TimestampFormat {
    /// Parse a timestamp field
    pub fn parse(&self, text: &str) -> Result<NaiveDateTime> {
        // ctime pads single-digit days with a space
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

        let parsed = match self {
            TimestampFormat::Slashed => NaiveDateTime::parse_from_str(&normalized, SLASHED_FORMAT),
            TimestampFormat::Ctime => NaiveDateTime::parse_from_str(&normalized, CTIME_FORMAT),
            TimestampFormat::Permissive => parse_permissive(&normalized),
        };

        parsed.map_err(|source| NdcError::Timestamp {
            text: text.to_string(),
            source,
        })
    }
}

fn parse_permissive(text: &str) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    let mut last_error = None;

    for format in PERMISSIVE_FORMATS {
        match NaiveDateTime::parse_from_str(text, format) {
            Ok(stamp) => return Ok(stamp),
            Err(e) => last_error = Some(e),
        }
    }

    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(stamp.naive_local());
    }

    match DateTime::parse_from_rfc2822(text) {
        Ok(stamp) => Ok(stamp.naive_local()),
        Err(e) => Err(last_error.unwrap_or(e)),
    }
}

/// Platform-dependent conventions of the tool, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Console output encoding
    pub encoding: TextEncoding,
    /// Listing timestamp format
    pub timestamp_format: TimestampFormat,
    /// Separator between folder names inside an image
    pub separator: char,
}

impl Profile {
    /// Conventions of the Windows build
    pub fn windows() -> Self {
        Self {
            encoding: TextEncoding::ShiftJis,
            timestamp_format: TimestampFormat::Slashed,
            separator: '\\',
        }
    }

    /// Conventions of the Unix build
    pub fn unix() -> Self {
        Self {
            encoding: TextEncoding::Utf8,
            timestamp_format: TimestampFormat::Ctime,
            separator: '/',
        }
    }

    /// Profile for the platform this program was compiled for
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::windows()
        } else {
            Self::unix()
        }
    }

    /// Join a folder path inside the image with a child name
    pub fn join(&self, parent: &str, name: &str) -> String {
        if parent.is_empty() {
            name.to_string()
        } else if parent.ends_with(self.separator) {
            format!("{}{}", parent, name)
        } else {
            format!("{}{}{}", parent, self.separator, name)
        }
    }

    /// Split a folder path inside the image into its components
    pub fn components<'a>(&self, path: &'a str) -> impl Iterator<Item = &'a str> {
        path.split(self.separator).filter(|part| !part.is_empty())
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::native()
    }
}
