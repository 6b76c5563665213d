//! Directory listing rows

use crate::error::{NdcError, Result};
use crate::profile::TimestampFormat;
use chrono::NaiveDateTime;

/// Field delimiter in the tool's listing output
pub const DELIMITER: char = '\t';

/// Names of the self and parent entries
pub const DOT_ENTRIES: [&str; 2] = [".", ".."];

/// Default type string marking a subdirectory
pub const DIRECTORY_TYPE: &str = "<DIR>";

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry name
    pub name: String,
    /// Size as printed by the tool (empty for some entry types)
    pub size: String,
    /// Type string as printed by the tool
    pub entry_type: String,
    /// Last modification time
    pub modified_at: NaiveDateTime,
}

impl Entry {
    /// Parse a tab-delimited listing row.
    ///
    /// The last field is the timestamp; the name absorbs any extra fields.
    pub fn parse(line: &str, format: TimestampFormat) -> Result<Self> {
        let mut fields = line.rsplitn(4, DELIMITER);
        let (Some(stamp), Some(entry_type), Some(size), Some(name)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(NdcError::MalformedRow(line.to_string()));
        };

        Ok(Self {
            name: name.to_string(),
            size: size.to_string(),
            entry_type: entry_type.to_string(),
            modified_at: format.parse(stamp)?,
        })
    }

    /// Is this the `.` or `..` entry?
    pub fn is_dot(&self) -> bool {
        DOT_ENTRIES.contains(&self.name.as_str())
    }

    /// Is this entry a subdirectory according to `directory_type`?
    pub fn is_directory(&self, directory_type: &str) -> bool {
        self.entry_type == directory_type
    }

    /// Size in bytes, if the size field is numeric
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.trim().parse().ok()
    }
}
