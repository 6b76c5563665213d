/*!
# ndc

A Rust wrapper around the NDC disk image tool.

NDC reads and writes the disk image formats used by PC-98 era machines
(FDI, HDI, NFD, D88 and friends). This crate drives the NDC binary as a child
process, one process per operation, and turns its console output into typed
values.

## Features

- Version check of the binary at construction
- Listing, searching, fetching, storing and deleting image entries
- Depth-first folder walks and whole-image extraction
- Localized tool messages mapped to typed errors
- Shift-JIS or UTF-8 output decoding depending on the platform profile

## Quick Start

```rust,no_run
use ndc::Ndc;

let ndc = Ndc::new("~/bin/ndc")?;
println!("Using {}", ndc.version());

// List the root folder of the first partition
for entry in ndc.list("game.fdi", "", 0)? {
    println!("{}\t{}\t{}", entry.name, entry.size, entry.modified_at);
}

// Find a single file
if let Some(entry) = ndc.find("game.fdi", "AUTOEXEC.BAT", "", 0)? {
    println!("Found {}", entry.name);
}

// Copy everything out
let summary = ndc.extract("game.fdi", "out", 0)?;
println!("{} files, {} directories", summary.files, summary.directories);
# Ok::<(), ndc::NdcError>(())
```

## Modules

- `runner`: the wrapper and its operations
- `config`: configuration and builder
- `profile`: platform encoding and timestamp conventions
- `entry`: listing rows
- `exec`: process launching
- `walk`: folder traversal and extraction
- `tree`: folder tree rendering
- `error`: error types and Result alias
*/

#![warn(missing_docs)]

/// Configuration and builder
pub mod config;
/// Listing rows
pub mod entry;
/// Error types and Result alias
pub mod error;
/// Process launching
pub mod exec;
/// Native path helpers
pub mod paths;
/// Platform encoding and timestamp conventions
pub mod profile;
/// The wrapper and its operations
pub mod runner;
/// Folder tree rendering
pub mod tree;
/// Folder traversal and extraction
pub mod walk;

// Re-export common types
pub use config::{NdcBuilder, NdcConfig, DEFAULT_BIN, SUPPORTED_VERSIONS};
pub use entry::{Entry, DIRECTORY_TYPE};
pub use error::{NdcError, Result, ToolErrorKind};
pub use exec::{Executor, ProcessExecutor, RawOutput};
pub use paths::expand_home;
pub use profile::{Profile, TextEncoding, TimestampFormat};
pub use runner::{Command, Ndc};
pub use walk::{ExtractSummary, Walk, WalkLevel};
