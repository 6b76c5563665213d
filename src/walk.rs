//! Depth-first traversal and bulk extraction built on `list` and `get`

use crate::entry::Entry;
use crate::error::Result;
use crate::exec::Executor;
use crate::runner::Ndc;
use crate::paths::expand_home;
use std::fs;
use std::path::{Path, PathBuf};

/// One folder visited by [`Walk`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkLevel {
    /// Folder path inside the image
    pub path: String,
    /// Names of subdirectories, in listing order
    pub directories: Vec<String>,
    /// Names of files, in listing order
    pub files: Vec<String>,
}

/// Lazy depth-first traversal of an image's folder tree.
///
/// Each folder is listed when the iterator reaches it. A folder that fails to
/// list is reported as an `Err` item and its subtree is skipped.
pub struct Walk<'a, E> {
    ndc: &'a Ndc<E>,
    image: PathBuf,
    partition: u32,
    pending: Vec<String>,
}

impl<'a, E: Executor> Walk<'a, E> {
    fn new(ndc: &'a Ndc<E>, image: &Path, top: &str, partition: u32) -> Self {
        Self {
            ndc,
            image: image.to_path_buf(),
            partition,
            pending: vec![top.to_string()],
        }
    }

    fn visit(&mut self, path: String) -> Result<WalkLevel> {
        let entries = self.ndc.children(&self.image, &path, self.partition)?;
        let directory_type = &self.ndc.config().directory_type;

        let mut level = WalkLevel {
            path,
            directories: Vec::new(),
            files: Vec::new(),
        };

        for entry in entries {
            if entry.is_directory(directory_type) {
                level.directories.push(entry.name);
            } else {
                level.files.push(entry.name);
            }
        }

        let profile = self.ndc.profile();
        for name in level.directories.iter().rev() {
            self.pending.push(profile.join(&level.path, name));
        }

        Ok(level)
    }
}

impl<'a, E: Executor> Iterator for Walk<'a, E> {
    type Item = Result<WalkLevel>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.pending.pop()?;
        Some(self.visit(path))
    }
}

/// Counts of what [`Ndc::extract`] materialized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Files copied out of the image
    pub files: usize,
    /// Directories created on the native filesystem
    pub directories: usize,
}

impl<E: Executor> Ndc<E> {
    /// Entries of the folder `path`, without the volume descriptor row
    pub fn children(&self, image: impl AsRef<Path>, path: &str, partition: u32) -> Result<Vec<Entry>> {
        let mut entries = self.list(image, path, partition)?;
        // First row is the volume descriptor
        if !entries.is_empty() {
            entries.remove(0);
        }
        Ok(entries)
    }

    /// Walk the folder tree below `top`, depth-first
    pub fn walk(&self, image: impl AsRef<Path>, top: &str, partition: u32) -> Walk<'_, E> {
        Walk::new(self, image.as_ref(), top, partition)
    }

    /// Native directory that mirrors the image folder `path` below `root`
    pub fn native_path(&self, root: &Path, path: &str) -> PathBuf {
        let mut native = root.to_path_buf();
        native.extend(self.profile().components(path));
        native
    }

    /// Copy the whole image into the native directory `destination`.
    ///
    /// At each folder, files are fetched first and subdirectories created
    /// after. Stops at the first failure.
    pub fn extract(
        &self,
        image: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        partition: u32,
    ) -> Result<ExtractSummary> {
        let image = image.as_ref();
        let destination = expand_home(destination);
        fs::create_dir_all(&destination)?;

        let mut summary = ExtractSummary::default();
        for level in self.walk(image, "", partition) {
            let level = level?;
            let target = self.native_path(&destination, &level.path);

            for file in &level.files {
                let path = self.profile().join(&level.path, file);
                self.get(image, &path, &target, partition)?;
                summary.files += 1;
            }

            for directory in &level.directories {
                fs::create_dir_all(target.join(directory))?;
                summary.directories += 1;
            }
            tracing::debug!(
                "Extracted {:?}: {} files, {} directories",
                level.path,
                level.files.len(),
                level.directories.len()
            );
        }

        Ok(summary)
    }
}
