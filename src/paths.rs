//! Native path helpers

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
///
/// Paths without the shorthand, and all paths when no home directory can be
/// determined, are returned unchanged.
pub fn expand_home<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) if rest.as_os_str().is_empty() => home,
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paths_unchanged() {
        assert_eq!(expand_home("disk.fdi"), PathBuf::from("disk.fdi"));
        assert_eq!(expand_home("/tmp/disk.fdi"), PathBuf::from("/tmp/disk.fdi"));
        assert_eq!(expand_home("~user/disk.fdi"), PathBuf::from("~user/disk.fdi"));
    }

    #[test]
    fn test_home_expansion() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~"), home);
            assert_eq!(expand_home("~/images/disk.fdi"), home.join("images/disk.fdi"));
        }
    }
}
