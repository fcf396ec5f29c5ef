//! Depth-first search over a directory tree.
//!
//! Both discovery phases (matching a USB device by ID, then finding its tty)
//! are the same question asked of sysfs: "what is the first node under here
//! that looks like this?" This module answers it once.
//!
//! Symbolic links are reported as entries but never traversed, not even when
//! the root itself is one. Callers that need to search beneath a linked node
//! must canonicalize it first.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Return the path of the first entry under `root` (including `root`
/// itself) for which `is_match` holds.
///
/// Directories are only entered when `descend` holds for them. Siblings are
/// visited in file-name order, so the result is stable for a given tree.
/// Returns `Ok(None)` when the whole tree was searched without a match.
pub fn find_first<M, D>(root: &Path, mut is_match: M, mut descend: D) -> io::Result<Option<PathBuf>>
where
    M: FnMut(&DirEntry) -> bool,
    D: FnMut(&DirEntry) -> bool,
{
    let mut entries = WalkDir::new(root)
        .follow_links(false)
        .follow_root_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = entries.next() {
        let entry = entry.map_err(unwrap_io)?;
        if is_match(&entry) {
            return Ok(Some(entry.into_path()));
        }
        // skip_current_dir() on a non-directory would skip its parent instead
        if entry.file_type().is_dir() && !descend(&entry) {
            entries.skip_current_dir();
        }
    }

    Ok(None)
}

// Keep the OS error intact where there is one; the walker only makes up its
// own errors for link loops, which can't occur without following links.
fn unwrap_io(err: walkdir::Error) -> io::Error {
    let fallback = io::Error::other(err.to_string());
    err.into_io_error().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::tests::FakeTree;

    fn name_is(entry: &DirEntry, name: &str) -> bool {
        entry.file_name() == name
    }

    #[test]
    fn test_first_match_in_name_order() {
        let tree = FakeTree::new();
        tree.file("b/target", "");
        tree.file("a/deep/target", "");

        let found = find_first(tree.path(), |e| name_is(e, "target"), |_| true).unwrap();
        assert_eq!(found, Some(tree.path().join("a/deep/target")));
    }

    #[test]
    fn test_root_can_match() {
        let tree = FakeTree::new();
        let found = find_first(tree.path(), |e| e.depth() == 0, |_| true).unwrap();
        assert_eq!(found, Some(tree.path().to_path_buf()));
    }

    #[test]
    fn test_no_match() {
        let tree = FakeTree::new();
        tree.file("a/b/c", "");
        let found = find_first(tree.path(), |e| name_is(e, "missing"), |_| true).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_descend_prunes_subtree() {
        let tree = FakeTree::new();
        tree.file("pruned/target", "");
        tree.file("zzz/target", "");

        let found = find_first(
            tree.path(),
            |e| name_is(e, "target"),
            |e| !name_is(e, "pruned"),
        )
        .unwrap();
        assert_eq!(found, Some(tree.path().join("zzz/target")));
    }

    #[test]
    fn test_symlinks_not_followed() {
        let tree = FakeTree::new();
        tree.file("real/inner/target", "");
        tree.symlink("real", "link");

        // Prune the real directory: only a followed link could reach the target.
        let found = find_first(
            tree.path(),
            |e| name_is(e, "target"),
            |e| !name_is(e, "real"),
        )
        .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_symlinked_root_not_entered() {
        let tree = FakeTree::new();
        tree.file("real/target", "");
        tree.symlink("real", "link");

        let link = tree.path().join("link");
        let found = find_first(&link, |e| name_is(e, "target"), |_| true).unwrap();
        assert_eq!(found, None);

        let real = link.canonicalize().unwrap();
        let found = find_first(&real, |e| name_is(e, "target"), |_| true).unwrap();
        assert_eq!(found, Some(real.join("target")));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let tree = FakeTree::new();
        let result = find_first(&tree.path().join("absent"), |_| true, |_| true);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
