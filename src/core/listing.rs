//! Directory reads and `ls -F` style type indicators.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::os::unix::fs::{FileTypeExt, PermissionsExt};
use std::path::{Path, PathBuf};

use log::debug;

/// Type of a directory entry, judged without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Symlink,
    Directory,
    Executable,
    Pipe,
    Socket,
    Plain,
}

impl EntryKind {
    fn from_metadata(meta: &fs::Metadata) -> Self {
        let file_type = meta.file_type();
        if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if meta.permissions().mode() & 0o111 != 0 {
            EntryKind::Executable
        } else if file_type.is_fifo() {
            EntryKind::Pipe
        } else if file_type.is_socket() {
            EntryKind::Socket
        } else {
            EntryKind::Plain
        }
    }

    /// Suffix appended to the entry name on screen.
    pub fn indicator(self) -> &'static str {
        match self {
            EntryKind::Symlink => "@",
            EntryKind::Directory => "/",
            EntryKind::Executable => "*",
            EntryKind::Pipe => "|",
            EntryKind::Socket => "=",
            EntryKind::Plain => "",
        }
    }
}

/// One directory entry. `name` keeps the raw bytes so the path can be
/// rebuilt even when the name is not UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

impl FileEntry {
    /// Name with its type indicator, as drawn in the listing.
    pub fn display_name(&self) -> String {
        format!("{}{}", self.name.to_string_lossy(), self.kind.indicator())
    }
}

/// Snapshot of one directory, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct DirectoryListing {
    pub dir: PathBuf,
    pub entries: Vec<FileEntry>,
}

impl DirectoryListing {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FileEntry> {
        self.entries.get(index)
    }

    /// Absolute path of the entry at `index`.
    pub fn path_of(&self, index: usize) -> Option<PathBuf> {
        self.get(index).map(|entry| self.dir.join(&entry.name))
    }
}

/// Read `dir` into a `DirectoryListing`.
pub fn read_listing(dir: &Path) -> io::Result<DirectoryListing> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let meta = fs::symlink_metadata(entry.path())?;
        entries.push(FileEntry {
            name: entry.file_name(),
            kind: EntryKind::from_metadata(&meta),
        });
    }
    // Byte order of the raw names
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("Read {} entries from {}", entries.len(), dir.display());

    Ok(DirectoryListing {
        dir: dir.to_path_buf(),
        entries,
    })
}

/// True if `path` is a directory, following a symlink to its target.
/// Broken links count as files so that opening them reports the error.
pub fn resolves_to_dir(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempTree;

    #[test]
    fn test_entries_are_sorted_and_classified() {
        let tree = TempTree::new();
        tree.file("b.txt");
        tree.file("a.md");
        tree.dir("sub");
        tree.executable("run.sh");
        std::os::unix::fs::symlink(tree.path().join("sub"), tree.path().join("link")).unwrap();

        let listing = read_listing(tree.path()).unwrap();
        let names: Vec<_> = listing.entries.iter().map(FileEntry::display_name).collect();
        assert_eq!(names, vec!["a.md", "b.txt", "link@", "run.sh*", "sub/"]);
    }

    #[test]
    fn test_empty_directory() {
        let tree = TempTree::new();
        let listing = read_listing(tree.path()).unwrap();
        assert!(listing.is_empty());
        assert_eq!(listing.path_of(0), None);
    }

    #[test]
    fn test_missing_directory_errors() {
        let tree = TempTree::new();
        assert!(read_listing(&tree.path().join("gone")).is_err());
    }

    #[test]
    fn test_symlink_to_directory_resolves() {
        let tree = TempTree::new();
        tree.dir("real");
        tree.file("plain.txt");
        std::os::unix::fs::symlink(tree.path().join("real"), tree.path().join("to_dir")).unwrap();
        std::os::unix::fs::symlink(tree.path().join("nowhere"), tree.path().join("broken")).unwrap();

        assert!(resolves_to_dir(&tree.path().join("to_dir")));
        assert!(!resolves_to_dir(&tree.path().join("plain.txt")));
        assert!(!resolves_to_dir(&tree.path().join("broken")));
    }

    #[test]
    fn test_path_of_joins_listing_dir() {
        let tree = TempTree::new();
        tree.file("x.txt");
        let listing = read_listing(tree.path()).unwrap();
        assert_eq!(listing.path_of(0), Some(tree.path().join("x.txt")));
    }

    #[test]
    fn test_non_utf8_names_keep_their_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tree = TempTree::new();
        let dir = tree.path().join(OsStr::from_bytes(b"d\xff"));
        fs::create_dir(&dir).unwrap();

        let listing = read_listing(tree.path()).unwrap();
        let path = listing.path_of(0).unwrap();
        assert_eq!(path, dir);
        assert!(resolves_to_dir(&path));
        assert_eq!(listing.entries[0].display_name(), "d\u{fffd}/");
    }
}
