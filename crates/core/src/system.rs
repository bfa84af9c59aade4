//! Filesystem adapter
//!
//! The list and state types never touch the disk directly for per-path
//! operations; they go through a `FileSystem`. `LocalFileSystem` is the
//! std-backed implementation. Tree enumeration for `Directory` and `Glob`
//! lives here too (`walk`).

use crate::error::{FilesError, Result};
use crate::list::FileList;
use crate::path::Path;
use crate::paths::Paths;
use filetime::FileTime;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// Per-path filesystem operations
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Last modification time
    fn modified_time(&self, path: &Path) -> Result<SystemTime>;

    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Create or truncate, then write `data`
    fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Create if needed, then append `data`
    fn append(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Create the file if missing and set its mtime to now
    fn touch(&self, path: &Path) -> Result<()>;

    /// Create the directory and all parents
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a file or a directory tree; a missing path is not an error
    fn remove_all(&self, path: &Path) -> Result<()>;

    fn copy(&self, from: &Path, to: &Path) -> Result<()>;

    /// Touch every member of `list`
    fn touch_all(&self, list: &dyn FileList) -> Result<()> {
        list.iter().try_for_each(|path| self.touch(&path))
    }

    /// True if every member of `list` exists
    fn all_exist(&self, list: &dyn FileList) -> bool {
        list.iter().all(|path| self.exists(&path))
    }

    /// Create every member of `list` as a directory
    fn create_all(&self, list: &dyn FileList) -> Result<()> {
        list.iter().try_for_each(|path| self.create_dir_all(&path))
    }

    /// Remove every member of `list` recursively
    fn delete_all(&self, list: &dyn FileList) -> Result<()> {
        list.iter().try_for_each(|path| self.remove_all(&path))
    }

    /// Copy every member of `list` to its location under `destination`
    ///
    /// Directories are recreated, files copied with their parents created
    /// first. Returns the destination paths.
    fn copy_all(&self, list: &dyn FileList, destination: &str) -> Result<Paths> {
        let mut copied = Vec::new();

        for path in list.iter() {
            let target = path.rebase(destination);

            if self.is_dir(&path) {
                self.create_dir_all(&target)?;
            } else {
                self.create_dir_all(&target.parent())?;
                self.copy(&path, &target)?;
            }

            copied.push(target);
        }

        Ok(Paths::with_roots(copied, vec![destination.to_string()]))
    }
}

/// `FileSystem` backed by the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        std_path(path).exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        std_path(path).is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        std_path(path).is_file()
    }

    fn modified_time(&self, path: &Path) -> Result<SystemTime> {
        fs::metadata(std_path(path))
            .and_then(|metadata| metadata.modified())
            .map_err(|e| FilesError::io(path.full_path(), e))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(std_path(path)).map_err(|e| FilesError::io(path.full_path(), e))
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        fs::write(std_path(path), data).map_err(|e| FilesError::io(path.full_path(), e))
    }

    fn append(&self, path: &Path, data: &[u8]) -> Result<()> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(std_path(path))
            .and_then(|mut file| file.write_all(data))
            .map_err(|e| FilesError::io(path.full_path(), e))
    }

    fn touch(&self, path: &Path) -> Result<()> {
        let target = std_path(path);

        if !target.exists() {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(target)
                .map_err(|e| FilesError::io(path.full_path(), e))?;
        }

        filetime::set_file_mtime(target, FileTime::now())
            .map_err(|e| FilesError::io(path.full_path(), e))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(std_path(path)).map_err(|e| FilesError::io(path.full_path(), e))
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        let target = std_path(path);

        let result = match fs::symlink_metadata(target) {
            Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(target),
            Ok(_) => fs::remove_file(target),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        };

        result.map_err(|e| FilesError::io(path.full_path(), e))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        fs::copy(std_path(from), std_path(to))
            .map(|_| ())
            .map_err(|e| FilesError::io(from.full_path(), e))
    }
}

fn std_path(path: &Path) -> &std::path::Path {
    path.as_ref()
}

/// Recursively list everything below `root`
///
/// Dotfiles are included, `root` itself is not. Entries come back sorted by
/// file name within each directory. A missing root yields nothing.
pub(crate) fn walk(root: &str, max_depth: Option<usize>) -> impl Iterator<Item = String> {
    let mut walker = WalkDir::new(root).min_depth(1).follow_links(false).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    walker.into_iter().filter_map(|entry| match entry {
        Ok(entry) => Some(entry.path().to_string_lossy().into_owned()),
        Err(e) => {
            debug!("Skipping unreadable entry during walk: {}", e);
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root(temp_dir: &TempDir) -> Path {
        Path::from(temp_dir.path())
    }

    #[test]
    fn test_write_read_and_stat() {
        let temp_dir = TempDir::new().unwrap();
        let file = root(&temp_dir) + "hello.txt";
        let fs = LocalFileSystem;

        fs.write(&file, b"Hello World").unwrap();

        assert!(fs.exists(&file));
        assert!(fs.is_file(&file));
        assert!(!fs.is_dir(&file));
        assert_eq!(fs.read(&file).unwrap(), b"Hello World");

        let age = SystemTime::now()
            .duration_since(fs.modified_time(&file).unwrap())
            .unwrap_or_default();
        assert!(age.as_secs() < 5);
    }

    #[test]
    fn test_append() {
        let temp_dir = TempDir::new().unwrap();
        let file = root(&temp_dir) + "log.txt";
        let fs = LocalFileSystem;

        fs.append(&file, b"a").unwrap();
        fs.append(&file, b"b").unwrap();

        assert_eq!(fs.read(&file).unwrap(), b"ab");
    }

    #[test]
    fn test_create_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let dir = root(&temp_dir) + "nested/deeper";
        let fs = LocalFileSystem;

        fs.create_dir_all(&dir).unwrap();
        assert!(fs.is_dir(&dir));

        fs.remove_all(&(root(&temp_dir) + "nested")).unwrap();
        assert!(!fs.exists(&dir));

        // Removing again is fine
        fs.remove_all(&(root(&temp_dir) + "nested")).unwrap();
    }

    #[test]
    fn test_modified_time_of_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalFileSystem;
        assert!(fs.modified_time(&(root(&temp_dir) + "nope")).is_err());
    }

    #[test]
    fn test_touch_all_and_delete_all() {
        let temp_dir = TempDir::new().unwrap();
        let base = root(&temp_dir);
        let files = Paths::directory(base.full_path(), ["a", "b"]);
        let fs = LocalFileSystem;

        assert!(!fs.all_exist(&files));
        fs.touch_all(&files).unwrap();
        assert!(fs.all_exist(&files));

        fs.delete_all(&files).unwrap();
        assert!(!fs.exists(&(base + "a")));
    }

    #[test]
    fn test_copy_all_rebases() {
        let temp_dir = TempDir::new().unwrap();
        let base = root(&temp_dir);
        let source = base.full_path().to_string() + "/src";
        let destination = base.full_path().to_string() + "/dst";
        let fs = LocalFileSystem;

        let files = Paths::directory(&source, ["one.txt", "sub/two.txt"]);
        fs.create_dir_all(&Path::new(source.clone() + "/sub")).unwrap();
        for path in files.iter() {
            fs.write(&path, path.relative_path().as_bytes()).unwrap();
        }

        let copied = fs.copy_all(&files, &destination).unwrap();

        assert_eq!(copied.count(), 2);
        let two = Path::join(&destination, "sub/two.txt");
        assert_eq!(fs.read(&two).unwrap(), b"sub/two.txt");
    }

    #[test]
    fn test_walk_includes_dotfiles_and_skips_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let base = root(&temp_dir);
        let fs = LocalFileSystem;
        fs.touch(&(base.clone() + ".hidden")).unwrap();
        fs.touch(&(base.clone() + "visible")).unwrap();

        let entries: Vec<String> = walk(base.full_path(), None).collect();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.ends_with("/.hidden")));

        assert_eq!(walk(&(base + "missing").to_string(), None).count(), 0);
    }
}
