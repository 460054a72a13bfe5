//! Output tree operations.

use crate::debug;
use anyhow::{Context, Result};
use jwalk::{Parallelism, WalkDir};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

pub const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Write `contents`, creating parent directories.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// Remove a directory tree; missing directories are fine.
pub fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to remove directory {}", dir.display()))?;
        debug!("clean"; "removed {}", dir.display());
    }
    Ok(())
}

/// All regular files below `dir`, skipping OS metadata files.
///
/// A missing `dir` yields no files. The walk is serial so it can run from
/// inside a rayon worker.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).parallelism(Parallelism::Serial) {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_str().unwrap_or_default();
        if !IGNORED_FILES.contains(&name) {
            files.push(entry.path());
        }
    }
    Ok(files)
}

/// Copy every file under `src` into `dst`, keeping relative layout.
///
/// Returns the number of files copied.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<usize> {
    let files = collect_files(src)?;

    files.par_iter().try_for_each(|file| -> Result<()> {
        let relative = file
            .strip_prefix(src)
            .with_context(|| format!("{} is outside {}", file.display(), src.display()))?;
        let dest = dst.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(file, &dest)
            .with_context(|| format!("Failed to copy {} to {}", file.display(), dest.display()))?;
        Ok(())
    })?;

    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c.txt");

        write_file(&path, "hi").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "hi");
    }

    #[test]
    fn test_remove_missing_dir_is_ok() {
        let dir = TempDir::new().unwrap();
        remove_dir_if_exists(&dir.path().join("missing")).unwrap();
    }

    #[test]
    fn test_copy_dir_keeps_layout_and_skips_ignored() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write_file(&src.path().join("index.html"), "<html>").unwrap();
        write_file(&src.path().join("_app/immutable/app.js"), "js").unwrap();
        write_file(&src.path().join(".DS_Store"), "").unwrap();

        let copied = copy_dir(src.path(), &dst.path().join("static")).unwrap();

        assert_eq!(copied, 2);
        assert!(dst.path().join("static/index.html").exists());
        assert!(dst.path().join("static/_app/immutable/app.js").exists());
        assert!(!dst.path().join("static/.DS_Store").exists());
    }

    #[test]
    fn test_copy_dir_inside_rayon_worker() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write_file(&src.path().join("a.txt"), "a").unwrap();
        write_file(&src.path().join("nested/b.txt"), "b").unwrap();

        let (left, right) = rayon::join(
            || copy_dir(src.path(), &dst.path().join("left")),
            || copy_dir(src.path(), &dst.path().join("right")),
        );

        assert_eq!(left.unwrap(), 2);
        assert_eq!(right.unwrap(), 2);
        assert!(dst.path().join("right/nested/b.txt").exists());
    }

    #[test]
    fn test_collect_files_lists_nested() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("x/y/z.js"), "").unwrap();

        let files = collect_files(dir.path()).unwrap();

        assert_eq!(files, [dir.path().join("x/y/z.js")]);
    }

    #[test]
    fn test_copy_missing_dir_copies_nothing() {
        let dst = TempDir::new().unwrap();
        let copied = copy_dir(&dst.path().join("missing"), dst.path()).unwrap();
        assert_eq!(copied, 0);
    }
}
