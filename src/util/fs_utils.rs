use std::fs;
use std::fs::File;
use std::io;
use std::path::Path;

use spdlog::debug;
use walkdir::WalkDir;

use crate::content::collector::walk_error;
use crate::error::BuildError;

/// Copies every file under `src` into `dest`, keeping the relative layout.
/// Existing files in `dest` are overwritten, others are left alone.
/// Returns how many files were copied.
pub fn copy_dir(src: &Path, dest: &Path) -> Result<usize, BuildError> {
    let src_meta = fs::metadata(src).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => BuildError::NotFound(src.to_path_buf()),
        _ => BuildError::io(src, e),
    })?;

    if !dest.is_dir() {
        fs::create_dir_all(dest).map_err(|e| BuildError::io(dest, e))?;
        fs::set_permissions(dest, src_meta.permissions()).map_err(|e| BuildError::io(dest, e))?;
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(src, e))?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| BuildError::io(&target, e))?;
            continue;
        }

        copy_file(entry.path(), &target)?;
        debug!("Copied {} -> {}", entry.path().display(), target.display());
        copied += 1;
    }

    Ok(copied)
}

// Content only, the target keeps its own permissions.
fn copy_file(from: &Path, to: &Path) -> Result<(), BuildError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    let mut reader = File::open(from).map_err(|e| BuildError::io(from, e))?;
    let mut writer = File::create(to).map_err(|e| BuildError::io(to, e))?;
    io::copy(&mut reader, &mut writer).map_err(|e| BuildError::io(to, e))?;
    Ok(())
}

/// Leaves `dir` as an empty directory, whatever was there before.
pub fn clean_dir(dir: &Path) -> Result<(), BuildError> {
    if dir.is_file() {
        fs::remove_file(dir).map_err(|e| BuildError::io(dir, e))?;
    }
    if !dir.exists() {
        return fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e));
    }

    let entries = fs::read_dir(dir).map_err(|e| BuildError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| BuildError::io(dir, e))?.path();
        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| BuildError::io(&path, e))?;
    }
    Ok(())
}
