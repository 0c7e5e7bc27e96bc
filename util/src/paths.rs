use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// File name of the persisted local-storage document inside the storage root.
pub const LOCAL_STORAGE_FILE: &str = "local_storage.json";

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Resolves a configured directory: absolute as-is, relative against current_dir().
pub fn resolve_dir(dir: &str) -> PathBuf {
    let p = PathBuf::from(dir);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}
