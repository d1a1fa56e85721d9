use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Create the parent directory of `path` if it doesn't exist; error if a
/// non-directory exists there.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else { return Ok(()) };
    if parent.exists() {
        if !parent.is_dir() {
            anyhow::bail!("Path exists but is not a directory: {}", parent.display());
        }
    } else {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}
