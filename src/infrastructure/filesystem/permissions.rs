//! Recursive permission clearing.
//!
//! Git object files are created read-only, so `.git` cannot be deleted
//! without first forcing everything writable.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::common::error::FleetError;
use crate::common::result::FleetResult;

/// Force every file and directory under `root` (inclusive) to be writable.
pub fn make_writable_recursive(root: &Path) -> FleetResult<()> {
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| {
            FleetError::filesystem_error(
                format!("Failed to walk {}: {}", root.display(), e),
                Some(root.to_path_buf()),
            )
        })?;

        let metadata = entry.metadata().map_err(|e| {
            FleetError::filesystem_error(
                format!("Failed to stat {}: {}", entry.path().display(), e),
                Some(entry.path().to_path_buf()),
            )
        })?;

        let mut permissions = metadata.permissions();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            permissions.set_mode(0o755);
        }
        #[cfg(not(unix))]
        {
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
        }

        fs::set_permissions(entry.path(), permissions).map_err(|e| {
            FleetError::filesystem_error_with_source(
                format!("Failed to change permissions on {}", entry.path().display()),
                Some(entry.path().to_path_buf()),
                e,
            )
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_makes_readonly_tree_deletable() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("objects");
        fs::create_dir(&nested).unwrap();
        let file = nested.join("pack");
        fs::write(&file, "data").unwrap();

        let mut perms = fs::metadata(&file).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&file, perms).unwrap();

        make_writable_recursive(dir.path()).unwrap();

        assert!(!fs::metadata(&file).unwrap().permissions().readonly());
        fs::remove_dir_all(dir.path().join("objects")).unwrap();
    }
}
