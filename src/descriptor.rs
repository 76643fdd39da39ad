//! Project descriptor load, backup and write-back.
//!
//! The descriptor is treated as an opaque text blob: read in full, mutated
//! in memory by the ops layer, written back in full. Backups are plain
//! copies under a pass-specific suffix next to the target; repeated runs
//! overwrite the previous backup. There is no atomic rename and no
//! rollback, a crash mid-write can leave a truncated target with the
//! backup intact on disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PatchError, PatchResult};

/// An SES `.emProject` descriptor held in memory.
#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
    path: PathBuf,
    text: String,
}

impl ProjectDescriptor {
    /// Read the descriptor at `path` in full.
    pub fn load(path: impl AsRef<Path>) -> PatchResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(PatchError::FileNotFound(path.display().to_string()));
        }

        let text = fs::read_to_string(&path)?;
        log::debug!("loaded {} ({} bytes)", path.display(), text.len());

        Ok(ProjectDescriptor { path, text })
    }

    /// Write the current in-memory content to `<path><suffix>`.
    ///
    /// The backup reflects whatever the content is at the moment of the
    /// call; passes decide whether that is the pristine text or an already
    /// mutated one. An existing backup is silently overwritten.
    pub fn backup(&self, suffix: &str) -> PatchResult<PathBuf> {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(suffix);
        let backup_path = PathBuf::from(name);

        fs::write(&backup_path, &self.text)?;
        log::info!("backed up to {}", backup_path.display());

        Ok(backup_path)
    }

    /// Overwrite the target path with the current in-memory content.
    pub fn save(&self) -> PatchResult<()> {
        fs::write(&self.path, &self.text)?;
        log::info!("wrote {} ({} bytes)", self.path.display(), self.text.len());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let err = ProjectDescriptor::load(dir.path().join("absent.emProject")).unwrap_err();
        assert!(matches!(err, PatchError::FileNotFound(_)));
    }

    #[test]
    fn test_backup_preserves_content_at_time_of_backup() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("project.emProject");
        fs::write(&target, "<folder Name=\"A\"></folder>").unwrap();

        let mut descriptor = ProjectDescriptor::load(&target).unwrap();
        let backup_path = descriptor.backup(".original").unwrap();

        // Mutating after the backup must not affect the backup file.
        descriptor.set_text("<folder Name=\"B\"></folder>".to_string());
        descriptor.save().unwrap();

        assert_eq!(
            fs::read_to_string(&backup_path).unwrap(),
            "<folder Name=\"A\"></folder>"
        );
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "<folder Name=\"B\"></folder>"
        );
    }

    #[test]
    fn test_repeated_backup_overwrites() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("project.emProject");
        fs::write(&target, "first").unwrap();

        let mut descriptor = ProjectDescriptor::load(&target).unwrap();
        descriptor.backup(".backup").unwrap();

        descriptor.set_text("second".to_string());
        let backup_path = descriptor.backup(".backup").unwrap();

        assert_eq!(fs::read_to_string(backup_path).unwrap(), "second");
    }

    #[test]
    fn test_backup_suffix_is_appended_to_full_name() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("project.emProject");
        fs::write(&target, "x").unwrap();

        let descriptor = ProjectDescriptor::load(&target).unwrap();
        let backup_path = descriptor.backup(".final_backup").unwrap();

        assert_eq!(
            backup_path.file_name().unwrap().to_string_lossy(),
            "project.emProject.final_backup"
        );
    }
}
