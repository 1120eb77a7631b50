use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::library::Library;

/// A directory of tracks sharing a single file extension
#[derive(Debug, Clone)]
pub struct LocalLibrary {
    dir: PathBuf,
    extension: String,
}

impl LocalLibrary {
    /// Opens the library at `dir`, creating the directory if it does not exist
    pub fn init(dir: impl Into<PathBuf>, extension: impl Into<String>) -> anyhow::Result<Self> {
        let dir = dir.into();

        std::fs::create_dir_all(&dir)
            .inspect_err(|e| tracing::error!(error = ?e, dir = ?dir, "Failed to create library directory"))
            .with_context(|| format!("Failed to create library directory {}", dir.display()))?;

        Ok(LocalLibrary {
            dir,
            extension: extension.into(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl Library for LocalLibrary {
    fn existing_tracks(&self, names: &[&str]) -> anyhow::Result<HashSet<String>> {
        let entries = std::fs::read_dir(&self.dir)
            .inspect_err(|e| tracing::error!(error = ?e, dir = ?self.dir, "Failed to read library directory"))
            .context("Failed to read library directory")?;

        let on_disk = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str()))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_owned))
            .collect::<HashSet<_>>();

        Ok(names
            .iter()
            .filter(|name| on_disk.contains(**name))
            .map(|name| name.to_string())
            .collect())
    }

    fn track_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{}", self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("DnB");
        assert!(!dir.exists());

        let library = LocalLibrary::init(&dir, "mp3").expect("init should succeed");
        assert!(dir.is_dir());
        assert_eq!(library.dir(), dir.as_path());
        assert_eq!(library.extension(), "mp3");
    }

    #[test]
    fn test_track_path_appends_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let library = LocalLibrary::init(tmp.path(), "wav").unwrap();

        assert_eq!(
            library.track_path("Some Track"),
            tmp.path().join("Some Track.wav")
        );
    }

    #[test]
    fn test_existing_tracks_matches_only_same_extension() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("present.mp3"), b"x").unwrap();
        std::fs::write(tmp.path().join("other.wav"), b"x").unwrap();

        let library = LocalLibrary::init(tmp.path(), "mp3").unwrap();
        let existing = library
            .existing_tracks(&["present", "other", "missing"])
            .expect("listing should succeed");

        assert_eq!(existing, HashSet::from(["present".to_string()]));
    }

    #[test]
    fn test_existing_tracks_in_empty_library() {
        let tmp = tempfile::tempdir().unwrap();
        let library = LocalLibrary::init(tmp.path(), "mp3").unwrap();

        assert!(library.existing_tracks(&["a", "b"]).unwrap().is_empty());
    }
}
