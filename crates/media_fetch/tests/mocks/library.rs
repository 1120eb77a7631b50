use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use track_library::Library;

/// Library whose contents are fixed up front; paths land in `dir`
pub struct MockLibrary {
    pub dir: PathBuf,
    pub existing: HashSet<String>,
    pub fail_with: Option<String>,
}

impl MockLibrary {
    pub fn new(dir: &Path, existing: &[&str]) -> Self {
        Self {
            dir: dir.to_path_buf(),
            existing: existing.iter().map(|s| s.to_string()).collect(),
            fail_with: None,
        }
    }

    pub fn failing(dir: &Path, msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new(dir, &[])
        }
    }
}

impl Library for MockLibrary {
    fn existing_tracks(&self, names: &[&str]) -> anyhow::Result<HashSet<String>> {
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(names
            .iter()
            .filter(|n| self.existing.contains(**n))
            .map(|n| n.to_string())
            .collect())
    }

    fn track_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.mp3"))
    }
}
