use std::{collections::HashSet, path::PathBuf};

pub mod local;

pub trait Library {
    /// Returns the subset of `names` that already exist in the library
    fn existing_tracks(&self, names: &[&str]) -> anyhow::Result<HashSet<String>>;

    /// Location a track named `name` is (or would be) stored at
    fn track_path(&self, name: &str) -> PathBuf;
}

impl<T: Library> Library for &T {
    fn existing_tracks(&self, names: &[&str]) -> anyhow::Result<HashSet<String>> {
        (**self).existing_tracks(names)
    }

    fn track_path(&self, name: &str) -> PathBuf {
        (**self).track_path(name)
    }
}
