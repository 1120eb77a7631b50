//! Playlist-level operations: listing a playlist's tracks and keeping a
//! local library in sync with it.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::Context;
use itertools::Itertools;
use track_library::{sanitize_filename, Library};

use crate::{auth::AuthProvider, error::Error, http::HttpFetch, types::TrackInfo, MediaFetcher};

const PARTIAL_SUFFIX: &str = ".part";

/// File stem a track is stored under; titles with nothing usable left after
/// sanitizing fall back to the track id.
pub fn track_file_stem(info: &TrackInfo) -> String {
    let name = sanitize_filename(&info.title);
    if name.trim().is_empty() {
        format!("track-{}", info.id)
    } else {
        name
    }
}

/// Outcome of a playlist sync, by sanitized track name
#[derive(Debug, Default)]
pub struct SyncReport {
    pub downloaded: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

impl<H, A> MediaFetcher<H, A>
where
    H: HttpFetch,
    A: AuthProvider,
{
    /// Track ids listed on a playlist page, oldest addition first
    #[tracing::instrument(skip(self))]
    pub async fn fetch_track_ids(&self, playlist_url: &str) -> Result<Vec<u64>, Error> {
        let doc = self.fetch_hydration_document(playlist_url).await?;
        let ids = doc
            .to_payload()?
            .playlist_track_ids()
            .inspect_err(|e| tracing::error!(error = %e, "Playlist data not found"))?;

        tracing::info!(count = ids.len(), "Found tracks in playlist");
        Ok(ids)
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_track_info(&self, track_id: u64) -> Result<TrackInfo, Error> {
        let url = format!(
            "{}/tracks?ids={track_id}&client_id={}",
            self.config().api_base,
            self.config().client_id
        );
        let body = self.get_text(&url).await?;

        serde_json::from_str::<Vec<TrackInfo>>(&body)?
            .into_iter()
            .next()
            .ok_or(Error::ParseError("Track lookup returned no tracks"))
    }

    /// Remote track names, in playlist order
    async fn remote_track_names(&self, playlist_url: &str) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        for track_id in self.fetch_track_ids(playlist_url).await? {
            let info = self.fetch_track_info(track_id).await?;
            names.push(track_file_stem(&info));
        }
        Ok(names)
    }

    /// Downloads every playlist track missing from `library`.
    ///
    /// With `refresh` set the sync stops at the first track already present,
    /// since newer additions come last. Failed tracks are reported, not fatal.
    #[tracing::instrument(skip(self, library))]
    pub async fn sync_playlist<L: Library>(
        &self,
        playlist_url: &str,
        library: &L,
        refresh: bool,
    ) -> anyhow::Result<SyncReport> {
        let track_ids = self
            .fetch_track_ids(playlist_url)
            .await
            .context("Failed to list playlist tracks")?;

        let mut report = SyncReport::default();
        let mut tracks = Vec::with_capacity(track_ids.len());
        for track_id in track_ids {
            match self.fetch_track_info(track_id).await {
                Ok(info) => tracks.push((track_file_stem(&info), info)),
                Err(e) => {
                    tracing::error!(error = %e, track_id, "Failed to fetch track information");
                    report.failed.push(format!("Track ID: {track_id}"));
                }
            }
        }

        let names = tracks.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>();
        let existing = library.existing_tracks(&names).unwrap_or_else(|e| {
            tracing::warn!(error = ?e, "Failed to list library, treating it as empty");
            HashSet::new()
        });

        let total = tracks.len();
        for (idx, (name, info)) in tracks.into_iter().enumerate() {
            tracing::info!(track_id = info.id, "Processing track {}/{}", idx + 1, total);

            if existing.contains(&name) {
                if refresh {
                    tracing::info!(track = %name, "Reached known track, playlist refreshed");
                    break;
                }
                tracing::info!(track = %name, "Track already in library");
                report.skipped.push(name);
                continue;
            }

            let path = library.track_path(&name);
            match self.download_into_library(&info.permalink_url, &path).await {
                Ok(_) => report.downloaded.push(name),
                Err(e) => {
                    tracing::error!(error = %e, track = %name, "Failed to download track");
                    report.failed.push(name);
                }
            }
        }

        Ok(report)
    }

    /// Downloads next to `path` and moves the file into place only once it
    /// is complete, so an interrupted track is never counted as present.
    async fn download_into_library(&self, page_url: &str, path: &Path) -> Result<u64, Error> {
        let mut partial = path.as_os_str().to_owned();
        partial.push(PARTIAL_SUFFIX);
        let partial = PathBuf::from(partial);

        let result = match self.download_track(page_url, &partial).await {
            Ok(written) => tokio::fs::rename(&partial, path)
                .await
                .map(|_| written)
                .map_err(Error::from),
            Err(e) => Err(e),
        };

        if result.is_err() && partial.exists() {
            if let Err(e) = tokio::fs::remove_file(&partial).await {
                tracing::warn!(error = ?e, path = ?partial, "Failed to remove partial download");
            }
        }
        result
    }

    /// Names of playlist tracks that are not in `library`
    #[tracing::instrument(skip(self, library))]
    pub async fn compare_playlist<L: Library>(
        &self,
        playlist_url: &str,
        library: &L,
    ) -> anyhow::Result<Vec<String>> {
        let remote = self
            .remote_track_names(playlist_url)
            .await
            .context("Failed to list remote tracks")?;

        let names = remote.iter().map(String::as_str).collect::<Vec<_>>();
        let existing = library.existing_tracks(&names)?;

        Ok(remote
            .into_iter()
            .filter(|name| !existing.contains(name))
            .unique()
            .collect())
    }
}
