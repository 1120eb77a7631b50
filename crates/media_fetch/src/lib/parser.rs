//! # Hydration Parser
//!
//! This module extracts the `window.__sc_hydration` payload that track and
//! playlist pages embed in one of their `<script>` tags, and reads the fields
//! the download pipeline needs out of it.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::{
    error::Error,
    types::{HydrationEntry, PlaylistData, SoundData},
};

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<script[^>]*>(.*?)</script>").unwrap());

const HYDRATION_PREFIX: &str = "window.__sc_hydration = ";
const HYDRATION_SUFFIX: &str = ";";

/// Returns the first item `parse` accepts, or `None` when nothing does.
pub fn find_first<I, T, F>(items: I, parse: F) -> Option<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Option<T>,
{
    items.into_iter().find_map(parse)
}

/// Strips the hydration assignment wrapper off a script body.
/// Returns `None` for scripts that are not the hydration assignment.
fn unwrap_hydration_script(body: &str) -> Option<&str> {
    let body = body.trim();
    let body = body.strip_prefix(HYDRATION_PREFIX)?;
    Some(body.strip_suffix(HYDRATION_SUFFIX).unwrap_or(body))
}

pub struct HydrationDocument(String);

impl Deref for HydrationDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl HydrationDocument {
    pub fn new(doc: String) -> Self {
        HydrationDocument(doc)
    }

    /// Bodies of every `<script>` tag, in document order
    fn scripts(&self) -> impl Iterator<Item = &str> {
        SCRIPT_RE
            .captures_iter(self)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str())
    }

    /// Deserializes the first hydration script that parses as `T`
    pub fn to_json<T>(&self) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        find_first(self.scripts(), |script| {
            unwrap_hydration_script(script).and_then(|json| serde_json::from_str(json).ok())
        })
        .ok_or(Error::ParseError(
            "Failed to extract __sc_hydration from the page's script tags",
        ))
    }

    pub fn to_payload(&self) -> Result<HydrationPayload, Error> {
        self.to_json::<Vec<HydrationEntry>>().map(HydrationPayload)
    }
}

impl From<String> for HydrationDocument {
    fn from(value: String) -> Self {
        HydrationDocument(value)
    }
}

/// The fields of a track page the manifest request is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPayload {
    pub track_authorization: String,
    pub transcoding_url: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HydrationPayload(Vec<HydrationEntry>);

impl HydrationPayload {
    pub fn entries(&self) -> &[HydrationEntry] {
        &self.0
    }

    /// Last entry with the given `hydratable` kind
    pub fn entry(&self, hydratable: &str) -> Option<&HydrationEntry> {
        self.0
            .iter()
            .rev()
            .find(|e| e.hydratable.as_deref() == Some(hydratable))
    }

    /// Reads the track authorization and the first transcoding URL.
    ///
    /// The `sound` entry is preferred; pages without one fall back to the last
    /// entry of the payload, which is where track data sits on track pages.
    pub fn track(&self) -> Result<TrackPayload, Error> {
        let entry = self
            .entry("sound")
            .or_else(|| self.0.last())
            .ok_or(Error::ParseError("Hydration payload is empty"))?;

        let SoundData {
            track_authorization,
            media,
            title,
        } = serde_json::from_value(entry.data.clone()).map_err(|e| {
            tracing::error!(error = %e, "Unexpected track hydration structure");
            Error::ParseError("Failed to read ['data']['track_authorization'] and ['data']['media']")
        })?;

        let transcoding_url = media
            .transcodings
            .into_iter()
            .next()
            .ok_or(Error::ParseError(
                "Failed to get item at idx 0 from ['data']['media']['transcodings']",
            ))?
            .url;

        Ok(TrackPayload {
            track_authorization,
            transcoding_url,
            title,
        })
    }

    /// Track ids of a playlist page, oldest addition first
    pub fn playlist_track_ids(&self) -> Result<Vec<u64>, Error> {
        let entry = self
            .entry("playlist")
            .ok_or(Error::ParseError("Playlist data not found in hydration payload"))?;

        let PlaylistData { tracks } = serde_json::from_value(entry.data.clone())
            .map_err(|_| Error::ParseError("Failed to read ['data']['tracks'] of playlist"))?;

        Ok(tracks.into_iter().rev().map(|t| t.id).collect())
    }
}
