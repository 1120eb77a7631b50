//! Shapes of the JSON documents exchanged with the track host.
//! Only the fields the pipeline reads are modelled.

use serde::Deserialize;
use serde_json::Value;

/// One element of the `window.__sc_hydration` array
#[derive(Debug, Clone, Deserialize)]
pub struct HydrationEntry {
    #[serde(default)]
    pub hydratable: Option<String>,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoundData {
    pub track_authorization: String,
    pub media: Media,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    pub transcodings: Vec<Transcoding>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transcoding {
    pub url: String,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub format: Option<TranscodingFormat>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscodingFormat {
    pub protocol: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistData {
    pub tracks: Vec<PlaylistTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTrack {
    pub id: u64,
}

/// Answer of the transcoding resolution endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestDescriptor {
    pub url: String,
}

/// Entry of the `api-v2 /tracks?ids=` lookup
#[derive(Debug, Clone, Deserialize)]
pub struct TrackInfo {
    pub id: u64,
    pub title: String,
    pub permalink_url: String,
}
