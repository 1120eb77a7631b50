use std::path::{Path, PathBuf};

use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Url,
};
use tokio::io::AsyncWriteExt;

use crate::{
    auth::AuthProvider,
    error::Error,
    http::HttpFetch,
    manifest::{parse_segments, SegmentRef},
    parser::{HydrationDocument, TrackPayload},
    types::ManifestDescriptor,
};

pub mod builder;

/// Per-run settings threaded through every request
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub client_id: String,
    pub user_agent: String,
    /// Base of the public JSON API used for track lookups
    pub api_base: String,
}

impl FetchConfig {
    pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";
    pub const DEFAULT_API_BASE: &str = "https://api-v2.soundcloud.com";

    pub fn new(client_id: impl Into<String>) -> Self {
        FetchConfig {
            client_id: client_id.into(),
            user_agent: Self::DEFAULT_USER_AGENT.into(),
            api_base: Self::DEFAULT_API_BASE.into(),
        }
    }
}

// Turns a track page into a local audio file
#[derive(Debug)]
pub struct MediaFetcher<H, A>
where
    H: HttpFetch,
    A: AuthProvider,
{
    config: FetchConfig,
    http: H,
    auth: A,
}

impl<H, A> MediaFetcher<H, A>
where
    H: HttpFetch,
    A: AuthProvider,
{
    pub fn new(config: FetchConfig, http: H, auth: A) -> Self {
        MediaFetcher { config, http, auth }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// `wav` for session downloads (lossless transcodings), `mp3` otherwise
    pub fn output_extension(&self) -> &'static str {
        if self.auth.is_authenticated() {
            "wav"
        } else {
            "mp3"
        }
    }

    /// `music.<ext>` in the working directory
    pub fn default_output_path(&self) -> PathBuf {
        PathBuf::from(format!("music.{}", self.output_extension()))
    }

    /// User agent plus whatever the auth provider contributes
    pub(crate) fn request_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = self.auth.headers()?;
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.config.user_agent)?);
        Ok(headers)
    }

    pub(crate) async fn get_text(&self, url: &str) -> Result<String, Error> {
        self.http.get_text(url, self.request_headers()?).await
    }

    /// Loads a page and locates its hydration script
    #[tracing::instrument(skip(self))]
    pub async fn fetch_hydration_document(&self, page_url: &str) -> Result<HydrationDocument, Error> {
        let html = self
            .get_text(page_url)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch page"))?;

        Ok(html.into())
    }

    /// Reads the track authorization and transcoding URL off a track page
    #[tracing::instrument(skip(self))]
    pub async fn fetch_hydration_payload(&self, page_url: &str) -> Result<TrackPayload, Error> {
        let doc = self.fetch_hydration_document(page_url).await?;
        let track = doc.to_payload()?.track()?;

        tracing::debug!(title = ?track.title, transcoding_url = %track.transcoding_url, "Found track payload");
        Ok(track)
    }

    /// `<transcoding url>?client_id=..&track_authorization=..`
    fn manifest_request_url(&self, payload: &TrackPayload) -> Result<Url, Error> {
        let mut url = Url::parse(&payload.transcoding_url).map_err(|e| Error::InvalidUrl {
            url: payload.transcoding_url.clone(),
            reason: e.to_string(),
        })?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("track_authorization", &payload.track_authorization);

        Ok(url)
    }

    /// Exchanges the transcoding URL for the location of the media playlist
    #[tracing::instrument(skip_all)]
    pub async fn resolve_manifest_url(
        &self,
        payload: &TrackPayload,
    ) -> Result<ManifestDescriptor, Error> {
        let url = self.manifest_request_url(payload)?;

        let body = self.get_text(url.as_str()).await.map_err(|e| {
            if e.is_unauthorized() {
                Error::AuthError(format!("Transcoding resolution rejected: {e}"))
            } else {
                e
            }
        })?;

        serde_json::from_str::<ManifestDescriptor>(&body)
            .inspect_err(|e| tracing::error!(error = %e, body = %body, "Unexpected manifest response"))
            .map_err(|e| Error::AuthError(format!("Malformed manifest descriptor: {e}")))
    }

    /// Downloads the media playlist and lists its segments in playback order
    #[tracing::instrument(skip(self))]
    pub async fn fetch_playlist(&self, manifest_url: &str) -> Result<Vec<SegmentRef>, Error> {
        let playlist = self.get_text(manifest_url).await?;
        let segments = parse_segments(&playlist)?;

        tracing::info!(count = segments.len(), "Parsed playlist segments");
        Ok(segments)
    }

    /// Writes the segments, in order, into `output_path`.
    ///
    /// The file is truncated first. The first failed request aborts the
    /// download and leaves whatever was written so far.
    #[tracing::instrument(skip(self, segments), fields(segments = segments.len()))]
    pub async fn assemble_file(
        &self,
        segments: &[SegmentRef],
        output_path: &Path,
    ) -> Result<u64, Error> {
        let headers = self.request_headers()?;
        let mut file = tokio::fs::File::create(output_path)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to create output file"))?;

        let mut written = 0u64;
        let copied = async {
            for (idx, segment) in segments.iter().enumerate() {
                let bytes = self
                    .http
                    .get_bytes(segment.url(), headers.clone())
                    .await
                    .inspect_err(|e| tracing::error!(error = %e, idx, "Failed to fetch segment"))?;

                file.write_all(&bytes).await?;
                written += bytes.len() as u64;
            }
            Ok::<_, Error>(())
        }
        .await;

        // tokio hands writes to a background thread; settle them before returning
        file.flush().await?;

        copied.map(|_| written)
    }

    /// Runs the full page → manifest → playlist → file pipeline.
    /// Nothing touches `output_path` until the playlist has been resolved.
    #[tracing::instrument(skip(self))]
    pub async fn download_track(&self, page_url: &str, output_path: &Path) -> Result<u64, Error> {
        let payload = self.fetch_hydration_payload(page_url).await?;
        let manifest = self.resolve_manifest_url(&payload).await?;
        let segments = self.fetch_playlist(&manifest.url).await?;

        let written = self.assemble_file(&segments, output_path).await?;
        tracing::info!(bytes = written, path = %output_path.display(), "Track downloaded");

        Ok(written)
    }
}
