//! Segment extraction from the HLS media playlists the manifest descriptor points at.

use std::borrow::Cow;

use m3u8_rs::MediaPlaylist;

use crate::error::Error;

const PLAYLIST_HEADER: &str = "#EXTM3U";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentRef {
    /// Initialization segment declared through `#EXT-X-MAP`
    Init(String),
    Media(String),
}

impl SegmentRef {
    pub fn url(&self) -> &str {
        match self {
            SegmentRef::Init(url) | SegmentRef::Media(url) => url,
        }
    }
}

/// Some CDNs serve bare segment lists; give them the header the parser
/// requires and terminate the last line so its URI is not dropped.
fn normalize(playlist: &str) -> Cow<'_, str> {
    let has_header = playlist.trim_start().starts_with(PLAYLIST_HEADER);
    let terminated = playlist.ends_with('\n');
    if has_header && terminated {
        return Cow::Borrowed(playlist);
    }

    let mut normalized = String::with_capacity(playlist.len() + PLAYLIST_HEADER.len() + 2);
    if !has_header {
        normalized.push_str(PLAYLIST_HEADER);
        normalized.push('\n');
    }
    normalized.push_str(playlist);
    if !terminated {
        normalized.push('\n');
    }
    Cow::Owned(normalized)
}

/// Splits a media playlist into the ordered segments to download.
///
/// Comment and tag lines are dropped except the first `#EXT-X-MAP`, whose
/// segment is placed ahead of every media segment.
pub fn parse_segments(playlist: &str) -> Result<Vec<SegmentRef>, Error> {
    let normalized = normalize(playlist);
    let MediaPlaylist { segments, .. } = m3u8_rs::parse_media_playlist_res(normalized.as_bytes())
        .map_err(|e| {
            tracing::error!(error = ?e, "Failed to parse media playlist");
            Error::ParseError("Failed to parse media playlist")
        })?;

    let init = segments
        .iter()
        .find_map(|s| s.map.as_ref())
        .map(|map| SegmentRef::Init(map.uri.clone()));

    let media = segments
        .into_iter()
        .map(|s| s.uri.trim().to_owned())
        .filter(|uri| !uri.is_empty())
        .map(SegmentRef::Media);

    Ok(init.into_iter().chain(media).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_lines_are_dropped_in_order() {
        let playlist = "#comment\nhttps://seg1\nhttps://seg2\n";
        assert_eq!(
            parse_segments(playlist).unwrap(),
            vec![
                SegmentRef::Media("https://seg1".into()),
                SegmentRef::Media("https://seg2".into()),
            ]
        );
    }

    #[test]
    fn test_init_segment_comes_first() {
        let playlist = r#"#EXTM3U
#EXT-X-VERSION:6
#EXT-X-TARGETDURATION:10
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-MAP:URI="https://cf-hls-media.example.com/init.mp4?token=a%2Cb"
#EXTINF:1.985,
https://cf-hls-media.example.com/media/0/1/seg.m4s
#EXTINF:9.984,
https://cf-hls-media.example.com/media/1/2/seg.m4s
#EXT-X-ENDLIST
"#;

        assert_eq!(
            parse_segments(playlist).unwrap(),
            vec![
                SegmentRef::Init("https://cf-hls-media.example.com/init.mp4?token=a%2Cb".into()),
                SegmentRef::Media("https://cf-hls-media.example.com/media/0/1/seg.m4s".into()),
                SegmentRef::Media("https://cf-hls-media.example.com/media/1/2/seg.m4s".into()),
            ]
        );
    }

    #[test]
    fn test_init_uri_keeps_commas_inside_quotes() {
        let playlist = "#EXTM3U\n#EXT-X-MAP:URI=\"https://init/a.mp4?x=1,2\"\n#EXTINF:10,\nhttps://seg1\n";

        assert_eq!(
            parse_segments(playlist).unwrap(),
            vec![
                SegmentRef::Init("https://init/a.mp4?x=1,2".into()),
                SegmentRef::Media("https://seg1".into()),
            ]
        );
    }

    #[test]
    fn test_map_with_byterange_attribute() {
        let playlist = "#EXTM3U\n#EXT-X-MAP:URI=\"https://init\",BYTERANGE=\"720@0\"\n#EXTINF:10,\nhttps://seg1\n";

        let segments = parse_segments(playlist).unwrap();
        assert_eq!(segments[0], SegmentRef::Init("https://init".into()));
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_last_line_without_newline_is_kept() {
        let urls = parse_segments("#EXTM3U\r\n#EXTINF:10,\r\nhttps://seg1\r\n#EXTINF:10,\r\nhttps://seg2")
            .unwrap()
            .iter()
            .map(|s| s.url().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(urls, vec!["https://seg1", "https://seg2"]);
    }

    #[test]
    fn test_empty_playlist() {
        assert!(parse_segments("#EXTM3U\n#EXT-X-ENDLIST\n").unwrap().is_empty());
    }
}
