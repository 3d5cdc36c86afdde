use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Raw search payload. Records are kept as JSON values so one malformed
/// entry only costs that entry, not the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub result_count: usize,
    #[serde(default)]
    pub results: Vec<Value>,
}

impl SearchResponse {
    /// Parses every record as a `Track`, skipping the ones that do not fit.
    pub fn into_tracks(self) -> Vec<Track> {
        self.results
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match Track::deserialize(record) {
                Ok(track) => Some(track),
                Err(e) => {
                    warn!(index, "skipping_malformed_record: {e}");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(rename = "trackId")]
    pub id: u64,
    #[serde(rename = "trackName", default)]
    pub title: Option<String>,
    #[serde(rename = "artistName", default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(rename = "primaryGenreName", default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(rename = "trackViewUrl", default)]
    pub detail_url: Option<String>,
    #[serde(default)]
    pub track_number: Option<u32>,
    #[serde(default)]
    pub track_time_millis: Option<u64>,
}

impl Track {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown Title")
    }

    pub fn artist(&self) -> &str {
        self.artist.as_deref().unwrap_or("Unknown Artist")
    }

    pub fn detail_url(&self) -> Option<&str> {
        self.detail_url.as_deref().filter(|u| !u.is_empty())
    }

    pub fn is_playable(&self) -> bool {
        self.preview_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Length of the full track as reported by the catalog.
    pub fn catalog_duration(&self) -> Option<Duration> {
        self.track_time_millis
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "resultCount": 2,
        "results": [
            {
                "wrapperType": "track",
                "kind": "song",
                "trackId": 1440818839,
                "artistName": "Rihanna",
                "collectionName": "Talk That Talk",
                "trackName": "We Found Love (feat. Calvin Harris)",
                "previewUrl": "https://audio-ssl.itunes.apple.com/preview.m4a",
                "artworkUrl100": "https://is1-ssl.mzstatic.com/100x100bb.jpg",
                "trackViewUrl": "https://music.apple.com/mx/album/1440818839",
                "releaseDate": "2011-09-22T07:00:00Z",
                "primaryGenreName": "Pop",
                "trackNumber": 3,
                "trackTimeMillis": 215227
            },
            {
                "trackId": 7,
                "trackName": "Interlude"
            }
        ]
    }"#;

    fn parse(body: &str) -> Vec<Track> {
        serde_json::from_str::<SearchResponse>(body)
            .unwrap()
            .into_tracks()
    }

    #[test]
    fn parses_catalog_response() {
        let response: SearchResponse = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(response.result_count, 2);
        let tracks = response.into_tracks();
        assert_eq!(tracks.len(), 2);

        let track = &tracks[0];
        assert_eq!(track.id, 1440818839);
        assert_eq!(track.artist(), "Rihanna");
        assert_eq!(track.genre.as_deref(), Some("Pop"));
        assert_eq!(track.track_number, Some(3));
        assert_eq!(
            track.catalog_duration(),
            Some(Duration::from_millis(215227))
        );
        assert!(track.is_playable());
        assert_eq!(
            track.detail_url(),
            Some("https://music.apple.com/mx/album/1440818839")
        );
        assert_eq!(
            track.release_date.map(|d| d.format("%Y-%m-%d").to_string()),
            Some("2011-09-22".to_string())
        );
    }

    #[test]
    fn missing_optional_fields_fall_back() {
        let tracks = parse(FIXTURE);
        let track = &tracks[1];
        assert_eq!(track.title(), "Interlude");
        assert_eq!(track.artist(), "Unknown Artist");
        assert!(!track.is_playable());
        assert_eq!(track.catalog_duration(), None);
        assert_eq!(track.detail_url(), None);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let tracks = parse(
            r#"{
                "resultCount": 4,
                "results": [
                    {"trackId": 1, "trackName": "Umbrella"},
                    {"wrapperType": "collection", "collectionId": 9, "collectionName": "Loud"},
                    {"trackId": "not-a-number"},
                    {"trackId": 2, "trackName": "Diamonds"}
                ]
            }"#,
        );

        let ids: Vec<u64> = tracks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn empty_body_has_no_results() {
        assert!(parse("{}").is_empty());
    }
}
