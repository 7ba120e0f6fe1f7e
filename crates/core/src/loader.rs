//! Track dataset loading.
//!
//! Accepts either a bare JSON array of tracks or an object with an
//! `"items"` array:
//!
//! ```json
//! [{"id": 1, "name": "Kickoff", "start": "2021-01-01", "end": "2021-01-05"}]
//! ```

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::model::{Track, TrackError, TrackId};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected an array of tracks or an object with an \"items\" array")]
    UnexpectedShape,
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error("duplicate track id {0}")]
    DuplicateId(TrackId),
    #[error("track {id} ends ({end}) before it starts ({start})")]
    InvertedRange {
        id: TrackId,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Dates stay as strings here so malformed ones surface as
/// [`TrackError::InvalidDate`] naming the offending track.
#[derive(Debug, Deserialize)]
struct RawTrack {
    id: TrackId,
    #[serde(default)]
    name: String,
    start: String,
    end: String,
}

/// Parse and validate a track dataset.
pub fn load_tracks(data: &[u8]) -> Result<Vec<Track>, LoadError> {
    let value: serde_json::Value = serde_json::from_slice(data)?;
    let items = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut obj) => obj
            .remove("items")
            .filter(serde_json::Value::is_array)
            .ok_or(LoadError::UnexpectedShape)?,
        _ => return Err(LoadError::UnexpectedShape),
    };
    let raw: Vec<RawTrack> = serde_json::from_value(items)?;

    let mut seen = HashSet::with_capacity(raw.len());
    let mut tracks = Vec::with_capacity(raw.len());
    for r in raw {
        if !seen.insert(r.id) {
            return Err(LoadError::DuplicateId(r.id));
        }
        let track = Track::parse(r.id, r.name, &r.start, &r.end)?;
        if track.end < track.start {
            return Err(LoadError::InvertedRange {
                id: track.id,
                start: track.start,
                end: track.end,
            });
        }
        tracks.push(track);
    }

    debug!(tracks = tracks.len(), "loaded dataset");
    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_bare_array() {
        let data = br#"[
            {"id": 1, "name": "A", "start": "2021-01-01", "end": "2021-01-05"},
            {"id": 2, "name": "B", "start": "2021-01-03", "end": "2021-01-03"}
        ]"#;
        let tracks = load_tracks(data).expect("valid dataset");
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].name, "B");
    }

    #[test]
    fn loads_items_object() {
        let data = br#"{"items": [{"id": 9, "start": "2021-02-01", "end": "2021-02-02"}]}"#;
        let tracks = load_tracks(data).expect("valid dataset");
        assert_eq!(tracks[0].id, 9);
        assert_eq!(tracks[0].name, "");
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(matches!(load_tracks(b"42"), Err(LoadError::UnexpectedShape)));
        assert!(matches!(
            load_tracks(br#"{"tracks": []}"#),
            Err(LoadError::UnexpectedShape)
        ));
        assert!(matches!(load_tracks(b"not json"), Err(LoadError::Json(_))));
    }

    #[test]
    fn malformed_date_names_track() {
        let data = br#"[{"id": 3, "name": "C", "start": "2021-02-30", "end": "2021-03-01"}]"#;
        let err = load_tracks(data).expect_err("Feb 30 is not a date");
        let msg = err.to_string();
        assert!(msg.contains("track 3"), "{msg}");
        assert!(msg.contains("start"), "{msg}");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let data = br#"[
            {"id": 1, "name": "A", "start": "2021-01-01", "end": "2021-01-05"},
            {"id": 1, "name": "B", "start": "2021-01-03", "end": "2021-01-04"}
        ]"#;
        assert!(matches!(load_tracks(data), Err(LoadError::DuplicateId(1))));
    }

    #[test]
    fn rejects_inverted_range() {
        let data = br#"[{"id": 4, "name": "D", "start": "2021-05-02", "end": "2021-05-01"}]"#;
        assert!(matches!(
            load_tracks(data),
            Err(LoadError::InvertedRange { id: 4, .. })
        ));
    }
}
