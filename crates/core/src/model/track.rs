use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of a track. Used as the join key for forced positions
/// and lane lookups across recomputations.
pub type TrackId = u64;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("track {id}: invalid {field} date {value:?} (expected YYYY-MM-DD): {source}")]
    InvalidDate {
        id: TrackId,
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Anything with an identity and an inclusive calendar-day range.
///
/// The lane assignor only needs these three accessors, so callers can
/// schedule their own records without converting them to [`Track`].
pub trait Interval {
    fn id(&self) -> TrackId;
    fn start(&self) -> NaiveDate;
    fn end(&self) -> NaiveDate;
}

impl<T: Interval + ?Sized> Interval for &T {
    fn id(&self) -> TrackId {
        (**self).id()
    }

    fn start(&self) -> NaiveDate {
        (**self).start()
    }

    fn end(&self) -> NaiveDate {
        (**self).end()
    }
}

/// A named, date-ranged item on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    /// Display label. Opaque to lane assignment.
    pub name: String,
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl Track {
    pub fn new(id: TrackId, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            start,
            end,
        }
    }

    /// Build a track from ISO `YYYY-MM-DD` strings, rejecting anything that
    /// does not parse as a calendar date.
    pub fn parse(
        id: TrackId,
        name: impl Into<String>,
        start: &str,
        end: &str,
    ) -> Result<Self, TrackError> {
        let start = parse_date(id, "start", start)?;
        let end = parse_date(id, "end", end)?;
        Ok(Self::new(id, name, start, end))
    }

    /// Days between `start` and `end` (0 for a single-day track).
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Number of calendar days covered, counting both ends; never below 1.
    pub fn span_days(&self) -> i64 {
        (self.duration_days() + 1).max(1)
    }

    /// The same track moved to begin on `start`, keeping its duration.
    ///
    /// Returns `None` if the shifted end falls outside chrono's date range.
    pub fn shifted_to(&self, start: NaiveDate) -> Option<Self> {
        let end = start.checked_add_signed(TimeDelta::try_days(self.duration_days())?)?;
        Some(Self {
            start,
            end,
            ..self.clone()
        })
    }
}

impl Interval for Track {
    fn id(&self) -> TrackId {
        self.id
    }

    fn start(&self) -> NaiveDate {
        self.start
    }

    fn end(&self) -> NaiveDate {
        self.end
    }
}

fn parse_date(id: TrackId, field: &'static str, value: &str) -> Result<NaiveDate, TrackError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|source| TrackError::InvalidDate {
        id,
        field,
        value: value.to_owned(),
        source,
    })
}
