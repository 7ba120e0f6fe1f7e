use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::TimelineConfig;
use crate::layout;
use crate::model::{Track, TrackId};

/// Where the dragged track would land if dropped now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragPreview {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub target_lane: usize,
    /// Pointer position in canvas coordinates.
    pub x: f64,
    pub y: f64,
}

/// A finished drop: the track's new dates and the lane it was dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropCommit {
    pub id: TrackId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub target_lane: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Committed(DropCommit),
    Cancelled,
}

/// Drag-to-reposition lifecycle: `Idle` → `Dragging` → back to `Idle` via
/// [`DragState::drop_item`] (commit) or [`DragState::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        id: TrackId,
        from_lane: usize,
        /// `None` until the pointer has moved over the canvas.
        preview: Option<DragPreview>,
    },
}

impl DragState {
    pub fn begin(&mut self, id: TrackId, from_lane: usize) {
        *self = Self::Dragging {
            id,
            from_lane,
            preview: None,
        };
    }

    pub fn dragged_id(&self) -> Option<TrackId> {
        match self {
            Self::Dragging { id, .. } => Some(*id),
            Self::Idle => None,
        }
    }

    pub fn from_lane(&self) -> Option<usize> {
        match self {
            Self::Dragging { from_lane, .. } => Some(*from_lane),
            Self::Idle => None,
        }
    }

    pub fn preview(&self) -> Option<&DragPreview> {
        match self {
            Self::Dragging { preview, .. } => preview.as_ref(),
            Self::Idle => None,
        }
    }

    /// Update the preview for a pointer at canvas position `(x, y)`.
    ///
    /// The new start is the day under the pointer (never before the range
    /// start) and the track keeps its duration. Does nothing when idle or
    /// when `track` is not the one being dragged.
    pub fn hover(
        &mut self,
        track: &Track,
        config: &TimelineConfig,
        scale: f64,
        x: f64,
        y: f64,
    ) -> Option<&DragPreview> {
        let Self::Dragging { id, preview, .. } = self else {
            return None;
        };
        if *id != track.id {
            return None;
        }

        let days_offset = (x / scale).round().max(0.0) as u64;
        let start = config
            .start_date
            .checked_add_days(Days::new(days_offset))
            .unwrap_or(config.end_date);
        let end = track.shifted_to(start).map_or(start, |moved| moved.end);

        *preview = Some(DragPreview {
            start,
            end,
            target_lane: layout::lane_at_y(config, y),
            x,
            y,
        });
        preview.as_ref()
    }

    /// Finish the drag. Commits when a preview exists, clamping the dates
    /// into the visible range; otherwise cancels. Always returns to `Idle`.
    pub fn drop_item(&mut self, config: &TimelineConfig) -> DragOutcome {
        let outcome = match *self {
            Self::Dragging {
                id,
                preview: Some(preview),
                ..
            } => {
                let start = preview.start.max(config.start_date).min(config.end_date);
                let end = preview.end.min(config.end_date);
                DragOutcome::Committed(DropCommit {
                    id,
                    start,
                    end,
                    target_lane: preview.target_lane,
                })
            }
            _ => DragOutcome::Cancelled,
        };
        *self = Self::Idle;
        outcome
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track::parse(5, "Design", "2021-03-01", "2021-03-11").expect("valid test dates")
    }

    #[test]
    fn hover_without_begin_is_ignored() {
        let mut drag = DragState::default();
        assert!(drag.hover(&track(), &TimelineConfig::default(), 10.0, 100.0, 30.0).is_none());
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn hover_computes_dates_and_lane() {
        let config = TimelineConfig::default();
        let mut drag = DragState::default();
        drag.begin(5, 0);
        let preview = drag
            .hover(&track(), &config, 10.0, 304.0, 130.0)
            .copied()
            .expect("preview while dragging");
        // round(30.4) = 30 days after Jan 1.
        assert_eq!(preview.start.to_string(), "2021-01-31");
        assert_eq!(preview.end.to_string(), "2021-02-10");
        assert_eq!(preview.target_lane, 2);
    }

    #[test]
    fn hover_matches_shifted_track() {
        let config = TimelineConfig::default();
        let milestone = Track::parse(5, "Launch", "2021-05-03", "2021-05-03").expect("valid");
        let mut drag = DragState::default();
        drag.begin(5, 1);
        let preview = drag
            .hover(&milestone, &config, 20.0, 200.0, 10.0)
            .copied()
            .expect("preview while dragging");
        let moved = milestone.shifted_to(preview.start).expect("in range");
        assert_eq!(preview.start.to_string(), "2021-01-11");
        assert_eq!(preview.end, moved.end);
        assert_eq!(preview.end, preview.start);
    }

    #[test]
    fn hover_left_of_range_snaps_to_start() {
        let config = TimelineConfig::default();
        let mut drag = DragState::default();
        drag.begin(5, 1);
        let preview = drag.hover(&track(), &config, 10.0, -80.0, -5.0).copied();
        assert_eq!(preview.map(|p| (p.start, p.target_lane)), Some((config.start_date, 0)));
    }

    #[test]
    fn hover_for_another_track_is_ignored() {
        let mut drag = DragState::default();
        drag.begin(99, 0);
        assert!(drag.hover(&track(), &TimelineConfig::default(), 10.0, 0.0, 0.0).is_none());
        assert!(drag.preview().is_none());
    }

    #[test]
    fn drop_without_preview_cancels() {
        let mut drag = DragState::default();
        drag.begin(5, 0);
        assert_eq!(drag.drop_item(&TimelineConfig::default()), DragOutcome::Cancelled);
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn drop_commits_and_clamps_to_range() {
        let config = TimelineConfig::default();
        let mut drag = DragState::default();
        drag.begin(5, 0);
        // Day 360 is Dec 27; the 10-day track would run past Dec 31.
        drag.hover(&track(), &config, 1.0, 360.0, 70.0);
        let DragOutcome::Committed(commit) = drag.drop_item(&config) else {
            panic!("expected a commit");
        };
        assert_eq!(commit.id, 5);
        assert_eq!(commit.start.to_string(), "2021-12-27");
        assert_eq!(commit.end, config.end_date);
        assert_eq!(commit.target_lane, 1);
        assert_eq!(drag.dragged_id(), None);
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut drag = DragState::default();
        drag.begin(5, 2);
        assert_eq!(drag.from_lane(), Some(2));
        drag.cancel();
        assert_eq!(drag, DragState::Idle);
    }
}
