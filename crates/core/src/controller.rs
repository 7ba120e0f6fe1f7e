use tracing::debug;
use tracklane_protocol::Viewport;

use crate::config::TimelineConfig;
use crate::interaction::{DragOutcome, DragState, DropCommit, PanState};
use crate::lanes::{ForcedPositions, LaneAssignment, assign_lanes};
use crate::layout;
use crate::model::{Track, TrackId};

/// Single owner of the interactive timeline state.
///
/// Holds the tracks, the forced lane positions produced by drops, and the
/// view state (scale, scroll, theme, in-progress drag or pan). Lane
/// assignment is recomputed from scratch on every [`Self::assignment`]
/// call; nothing is cached between edits.
///
/// Pointer coordinates passed to the interaction methods are relative to
/// the visible lane area: `x` from its left edge (before scrolling), `y`
/// from the top of lane 0.
#[derive(Debug, Clone)]
pub struct TimelineController {
    config: TimelineConfig,
    tracks: Vec<Track>,
    forced: ForcedPositions,
    scale: f64,
    scroll_x: f64,
    dark_mode: bool,
    drag: DragState,
    pan: PanState,
}

impl TimelineController {
    pub fn new(config: TimelineConfig, tracks: Vec<Track>) -> Self {
        let scale = layout::clamp_scale(&config, config.initial_scale);
        Self {
            config,
            tracks,
            forced: ForcedPositions::new(),
            scale,
            scroll_x: 0.0,
            dark_mode: false,
            drag: DragState::Idle,
            pan: PanState::Idle,
        }
    }

    /// Start from previously saved forced positions instead of none.
    pub fn with_forced_positions(mut self, forced: ForcedPositions) -> Self {
        self.forced = forced;
        self
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn forced_positions(&self) -> &ForcedPositions {
        &self.forced
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_panning()
    }

    pub fn assignment(&self) -> LaneAssignment<'_, Track> {
        assign_lanes(&self.tracks, &self.forced)
    }

    pub fn lane_of(&self, id: TrackId) -> Option<usize> {
        self.assignment().lane_of(id)
    }

    /// Lane rows to draw, including the configured minimum.
    pub fn visible_lanes(&self) -> usize {
        self.assignment().visible_lane_count(self.config.min_visible_lanes)
    }

    /// Full canvas size `(width, height)` at the current scale.
    pub fn canvas_size(&self) -> (f64, f64) {
        (
            layout::timeline_width(&self.config, self.scale),
            layout::timeline_height(&self.config, self.visible_lanes()),
        )
    }

    /// A viewport of the given size scrolled to the current offset.
    pub fn viewport(&self, width: f64, height: f64) -> Viewport {
        Viewport {
            x: self.scroll_x,
            ..Viewport::new(width, height)
        }
    }

    /// Track drawn under the pointer, if any. Later tracks win where boxes
    /// overlap, matching draw order.
    pub fn track_at(&self, x: f64, y: f64) -> Option<TrackId> {
        if y < 0.0 {
            return None;
        }
        let canvas_x = x + self.scroll_x;
        let lane = layout::lane_at_y(&self.config, y);
        let assignment = self.assignment();
        self.tracks
            .iter()
            .rev()
            .find(|t| {
                let b = layout::item_position(&self.config, t, self.scale);
                assignment.lane_of(t.id) == Some(lane)
                    && canvas_x >= b.left
                    && canvas_x < b.right()
            })
            .map(|t| t.id)
    }

    /// Rename a track. Returns `false` if the id is unknown.
    pub fn edit_name(&mut self, id: TrackId, name: impl Into<String>) -> bool {
        match self.tracks.iter_mut().find(|t| t.id == id) {
            Some(track) => {
                track.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Start dragging `id` from its current lane. Returns `false` if the id
    /// is unknown.
    pub fn begin_drag(&mut self, id: TrackId) -> bool {
        let Some(from_lane) = self.lane_of(id) else {
            return false;
        };
        self.pan.end();
        self.drag.begin(id, from_lane);
        debug!(id, from_lane, "drag started");
        true
    }

    /// Move the drag preview to the pointer.
    pub fn drag_over(&mut self, x: f64, y: f64) {
        let Some(id) = self.drag.dragged_id() else {
            return;
        };
        let Some(track) = self.tracks.iter().find(|t| t.id == id) else {
            self.drag.cancel();
            return;
        };
        let canvas_x = x + self.scroll_x;
        self.drag.hover(track, &self.config, self.scale, canvas_x, y);
    }

    /// Drop the dragged track at its preview position: its dates move and
    /// its target lane is recorded as a forced position. Returns `None` if
    /// nothing was being dragged or no preview existed.
    pub fn drop_drag(&mut self) -> Option<DropCommit> {
        let DragOutcome::Committed(commit) = self.drag.drop_item(&self.config) else {
            return None;
        };
        let track = self.tracks.iter_mut().find(|t| t.id == commit.id)?;
        track.start = commit.start;
        track.end = commit.end;
        self.forced.insert(commit.id, commit.target_lane);
        debug!(
            id = commit.id,
            lane = commit.target_lane,
            start = %commit.start,
            end = %commit.end,
            "drop committed"
        );
        Some(commit)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Wheel zoom keeping the day under `mouse_x` fixed on screen.
    pub fn zoom_wheel(&mut self, delta_y: f64, fine: bool, mouse_x: f64) {
        let old = self.scale;
        let new = layout::clamp_scale(&self.config, old * layout::zoom_factor(delta_y, fine));
        let ratio = new / old;
        self.scale = new;
        self.scroll_x = (mouse_x * ratio - mouse_x + self.scroll_x * ratio).max(0.0);
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale * 1.5);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale / 1.5);
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = layout::clamp_scale(&self.config, scale);
    }

    /// Fit the whole range into `container_width` and scroll to the start.
    pub fn zoom_to_fit(&mut self, container_width: f64) {
        self.scale = layout::optimal_scale(&self.config, container_width);
        self.scroll_x = 0.0;
    }

    /// Start panning unless the pointer is over a track (tracks are dragged,
    /// not panned). Returns whether panning started.
    pub fn begin_pan(&mut self, x: f64, y: f64) -> bool {
        if self.track_at(x, y).is_some() {
            return false;
        }
        self.pan.begin(x, self.scroll_x);
        true
    }

    pub fn pan_to(&mut self, x: f64) {
        if let Some(scroll) = self.pan.drag_to(x) {
            self.scroll_x = scroll;
        }
    }

    pub fn end_pan(&mut self) {
        self.pan.end();
    }

    pub fn scroll_by(&mut self, dx: f64) {
        self.scroll_x = (self.scroll_x + dx).max(0.0);
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }
}
