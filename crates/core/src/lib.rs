//! Core of tracklane: lane assignment for date-ranged tracks, timeline
//! geometry, interaction state, and render-command views.

pub mod config;
pub mod controller;
pub mod interaction;
pub mod lanes;
pub mod layout;
pub mod loader;
pub mod model;
pub mod svg;
pub mod views;

pub use config::{ConfigError, TimelineConfig};
pub use controller::TimelineController;
pub use lanes::{ForcedPositions, LaneAssignment, assign_lanes, can_fit, overlaps};
pub use loader::{LoadError, load_tracks};
pub use model::{Interval, Track, TrackError, TrackId};
