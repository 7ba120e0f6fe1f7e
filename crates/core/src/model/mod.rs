pub mod track;

pub use track::{Interval, Track, TrackError, TrackId};
