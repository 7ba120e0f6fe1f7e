//! Pixel geometry for the timeline canvas: where tracks, lanes and month
//! labels go at a given scale, plus zoom helpers.

use chrono::{Datelike, Months, NaiveDate};

use crate::config::TimelineConfig;
use crate::model::Track;

/// Left edge of the first month label, so it doesn't sit flush against the
/// canvas edge.
const MIN_MONTH_LEFT: f64 = 20.0;

/// Horizontal extent of a track box in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBox {
    pub left: f64,
    pub width: f64,
}

impl ItemBox {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthMarker {
    pub date: NaiveDate,
    pub left: f64,
    pub label: String,
}

/// Signed day offset of `date` from the start of the visible range.
pub fn days_from_start(config: &TimelineConfig, date: NaiveDate) -> f64 {
    (date - config.start_date).num_days() as f64
}

/// Number of days between the first and last visible day.
pub fn total_days(config: &TimelineConfig) -> f64 {
    (config.end_date - config.start_date).num_days() as f64
}

pub fn timeline_width(config: &TimelineConfig, scale: f64) -> f64 {
    total_days(config) * scale
}

pub fn timeline_height(config: &TimelineConfig, visible_lanes: usize) -> f64 {
    visible_lanes as f64 * config.lane_height + config.extra_height
}

/// Box for `track` at `scale`. Both ends are inclusive, so a single-day
/// track is one day wide; boxes never shrink below `min_item_width`.
pub fn item_position(config: &TimelineConfig, track: &Track, scale: f64) -> ItemBox {
    let left = days_from_start(config, track.start) * scale;
    let width = track.span_days() as f64 * scale;
    ItemBox {
        left,
        width: width.max(config.min_item_width),
    }
}

pub fn lane_top(config: &TimelineConfig, lane: usize) -> f64 {
    lane as f64 * config.lane_height
}

/// Lane row under a vertical canvas offset. Offsets above the first lane
/// map to lane 0.
pub fn lane_at_y(config: &TimelineConfig, y: f64) -> usize {
    (y / config.lane_height).floor().max(0.0) as usize
}

/// Hue in degrees for a track. Successive ids land far apart on the color
/// wheel (137.5° is close to the golden angle).
pub fn track_hue(id: u64) -> u16 {
    ((id as f64 * 137.5) % 360.0) as u16
}

/// `2021-01-05` → `2021/01/05`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", format_date(start), format_date(end))
}

/// Human-readable zoom level: `3.7x`, `20x`, `120x`.
pub fn format_zoom_level(scale: f64) -> String {
    if scale < 10.0 {
        let rounded = (scale * 10.0).round() / 10.0;
        if rounded.fract() == 0.0 {
            format!("{rounded:.0}x")
        } else {
            format!("{rounded:.1}x")
        }
    } else if scale < 100.0 {
        format!("{:.0}x", scale.round())
    } else {
        format!("{:.0}0x", (scale / 10.0).round())
    }
}

/// Multiplier for one wheel notch. Scrolling down (positive delta) zooms
/// out; `fine` gives smaller steps.
pub fn zoom_factor(delta_y: f64, fine: bool) -> f64 {
    match (fine, delta_y > 0.0) {
        (true, true) => 0.95,
        (true, false) => 1.05,
        (false, true) => 0.85,
        (false, false) => 1.15,
    }
}

pub fn clamp_scale(config: &TimelineConfig, scale: f64) -> f64 {
    scale.clamp(config.min_scale, config.max_scale)
}

/// Scale at which the whole visible range fits in `container_width`.
pub fn optimal_scale(config: &TimelineConfig, container_width: f64) -> f64 {
    let days = total_days(config);
    if days <= 0.0 {
        return config.max_scale;
    }
    (container_width / days).max(config.min_scale)
}

/// One marker per month whose first day falls within the visible range,
/// plus the month containing `start_date`.
pub fn month_markers(config: &TimelineConfig, scale: f64) -> Vec<MonthMarker> {
    let mut markers = Vec::new();
    let mut date = config.start_date.with_day(1);
    while let Some(d) = date
        && d <= config.end_date
    {
        markers.push(MonthMarker {
            date: d,
            left: (days_from_start(config, d) * scale).max(MIN_MONTH_LEFT),
            label: d.format("%b %Y").to_string(),
        });
        date = d.checked_add_months(Months::new(1));
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TimelineConfig {
        TimelineConfig::default()
    }

    fn track(start: &str, end: &str) -> Track {
        Track::parse(1, "t", start, end).expect("valid test dates")
    }

    #[test]
    fn item_box_counts_both_ends() {
        let b = item_position(&config(), &track("2021-01-11", "2021-01-20"), 10.0);
        assert_eq!(b.left, 100.0);
        assert_eq!(b.width, 100.0);
        assert_eq!(b.right(), 200.0);
    }

    #[test]
    fn item_box_has_minimum_width() {
        let b = item_position(&config(), &track("2021-02-01", "2021-02-01"), 4.0);
        assert_eq!(b.width, 80.0);
    }

    #[test]
    fn lane_rows() {
        let c = config();
        assert_eq!(lane_top(&c, 3), 180.0);
        assert_eq!(lane_at_y(&c, 0.0), 0);
        assert_eq!(lane_at_y(&c, 59.9), 0);
        assert_eq!(lane_at_y(&c, 60.0), 1);
        assert_eq!(lane_at_y(&c, -25.0), 0);
        assert_eq!(lane_at_y(&c, 250.0), 4);
    }

    #[test]
    fn canvas_size() {
        let c = config();
        assert_eq!(total_days(&c), 364.0);
        assert_eq!(timeline_width(&c, 2.0), 728.0);
        assert_eq!(timeline_height(&c, 4), 340.0);
    }

    #[test]
    fn hues_spread_around_the_wheel() {
        assert_eq!(track_hue(0), 0);
        assert_eq!(track_hue(1), 137);
        assert_eq!(track_hue(2), 275);
        assert_eq!(track_hue(3), 52);
    }

    #[test]
    fn date_formatting() {
        let t = track("2021-01-05", "2021-02-10");
        assert_eq!(format_date(t.start), "2021/01/05");
        assert_eq!(format_date_range(t.start, t.end), "2021/01/05 - 2021/02/10");
    }

    #[test]
    fn zoom_level_labels() {
        assert_eq!(format_zoom_level(3.7), "3.7x");
        assert_eq!(format_zoom_level(5.0), "5x");
        assert_eq!(format_zoom_level(9.96), "10x");
        assert_eq!(format_zoom_level(20.4), "20x");
        assert_eq!(format_zoom_level(123.0), "120x");
    }

    #[test]
    fn wheel_zoom_factors() {
        assert_eq!(zoom_factor(1.0, false), 0.85);
        assert_eq!(zoom_factor(-1.0, false), 1.15);
        assert_eq!(zoom_factor(1.0, true), 0.95);
        assert_eq!(zoom_factor(-1.0, true), 1.05);
    }

    #[test]
    fn scale_is_clamped() {
        let c = config();
        assert_eq!(clamp_scale(&c, 1.0), 3.7);
        assert_eq!(clamp_scale(&c, 100.0), 32.0);
        assert_eq!(clamp_scale(&c, 12.0), 12.0);
    }

    #[test]
    fn fit_scale() {
        let c = config();
        assert!((optimal_scale(&c, 1456.0) - 4.0).abs() < 1e-9);
        assert_eq!(optimal_scale(&c, 100.0), 3.7);
    }

    #[test]
    fn twelve_months_in_default_range() {
        let markers = month_markers(&config(), 10.0);
        assert_eq!(markers.len(), 12);
        assert_eq!(markers[0].label, "Jan 2021");
        assert_eq!(markers[0].left, 20.0);
        assert_eq!(markers[1].label, "Feb 2021");
        assert_eq!(markers[1].left, 310.0);
        assert_eq!(markers[11].label, "Dec 2021");
    }
}
