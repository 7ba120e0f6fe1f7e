//! Stateless wasm-bindgen bridge. Every call takes the items (and saved
//! forced positions) as JSON, so the host page owns all state.

use serde::Serialize;
use tracklane_core::svg::render_timeline_svg;
use tracklane_core::views::header::HEADER_HEIGHT;
use tracklane_core::views::timeline::render_timeline;
use tracklane_core::{
    ForcedPositions, LoadError, TimelineConfig, TimelineController, TrackId, load_tracks,
};
use wasm_bindgen::prelude::*;

#[derive(Debug, thiserror::Error)]
enum BridgeError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("invalid forced positions: {0}")]
    Forced(#[source] serde_json::Error),
    #[error("forced lane {lane} for track {id} is out of range (limit {limit})")]
    ForcedLaneOutOfRange {
        id: TrackId,
        lane: usize,
        limit: usize,
    },
    #[error("serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn to_js(err: BridgeError) -> JsError {
    JsError::new(&err.to_string())
}

/// Forced positions as a JSON object of `{"<id>": lane}`. Blank input means
/// none.
fn parse_forced(forced_json: &str) -> Result<ForcedPositions, BridgeError> {
    if forced_json.trim().is_empty() {
        return Ok(ForcedPositions::new());
    }
    serde_json::from_str(forced_json).map_err(BridgeError::Forced)
}

fn controller(items_json: &str, forced_json: &str) -> Result<TimelineController, BridgeError> {
    let tracks = load_tracks(items_json.as_bytes())?;
    let forced = parse_forced(forced_json)?;
    let config = TimelineConfig::default();
    // Every pin can land in a lane of its own plus the always-shown rows.
    let limit = tracks.len() + config.min_visible_lanes;
    if let Some((&id, &lane)) = forced.iter().find(|&(_, &lane)| lane >= limit) {
        return Err(BridgeError::ForcedLaneOutOfRange { id, lane, limit });
    }
    Ok(TimelineController::new(config, tracks).with_forced_positions(forced))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LaneSummary {
    item_lane_map: std::collections::BTreeMap<TrackId, usize>,
    lane_count: usize,
    visible_lanes: usize,
}

fn assign_lanes_json(items_json: &str, forced_json: &str) -> Result<String, BridgeError> {
    let ctl = controller(items_json, forced_json)?;
    let assignment = ctl.assignment();
    let summary = LaneSummary {
        lane_count: assignment.lane_count(),
        visible_lanes: assignment.visible_lane_count(ctl.config().min_visible_lanes),
        item_lane_map: assignment.item_lane_map,
    };
    serde_json::to_string(&summary).map_err(BridgeError::Serialize)
}

fn render_svg_string(
    items_json: &str,
    forced_json: &str,
    scale: f64,
    dark: bool,
) -> Result<String, BridgeError> {
    let mut ctl = controller(items_json, forced_json)?;
    ctl.set_scale(scale);
    if dark {
        ctl.toggle_dark_mode();
    }
    let (width, height) = ctl.canvas_size();
    Ok(render_timeline_svg(&ctl, width, HEADER_HEIGHT + height))
}

fn render_view_json(
    items_json: &str,
    forced_json: &str,
    scale: f64,
    scroll_x: f64,
    width: f64,
    height: f64,
    selected: Option<TrackId>,
) -> Result<String, BridgeError> {
    let mut ctl = controller(items_json, forced_json)?;
    ctl.set_scale(scale);
    ctl.scroll_by(scroll_x);
    let commands = render_timeline(&ctl, &ctl.viewport(width, height), selected);
    serde_json::to_string(&commands).map_err(BridgeError::Serialize)
}

/// Lay out `items_json` and return `{itemLaneMap, laneCount, visibleLanes}`.
#[wasm_bindgen]
pub fn assign_lanes(items_json: &str, forced_json: &str) -> Result<String, JsError> {
    assign_lanes_json(items_json, forced_json).map_err(to_js)
}

/// Render the whole timeline at `scale` as a standalone SVG document.
#[wasm_bindgen]
pub fn render_svg(
    items_json: &str,
    forced_json: &str,
    scale: f64,
    dark: bool,
) -> Result<String, JsError> {
    render_svg_string(items_json, forced_json, scale, dark).map_err(to_js)
}

/// Render the lane area visible in a `width` x `height` window as render
/// commands (JSON).
#[wasm_bindgen]
pub fn render_view(
    items_json: &str,
    forced_json: &str,
    scale: f64,
    scroll_x: f64,
    width: f64,
    height: f64,
    selected: Option<u64>,
) -> Result<String, JsError> {
    render_view_json(items_json, forced_json, scale, scroll_x, width, height, selected)
        .map_err(to_js)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEMS: &str = r#"[
        {"id": 1, "name": "Research", "start": "2021-01-01", "end": "2021-01-10"},
        {"id": 2, "name": "Prototype", "start": "2021-01-05", "end": "2021-01-15"},
        {"id": 3, "name": "Review", "start": "2021-01-20", "end": "2021-01-25"}
    ]"#;

    #[test]
    fn assigns_with_and_without_forced() {
        let json: serde_json::Value =
            serde_json::from_str(&assign_lanes_json(ITEMS, "").expect("assigned")).expect("json");
        assert_eq!(json["itemLaneMap"]["2"], 1);
        assert_eq!(json["laneCount"], 2);
        assert_eq!(json["visibleLanes"], 4);

        let json: serde_json::Value =
            serde_json::from_str(&assign_lanes_json(ITEMS, r#"{"3": 3}"#).expect("assigned"))
                .expect("json");
        assert_eq!(json["itemLaneMap"]["3"], 3);
        assert_eq!(json["laneCount"], 4);
    }

    #[test]
    fn reports_bad_input() {
        assert!(matches!(
            assign_lanes_json("{", ""),
            Err(BridgeError::Load(_))
        ));
        assert!(matches!(
            assign_lanes_json(ITEMS, "[1]"),
            Err(BridgeError::Forced(_))
        ));
        assert!(matches!(
            assign_lanes_json(ITEMS, r#"{"1": 18446744073709551615}"#),
            Err(BridgeError::ForcedLaneOutOfRange { id: 1, limit: 7, .. })
        ));
        assert!(matches!(
            assign_lanes_json(ITEMS, r#"{"2": 7}"#),
            Err(BridgeError::ForcedLaneOutOfRange { id: 2, lane: 7, .. })
        ));
        assert!(assign_lanes_json(ITEMS, r#"{"2": 6}"#).is_ok());
    }

    #[test]
    fn svg_and_view() {
        let svg = render_svg_string(ITEMS, "", 10.0, true).expect("rendered");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Prototype"));

        let view = render_view_json(ITEMS, "", 10.0, 0.0, 800.0, 240.0, Some(2)).expect("rendered");
        assert!(view.contains("Research"));
    }
}
