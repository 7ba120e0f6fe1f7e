use tracklane_protocol::{Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken, Viewport};

use crate::controller::TimelineController;
use crate::interaction::DragPreview;
use crate::layout;
use crate::model::{Track, TrackId};

/// Vertical inset of a track box inside its lane.
const ITEM_MARGIN: f64 = 6.0;
const NAME_FONT_SIZE: f64 = 13.0;
const DATE_FONT_SIZE: f64 = 10.0;
const TEXT_INSET: f64 = 8.0;
/// Below this width only the name is drawn.
const MIN_DATE_LABEL_WIDTH: f64 = 90.0;

/// Render the lane area: lane backgrounds, then every track in its lane.
///
/// Commands are in viewport coordinates (`viewport.x` is the horizontal
/// scroll). While a drag is in progress the dragged track is drawn as a
/// ghost at its current lane and again at the preview position.
pub fn render_timeline(
    ctl: &TimelineController,
    viewport: &Viewport,
    selected: Option<TrackId>,
) -> Vec<RenderCommand> {
    let config = ctl.config();
    let scale = ctl.scale();
    let assignment = ctl.assignment();
    let lanes = assignment.visible_lane_count(config.min_visible_lanes);
    let canvas_width = layout::timeline_width(config, scale);

    let mut commands = Vec::with_capacity(lanes + ctl.tracks().len() * 3 + 8);
    commands.push(RenderCommand::BeginGroup {
        id: "lanes".into(),
        label: Some("Lanes".into()),
    });

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, viewport.width, viewport.height),
        color: ThemeToken::Background,
        border_color: None,
        label: None,
        track_id: None,
    });

    let lane_width = (canvas_width - viewport.x).min(viewport.width).max(0.0);
    for lane in 0..lanes {
        let y = layout::lane_top(config, lane) - viewport.y;
        if y >= viewport.height || y + config.lane_height <= 0.0 {
            continue;
        }
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(0.0, y, lane_width, config.lane_height),
            color: ThemeToken::LaneBackground,
            border_color: Some(ThemeToken::LaneBorder),
            label: None,
            track_id: None,
        });
    }

    let dragged = ctl.drag().dragged_id();
    for track in ctl.tracks() {
        let Some(lane) = assignment.lane_of(track.id) else {
            continue;
        };
        let style = if dragged == Some(track.id) {
            BoxStyle::Ghost
        } else if selected == Some(track.id) {
            BoxStyle::Selected
        } else {
            BoxStyle::Normal
        };
        let b = layout::item_position(config, track, scale);
        let y = layout::lane_top(config, lane);
        push_track_box(
            &mut commands,
            viewport,
            track,
            (b.left, y, b.width),
            config.lane_height,
            style,
            &layout::format_date_range(track.start, track.end),
        );
    }

    if let (Some(id), Some(preview)) = (dragged, ctl.drag().preview())
        && let Some(track) = ctl.track(id)
    {
        push_preview(&mut commands, ctl, viewport, track, preview);
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoxStyle {
    Normal,
    Selected,
    Ghost,
    Preview,
}

fn push_preview(
    commands: &mut Vec<RenderCommand>,
    ctl: &TimelineController,
    viewport: &Viewport,
    track: &Track,
    preview: &DragPreview,
) {
    let config = ctl.config();
    let b = layout::item_position(config, track, ctl.scale());
    // The preview follows the pointer horizontally and snaps to its lane.
    let y = layout::lane_top(config, preview.target_lane);
    push_track_box(
        commands,
        viewport,
        track,
        (preview.x, y, b.width),
        config.lane_height,
        BoxStyle::Preview,
        &layout::format_date_range(preview.start, preview.end),
    );
}

/// `geometry` is `(left, top, width)` in canvas coordinates.
fn push_track_box(
    commands: &mut Vec<RenderCommand>,
    viewport: &Viewport,
    track: &Track,
    geometry: (f64, f64, f64),
    lane_height: f64,
    style: BoxStyle,
    date_label: &str,
) {
    let (left, top, width) = geometry;
    if !viewport.overlaps_x(left, left + width) {
        return;
    }
    let x = left - viewport.x;
    let y = top - viewport.y + ITEM_MARGIN;
    let h = lane_height - 2.0 * ITEM_MARGIN;
    if y >= viewport.height || y + h <= 0.0 {
        return;
    }

    let hue = layout::track_hue(track.id);
    let (color, border) = match style {
        BoxStyle::Normal => (ThemeToken::TrackFill { hue }, ThemeToken::TrackBorder),
        BoxStyle::Selected => (ThemeToken::TrackFill { hue }, ThemeToken::SelectionHighlight),
        BoxStyle::Ghost => (ThemeToken::DragGhost, ThemeToken::TrackBorder),
        BoxStyle::Preview => (ThemeToken::TrackFill { hue }, ThemeToken::DragPreviewBorder),
    };
    let name = SharedStr::from(track.name.as_str());

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(x, y, width, h),
        color,
        border_color: Some(border),
        label: Some(name.clone()),
        track_id: (style != BoxStyle::Preview).then_some(track.id),
    });

    // Keep the text inside the visible part of the box.
    let text_x = x.max(0.0) + TEXT_INSET;
    if text_x >= x + width {
        return;
    }
    let text_color = if style == BoxStyle::Ghost {
        ThemeToken::TextMuted
    } else {
        ThemeToken::TrackText
    };
    commands.push(RenderCommand::DrawText {
        position: Point::new(text_x, y + NAME_FONT_SIZE + 4.0),
        text: name,
        color: text_color,
        font_size: NAME_FONT_SIZE,
        align: TextAlign::Left,
    });
    if x + width - text_x >= MIN_DATE_LABEL_WIDTH {
        commands.push(RenderCommand::DrawText {
            position: Point::new(text_x, y + h - 6.0),
            text: SharedStr::from(date_label),
            color: text_color,
            font_size: DATE_FONT_SIZE,
            align: TextAlign::Left,
        });
    }
}
