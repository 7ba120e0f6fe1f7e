use tracklane_protocol::{Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken, Viewport};

use crate::config::TimelineConfig;
use crate::layout;

pub const HEADER_HEIGHT: f64 = 32.0;
const FONT_SIZE: f64 = 11.0;
const TICK_HEIGHT: f64 = 8.0;

/// Render the month scale above the lanes, plus the current zoom level at
/// the right edge.
///
/// Month labels scroll with the lanes (`viewport.x`); the zoom label does
/// not.
pub fn render_header(
    config: &TimelineConfig,
    scale: f64,
    viewport: &Viewport,
) -> Vec<RenderCommand> {
    let markers = layout::month_markers(config, scale);
    let mut commands = Vec::with_capacity(markers.len() * 2 + 5);

    commands.push(RenderCommand::BeginGroup {
        id: "header".into(),
        label: Some("Months".into()),
    });

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, viewport.width, HEADER_HEIGHT),
        color: ThemeToken::HeaderBackground,
        border_color: Some(ThemeToken::HeaderBorder),
        label: None,
        track_id: None,
    });

    for marker in &markers {
        let x = marker.left - viewport.x;
        if x < 0.0 || x > viewport.width {
            continue;
        }
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, HEADER_HEIGHT - TICK_HEIGHT),
            to: Point::new(x, HEADER_HEIGHT),
            color: ThemeToken::HeaderBorder,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x + 4.0, HEADER_HEIGHT / 2.0 + FONT_SIZE / 2.0 - 2.0),
            text: SharedStr::from(marker.label.as_str()),
            color: ThemeToken::MonthLabel,
            font_size: FONT_SIZE,
            align: TextAlign::Left,
        });
    }

    commands.push(RenderCommand::DrawText {
        position: Point::new(viewport.width - 8.0, HEADER_HEIGHT / 2.0 + FONT_SIZE / 2.0 - 2.0),
        text: layout::format_zoom_level(scale).into(),
        color: ThemeToken::TextMuted,
        font_size: FONT_SIZE,
        align: TextAlign::Right,
    });

    commands.push(RenderCommand::EndGroup);
    commands
}
