//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::borrow::Cow;

use tracklane_protocol::{Point, RenderCommand, TextAlign, ThemeToken};

use crate::controller::TimelineController;
use crate::views::header::{HEADER_HEIGHT, render_header};
use crate::views::timeline::render_timeline;

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:-apple-system,system-ui,sans-serif;font-size:12px">"#,
    ));

    let bg = resolve_color(ThemeToken::Background, dark);
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#,
    ));

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                ..
            } => {
                let fill = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" rx="4""#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                if let Some(border) = border_color {
                    let stroke = resolve_color(*border, dark);
                    svg.push_str(&format!(r#" stroke="{stroke}""#));
                }
                svg.push('>');
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
                svg.push_str("</rect>");
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                ));
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let fill = resolve_color(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}" style="pointer-events:none">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                ));
            }
            RenderCommand::PushTransform { translate } => {
                svg.push_str(&format!(
                    r#"<g transform="translate({},{})">"#,
                    translate.x, translate.y
                ));
            }
            RenderCommand::PopTransform => svg.push_str("</g>"),
            // Groups carry no styling in static SVG output
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Render the header and lane area of `ctl` as one SVG document of the
/// given size (header on top).
pub fn render_timeline_svg(ctl: &TimelineController, width: f64, height: f64) -> String {
    let lanes_height = (height - HEADER_HEIGHT).max(0.0);
    let viewport = ctl.viewport(width, lanes_height);

    let header_viewport = ctl.viewport(width, HEADER_HEIGHT);
    let mut commands = render_header(ctl.config(), ctl.scale(), &header_viewport);
    commands.push(RenderCommand::PushTransform {
        translate: Point::new(0.0, HEADER_HEIGHT),
    });
    commands.extend(render_timeline(ctl, &viewport, None));
    commands.push(RenderCommand::PopTransform);

    render_svg(&commands, width, height, ctl.is_dark_mode())
}

fn resolve_color(token: ThemeToken, dark: bool) -> Cow<'static, str> {
    if let ThemeToken::TrackFill { hue } = token {
        return Cow::Owned(format!("hsl({hue}, 70%, 60%)"));
    }
    let hex = if dark {
        match token {
            ThemeToken::Background | ThemeToken::LaneBackground => "#1a1a1a",
            ThemeToken::LaneBorder | ThemeToken::HeaderBorder => "#4a5568",
            ThemeToken::HeaderBackground => "#2d3748",
            ThemeToken::MonthLabel | ThemeToken::TextPrimary => "#e2e8f0",
            ThemeToken::TextMuted => "#a0aec0",
            ThemeToken::TrackBorder => "#00000033",
            ThemeToken::TrackText => "#ffffff",
            ThemeToken::DragGhost => "#4a556880",
            ThemeToken::DragPreviewBorder => "#ffffffcc",
            ThemeToken::SelectionHighlight => "#90cdf4",
            ThemeToken::TrackFill { .. } => "#616161",
        }
    } else {
        match token {
            ThemeToken::Background | ThemeToken::LaneBackground => "#ffffff",
            ThemeToken::LaneBorder => "#e5e7eb",
            ThemeToken::HeaderBorder => "#e1e5e9",
            ThemeToken::HeaderBackground => "#fafbfc",
            ThemeToken::MonthLabel | ThemeToken::TextPrimary => "#374151",
            ThemeToken::TextMuted => "#6b7280",
            ThemeToken::TrackBorder => "#0000001a",
            ThemeToken::TrackText => "#ffffff",
            ThemeToken::DragGhost => "#d1d5db80",
            ThemeToken::DragPreviewBorder => "#ffffffcc",
            ThemeToken::SelectionHighlight => "#0369a1",
            ThemeToken::TrackFill { .. } => "#999999",
        }
    };
    Cow::Borrowed(hex)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineConfig;
    use crate::model::Track;
    use tracklane_protocol::Rect;

    #[test]
    fn basic_svg_output() {
        let commands = vec![RenderCommand::DrawRect {
            rect: Rect::new(10.0, 20.0, 100.0, 48.0),
            color: ThemeToken::TrackFill { hue: 137 },
            border_color: None,
            label: Some("Kickoff".into()),
            track_id: Some(1),
        }];
        let svg = render_svg(&commands, 800.0, 400.0, false);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("<title>Kickoff</title>"));
        assert!(svg.contains("hsl(137, 70%, 60%)"));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(0.0, 12.0),
            text: "R&D <phase 2>".into(),
            color: ThemeToken::TrackText,
            font_size: 12.0,
            align: TextAlign::Left,
        }];
        let svg = render_svg(&commands, 400.0, 100.0, true);
        assert!(svg.contains("R&amp;D &lt;phase 2&gt;"));
    }

    #[test]
    fn full_document_nests_lanes_under_header() {
        let tracks = vec![Track::parse(1, "Kickoff", "2021-01-01", "2021-01-05").expect("valid")];
        let mut ctl = TimelineController::new(TimelineConfig::default(), tracks);
        ctl.toggle_dark_mode();
        let svg = render_timeline_svg(&ctl, 1000.0, 400.0);
        assert!(svg.contains(&format!(r#"<g transform="translate(0,{HEADER_HEIGHT})">"#)));
        assert!(svg.contains("Jan 2021"));
        assert!(svg.contains("Kickoff"));
        assert!(svg.contains("#1a1a1a"));
        assert_eq!(svg.matches("<g ").count(), svg.matches("</g>").count());
    }
}
