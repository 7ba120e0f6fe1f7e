use std::io::{Stdout, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
};
use tracklane_core::views::header::{HEADER_HEIGHT, render_header};
use tracklane_core::views::timeline::render_timeline;
use tracklane_protocol::{RenderCommand, TextAlign, ThemeToken};

use crate::app::{App, CELL_HEIGHT, CELL_WIDTH, Mode};

fn theme_to_color(token: ThemeToken, dark: bool) -> Color {
    if let ThemeToken::TrackFill { hue } = token {
        let (r, g, b) = tracklane_protocol::Color::from_hsl(f32::from(hue), 0.7, 0.6).to_rgb8();
        return Color::Rgb(r, g, b);
    }
    if dark {
        match token {
            ThemeToken::Background | ThemeToken::LaneBackground => Color::Rgb(26, 26, 26),
            ThemeToken::LaneBorder | ThemeToken::HeaderBorder => Color::DarkGray,
            ThemeToken::HeaderBackground => Color::Rgb(45, 55, 72),
            ThemeToken::MonthLabel | ThemeToken::TextPrimary => Color::White,
            ThemeToken::TextMuted => Color::Gray,
            ThemeToken::TrackBorder => Color::Black,
            ThemeToken::TrackText => Color::Black,
            ThemeToken::DragGhost => Color::DarkGray,
            ThemeToken::DragPreviewBorder => Color::White,
            ThemeToken::SelectionHighlight => Color::LightBlue,
            ThemeToken::TrackFill { .. } => Color::Gray,
        }
    } else {
        match token {
            ThemeToken::Background | ThemeToken::LaneBackground => Color::White,
            ThemeToken::LaneBorder | ThemeToken::HeaderBorder => Color::Gray,
            ThemeToken::HeaderBackground => Color::Rgb(250, 251, 252),
            ThemeToken::MonthLabel | ThemeToken::TextPrimary => Color::Rgb(55, 65, 81),
            ThemeToken::TextMuted => Color::Rgb(107, 114, 128),
            ThemeToken::TrackBorder => Color::DarkGray,
            ThemeToken::TrackText => Color::Black,
            ThemeToken::DragGhost => Color::Gray,
            ThemeToken::DragPreviewBorder => Color::Black,
            ThemeToken::SelectionHighlight => Color::Blue,
            ThemeToken::TrackFill { .. } => Color::Gray,
        }
    }
}

/// Cell span `[c0, c1)` covering the pixel span `[from, from + len)`,
/// clipped to `0..limit`.
fn cell_span(from: f64, len: f64, cell: f64, limit: u16) -> (u16, u16) {
    let start = (from / cell).floor().max(0.0);
    let end = ((from + len) / cell).ceil().clamp(0.0, f64::from(limit));
    (start.min(f64::from(limit)) as u16, end as u16)
}

/// Rasterize lane-area commands into `area`, one cell per
/// `CELL_WIDTH` x `CELL_HEIGHT` logical pixels.
fn draw_commands(buf: &mut Buffer, area: Rect, cmds: &[RenderCommand], dark: bool) {
    let mut offset = (0.0, 0.0);
    let mut stack = Vec::new();

    for cmd in cmds {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                ..
            } => {
                let (c0, c1) = cell_span(rect.x + offset.0, rect.w, CELL_WIDTH, area.width);
                let (r0, r1) = cell_span(rect.y + offset.1, rect.h, CELL_HEIGHT, area.height);
                let bg = theme_to_color(*color, dark);
                let edge = match border_color {
                    Some(t @ (ThemeToken::SelectionHighlight | ThemeToken::DragPreviewBorder)) => {
                        Some(theme_to_color(*t, dark))
                    }
                    _ => None,
                };
                for row in r0..r1 {
                    for col in c0..c1 {
                        let cell = &mut buf[(area.x + col, area.y + row)];
                        cell.set_char(' ').set_bg(bg);
                        if let Some(fg) = edge {
                            if col == c0 {
                                cell.set_char('▌').set_fg(fg);
                            } else if col + 1 == c1 {
                                cell.set_char('▐').set_fg(fg);
                            }
                        }
                    }
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let row = ((position.y + offset.1) / CELL_HEIGHT).floor();
                if row < 0.0 || row >= f64::from(area.height) {
                    continue;
                }
                let len = text.chars().count() as f64;
                let anchor = ((position.x + offset.0) / CELL_WIDTH).floor();
                let start = match align {
                    TextAlign::Left => anchor,
                    TextAlign::Center => anchor - (len / 2.0).floor(),
                    TextAlign::Right => anchor - len,
                };
                put_text(buf, area, start, row as u16, text, theme_to_color(*color, dark));
            }
            RenderCommand::PushTransform { translate } => {
                stack.push(offset);
                offset = (offset.0 + translate.x, offset.1 + translate.y);
            }
            RenderCommand::PopTransform => {
                offset = stack.pop().unwrap_or((0.0, 0.0));
            }
            RenderCommand::DrawLine { .. }
            | RenderCommand::BeginGroup { .. }
            | RenderCommand::EndGroup => {}
        }
    }
}

/// Header commands all land on the single header row.
fn draw_header(buf: &mut Buffer, area: Rect, cmds: &[RenderCommand], dark: bool) {
    let bg = theme_to_color(ThemeToken::HeaderBackground, dark);
    for col in 0..area.width {
        buf[(area.x + col, area.y)].set_char(' ').set_bg(bg);
    }
    for cmd in cmds {
        if let RenderCommand::DrawText {
            position,
            text,
            color,
            align,
            ..
        } = cmd
        {
            let anchor = (position.x / CELL_WIDTH).floor();
            let start = match align {
                TextAlign::Right => anchor - text.chars().count() as f64,
                _ => anchor,
            };
            put_text(buf, area, start, 0, text, theme_to_color(*color, dark));
        }
    }
}

fn put_text(buf: &mut Buffer, area: Rect, start_col: f64, row: u16, text: &str, fg: Color) {
    for (i, ch) in text.chars().enumerate() {
        let col = start_col + i as f64;
        if col < 0.0 {
            continue;
        }
        if col >= f64::from(area.width) {
            break;
        }
        buf[(area.x + col as u16, area.y + row)].set_char(ch).set_fg(fg);
    }
}

fn status_line(app: &App) -> String {
    match &app.mode {
        Mode::Renaming { buffer } => format!(" rename: {buffer}_   (Enter save, Esc cancel)"),
        Mode::Moving { .. } => format!(" {}", app.status),
        Mode::Browse => {
            let name = app
                .selected
                .and_then(|id| app.ctl.track(id))
                .map_or("-", |t| t.name.as_str());
            format!(
                " tracklane: {} tracks, {} lanes | [{name}] | ←→ scroll  +/- zoom  f fit  Tab select  m move  r rename  d dark  q quit | {}",
                app.ctl.tracks().len(),
                app.ctl.assignment().lane_count(),
                app.status
            )
        }
    }
}

/// Run the interactive timeline until the user quits. The terminal is
/// restored even when the event loop fails.
pub fn run(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Header row on top, status row at the bottom.
    const LANES_TOP: u16 = 1;

    while !app.quit {
        let size = terminal.size()?;
        let lane_rows = size.height.saturating_sub(2);
        let width_px = f64::from(size.width) * CELL_WIDTH;
        let height_px = f64::from(lane_rows) * CELL_HEIGHT;

        let dark = app.ctl.is_dark_mode();
        let header = render_header(
            app.ctl.config(),
            app.ctl.scale(),
            &app.ctl.viewport(width_px, HEADER_HEIGHT),
        );
        let lanes = render_timeline(
            &app.ctl,
            &app.ctl.viewport(width_px, height_px),
            app.selected,
        );
        let status = status_line(app);

        terminal.draw(|frame| {
            let area = frame.area();
            let header_area = Rect::new(0, 0, area.width, area.height.min(1));
            let lanes_area = Rect::new(0, LANES_TOP, area.width, lane_rows);
            let status_area = Rect::new(0, area.height.saturating_sub(1), area.width, 1);

            let buf = frame.buffer_mut();
            if header_area.height > 0 {
                draw_header(buf, header_area, &header, dark);
            }
            draw_commands(buf, lanes_area, &lanes, dark);

            let style = Style::default().fg(Color::White).bg(Color::DarkGray);
            frame.render_widget(Paragraph::new(status).style(style), status_area);
        })?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, width_px);
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse, LANES_TOP),
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracklane_protocol::{Point, Rect as PxRect};

    #[test]
    fn cell_span_clips_to_area() {
        assert_eq!(cell_span(6.0, 48.0, CELL_HEIGHT, 10), (0, 3));
        assert_eq!(cell_span(-20.0, 40.0, CELL_WIDTH, 10), (0, 3));
        assert_eq!(cell_span(60.0, 100.0, CELL_WIDTH, 10), (7, 10));
    }

    #[test]
    fn rasterizes_track_box_and_label() {
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        let cmds = vec![
            RenderCommand::DrawRect {
                rect: PxRect::new(16.0, 6.0, 80.0, 48.0),
                color: ThemeToken::TrackFill { hue: 120 },
                border_color: None,
                label: None,
                track_id: Some(1),
            },
            RenderCommand::DrawText {
                position: Point::new(24.0, 23.0),
                text: "Build".into(),
                color: ThemeToken::TrackText,
                font_size: 13.0,
                align: TextAlign::Left,
            },
        ];
        draw_commands(&mut buf, area, &cmds, false);
        let row: String = (3..8).map(|x| buf[(x, 1)].symbol().to_owned()).collect();
        assert_eq!(row, "Build");
        assert!(matches!(buf[(2, 0)].bg, Color::Rgb(..)));
        assert_eq!(buf[(13, 0)].bg, Color::Reset);
    }
}
