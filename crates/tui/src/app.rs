use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracklane_core::{TimelineController, TrackId, layout};

/// Logical pixels per terminal column.
pub const CELL_WIDTH: f64 = 8.0;
/// Logical pixels per terminal row. The default lane height (60) spans
/// three rows.
pub const CELL_HEIGHT: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browse,
    /// Keyboard drag: a virtual pointer in lane-area pixels.
    Moving { x: f64, y: f64 },
    Renaming { buffer: String },
}

pub struct App {
    pub ctl: TimelineController,
    pub selected: Option<TrackId>,
    pub mode: Mode,
    pub status: String,
    pub quit: bool,
}

impl App {
    pub fn new(ctl: TimelineController) -> Self {
        let mut app = Self {
            ctl,
            selected: None,
            mode: Mode::Browse,
            status: String::new(),
            quit: false,
        };
        app.select_step(1);
        app
    }

    /// `view_width` is the lane area width in logical pixels.
    pub fn handle_key(&mut self, key: KeyEvent, view_width: f64) {
        match &mut self.mode {
            Mode::Browse => self.browse_key(key, view_width),
            Mode::Moving { x, y } => {
                let (mut px, mut py) = (*x, *y);
                let scale = self.ctl.scale();
                let lane_height = self.ctl.config().lane_height;
                match key.code {
                    KeyCode::Left => px -= scale,
                    KeyCode::Right => px += scale,
                    KeyCode::Up => py = (py - lane_height).max(lane_height / 2.0),
                    KeyCode::Down => py += lane_height,
                    KeyCode::Enter => {
                        self.mode = Mode::Browse;
                        self.status = match self.ctl.drop_drag() {
                            Some(commit) => format!(
                                "Dropped on lane {} ({})",
                                commit.target_lane,
                                layout::format_date_range(commit.start, commit.end)
                            ),
                            None => "Move cancelled".to_owned(),
                        };
                        return;
                    }
                    KeyCode::Esc => {
                        self.ctl.cancel_drag();
                        self.mode = Mode::Browse;
                        self.status = "Move cancelled".to_owned();
                        return;
                    }
                    _ => return,
                }
                self.mode = Mode::Moving { x: px, y: py };
                self.ctl.drag_over(px, py);
            }
            Mode::Renaming { buffer } => match key.code {
                KeyCode::Char(c) => buffer.push(c),
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Enter => {
                    let name = std::mem::take(buffer);
                    if let Some(id) = self.selected
                        && self.ctl.edit_name(id, name)
                    {
                        self.status = "Renamed".to_owned();
                    }
                    self.mode = Mode::Browse;
                }
                KeyCode::Esc => self.mode = Mode::Browse,
                _ => {}
            },
        }
    }

    fn browse_key(&mut self, key: KeyEvent, view_width: f64) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Left => self.ctl.scroll_by(-view_width * 0.1),
            KeyCode::Right => self.ctl.scroll_by(view_width * 0.1),
            KeyCode::Char('+') | KeyCode::Char('=') => self.ctl.zoom_in(),
            KeyCode::Char('-') => self.ctl.zoom_out(),
            KeyCode::Char('f') => self.ctl.zoom_to_fit(view_width),
            KeyCode::Char('d') => self.ctl.toggle_dark_mode(),
            KeyCode::Tab => self.select_step(1),
            KeyCode::BackTab => self.select_step(-1),
            KeyCode::Char('m') | KeyCode::Enter => self.begin_move(),
            KeyCode::Char('r') => {
                if let Some(track) = self.selected.and_then(|id| self.ctl.track(id)) {
                    self.mode = Mode::Renaming {
                        buffer: track.name.clone(),
                    };
                }
            }
            _ => {}
        }
    }

    /// `top_row` is the first terminal row of the lane area.
    pub fn handle_mouse(&mut self, event: MouseEvent, top_row: u16) {
        if self.mode != Mode::Browse || event.row < top_row {
            return;
        }
        let x = f64::from(event.column) * CELL_WIDTH;
        let y = f64::from(event.row - top_row) * CELL_HEIGHT;
        let dragging = self.ctl.drag().dragged_id().is_some();

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(id) = self.ctl.track_at(x, y) {
                    self.selected = Some(id);
                    self.ctl.begin_drag(id);
                } else {
                    self.ctl.begin_pan(x, y);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if dragging {
                    self.ctl.drag_over(x, y);
                } else {
                    self.ctl.pan_to(x);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if dragging {
                    // A click without movement has no preview and only selects.
                    if let Some(commit) = self.ctl.drop_drag() {
                        self.status = format!("Dropped on lane {}", commit.target_lane);
                    }
                } else {
                    self.ctl.end_pan();
                }
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                let delta = if event.kind == MouseEventKind::ScrollDown {
                    1.0
                } else {
                    -1.0
                };
                let fine = event.modifiers.contains(KeyModifiers::CONTROL);
                self.ctl.zoom_wheel(delta, fine, x);
            }
            _ => {}
        }
    }

    /// Move the selection through tracks in start-date order.
    fn select_step(&mut self, step: isize) {
        let mut order: Vec<_> = self.ctl.tracks().iter().map(|t| (t.start, t.id)).collect();
        order.sort();
        if order.is_empty() {
            self.selected = None;
            return;
        }
        let len = order.len() as isize;
        let next = match self.selected.and_then(|id| order.iter().position(|&(_, o)| o == id)) {
            Some(i) => (i as isize + step).rem_euclid(len),
            None => 0,
        };
        self.selected = Some(order[next as usize].1);
    }

    fn begin_move(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        let Some(track) = self.ctl.track(id) else {
            return;
        };
        let config = self.ctl.config();
        let left = layout::item_position(config, track, self.ctl.scale()).left;
        let Some(lane) = self.ctl.lane_of(id) else {
            return;
        };
        let x = left - self.ctl.scroll_x();
        let y = layout::lane_top(config, lane) + config.lane_height / 2.0;
        if self.ctl.begin_drag(id) {
            self.ctl.drag_over(x, y);
            self.mode = Mode::Moving { x, y };
            self.status = "Moving: arrows to move, Enter to drop, Esc to cancel".to_owned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use tracklane_core::{TimelineConfig, Track};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> App {
        let tracks = vec![
            Track::parse(1, "Research", "2021-01-01", "2021-01-10").expect("valid"),
            Track::parse(2, "Prototype", "2021-01-05", "2021-01-15").expect("valid"),
        ];
        let mut ctl = TimelineController::new(TimelineConfig::default(), tracks);
        ctl.set_scale(10.0);
        App::new(ctl)
    }

    #[test]
    fn tab_cycles_by_start_date() {
        let mut app = app();
        assert_eq!(app.selected, Some(1));
        app.handle_key(key(KeyCode::Tab), 800.0);
        assert_eq!(app.selected, Some(2));
        app.handle_key(key(KeyCode::Tab), 800.0);
        assert_eq!(app.selected, Some(1));
        app.handle_key(key(KeyCode::BackTab), 800.0);
        assert_eq!(app.selected, Some(2));
    }

    #[test]
    fn keyboard_move_pins_lane() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('m')), 800.0);
        assert!(matches!(app.mode, Mode::Moving { .. }));
        app.handle_key(key(KeyCode::Down), 800.0);
        app.handle_key(key(KeyCode::Down), 800.0);
        app.handle_key(key(KeyCode::Right), 800.0);
        app.handle_key(key(KeyCode::Enter), 800.0);
        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(app.ctl.lane_of(1), Some(2));
        assert_eq!(
            app.ctl.track(1).map(|t| t.start.to_string()),
            Some("2021-01-02".to_owned())
        );
    }

    #[test]
    fn rename_flow() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('r')), 800.0);
        for _ in 0.."Research".len() {
            app.handle_key(key(KeyCode::Backspace), 800.0);
        }
        for c in "Study".chars() {
            app.handle_key(key(KeyCode::Char(c)), 800.0);
        }
        app.handle_key(key(KeyCode::Enter), 800.0);
        assert_eq!(app.ctl.track(1).map(|t| t.name.as_str()), Some("Study"));
    }

    #[test]
    fn quit_key() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('q')), 800.0);
        assert!(app.quit);
    }
}
