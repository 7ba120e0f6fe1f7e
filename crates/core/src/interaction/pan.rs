/// Click-and-drag horizontal panning of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanState {
    #[default]
    Idle,
    Panning {
        origin_x: f64,
        origin_scroll: f64,
    },
}

impl PanState {
    pub fn begin(&mut self, pointer_x: f64, scroll_x: f64) {
        *self = Self::Panning {
            origin_x: pointer_x,
            origin_scroll: scroll_x,
        };
    }

    /// New scroll offset for a pointer at `pointer_x`, or `None` when not
    /// panning. Moving the pointer right scrolls toward earlier dates.
    pub fn drag_to(&self, pointer_x: f64) -> Option<f64> {
        match *self {
            Self::Panning {
                origin_x,
                origin_scroll,
            } => Some((origin_scroll - (pointer_x - origin_x)).max(0.0)),
            Self::Idle => None,
        }
    }

    pub fn end(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }
}
