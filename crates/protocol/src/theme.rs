use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    LaneBackground,
    LaneBorder,

    HeaderBackground,
    HeaderBorder,
    MonthLabel,

    /// Fill for a track box. The hue (0..360) is derived from the track id;
    /// saturation and lightness are fixed by the renderer.
    TrackFill { hue: u16 },
    TrackBorder,
    TrackText,

    /// The original position of a track while it is being dragged.
    DragGhost,
    DragPreviewBorder,

    SelectionHighlight,

    TextPrimary,
    TextMuted,
}
