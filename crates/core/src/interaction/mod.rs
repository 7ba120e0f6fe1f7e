//! Pointer interaction state machines. These only track state and compute
//! candidate positions; the controller applies their results.

pub mod drag;
pub mod pan;

pub use drag::{DragOutcome, DragPreview, DragState, DropCommit};
pub use pan::PanState;
