use serde::{Deserialize, Serialize};

/// A pointer gesture, already translated from raw window events.
///
/// Deltas are in logical pixels so the same drag feels the same on any display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerAction {
    /// Drag with the orbit button held.
    Rotate { dx: f32, dy: f32 },
    /// Drag with the pan button held.
    Pan { dx: f32, dy: f32 },
    /// Wheel steps. Positive zooms in.
    Zoom(f32),
}

impl PointerAction {
    /// True when the gesture carries no motion.
    pub fn is_noop(&self) -> bool {
        match *self {
            PointerAction::Rotate { dx, dy } | PointerAction::Pan { dx, dy } => {
                dx == 0.0 && dy == 0.0
            }
            PointerAction::Zoom(steps) => steps == 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_is_constructible() {
        let a = PointerAction::Rotate { dx: 4.0, dy: 0.0 };
        assert!(matches!(a, PointerAction::Rotate { .. }));
        assert!(!a.is_noop());
    }

    #[test]
    fn zero_motion_is_noop() {
        assert!(PointerAction::Pan { dx: 0.0, dy: 0.0 }.is_noop());
        assert!(PointerAction::Zoom(0.0).is_noop());
        assert!(!PointerAction::Zoom(-1.0).is_noop());
    }
}
