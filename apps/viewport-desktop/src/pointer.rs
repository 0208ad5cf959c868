use viewport_input::PointerAction;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels of a high-resolution scroll that count as one wheel step.
const PIXELS_PER_WHEEL_STEP: f64 = 50.0;

/// Turns raw button/cursor/wheel events into `PointerAction`s.
///
/// Left button orbits, right or middle button pans. Positions are logical.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last: Option<(f64, f64)>,
    rotating: bool,
    panning: bool,
}

impl PointerTracker {
    pub fn button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right | MouseButton::Middle => self.panning = pressed,
            _ => {}
        }
    }

    pub fn moved(&mut self, x: f64, y: f64) -> Option<PointerAction> {
        let previous = self.last.replace((x, y));
        let (px, py) = previous?;
        let (dx, dy) = ((x - px) as f32, (y - py) as f32);
        if self.rotating {
            Some(PointerAction::Rotate { dx, dy })
        } else if self.panning {
            Some(PointerAction::Pan { dx, dy })
        } else {
            None
        }
    }

    pub fn left(&mut self) {
        self.last = None;
    }

    pub fn wheel(&mut self, delta: MouseScrollDelta) -> PointerAction {
        let steps = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_WHEEL_STEP) as f32,
        };
        PointerAction::Zoom(steps)
    }
}
