use winit::keyboard::KeyCode;

/// What the player wants to do this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputIntent {
    pub move_forward: bool,
    pub move_backward: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

impl InputIntent {
    pub fn merge(self, other: Self) -> Self {
        Self {
            move_forward: self.move_forward || other.move_forward,
            move_backward: self.move_backward || other.move_backward,
            rotate_left: self.rotate_left || other.rotate_left,
            rotate_right: self.rotate_right || other.rotate_right,
        }
    }
}

/// Translates key and pointer-drag events into an `InputIntent`.
/// Keyboard and drag intent are tracked separately so releasing one
/// does not cancel the other.
#[derive(Default)]
pub struct InputState {
    keys: InputIntent,
    drag: InputIntent,
    dragging: bool,
    last_pointer: Option<(f64, f64)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intent(&self) -> InputIntent {
        self.keys.merge(self.drag)
    }

    /// Returns false for keys that map to no intent.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let flag = match key {
            KeyCode::KeyW | KeyCode::ArrowUp => &mut self.keys.move_forward,
            KeyCode::KeyS | KeyCode::ArrowDown => &mut self.keys.move_backward,
            KeyCode::KeyA | KeyCode::ArrowLeft => &mut self.keys.rotate_left,
            KeyCode::KeyD | KeyCode::ArrowRight => &mut self.keys.rotate_right,
            _ => return false,
        };
        *flag = pressed;
        true
    }

    pub fn handle_pointer_button(&mut self, pressed: bool) {
        self.dragging = pressed;
        if !pressed {
            self.last_pointer = None;
            self.drag = InputIntent::default();
        }
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) {
        if !self.dragging {
            return;
        }
        if let Some((last_x, last_y)) = self.last_pointer {
            self.handle_drag_delta((x - last_x) as f32, (y - last_y) as f32);
        }
        self.last_pointer = Some((x, y));
    }

    /// Only the sign of each axis matters; a zero axis clears its pair.
    pub fn handle_drag_delta(&mut self, dx: f32, dy: f32) {
        self.drag.rotate_left = dx < 0.0;
        self.drag.rotate_right = dx > 0.0;
        self.drag.move_forward = dy < 0.0;
        self.drag.move_backward = dy > 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_map_to_intent() {
        let mut input = InputState::new();
        assert!(input.handle_key(KeyCode::KeyW, true));
        assert!(input.handle_key(KeyCode::ArrowLeft, true));
        assert_eq!(
            input.intent(),
            InputIntent {
                move_forward: true,
                rotate_left: true,
                ..Default::default()
            }
        );

        input.handle_key(KeyCode::KeyW, false);
        input.handle_key(KeyCode::ArrowLeft, false);
        assert_eq!(input.intent(), InputIntent::default());
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut input = InputState::new();
        assert!(!input.handle_key(KeyCode::Space, true));
        assert_eq!(input.intent(), InputIntent::default());
    }

    #[test]
    fn opposite_keys_can_both_be_held() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::KeyW, true);
        input.handle_key(KeyCode::KeyS, true);
        let intent = input.intent();
        assert!(intent.move_forward && intent.move_backward);
    }

    #[test]
    fn drag_delta_sign_selects_flags() {
        let mut input = InputState::new();
        input.handle_drag_delta(-3.0, -1.0);
        let intent = input.intent();
        assert!(intent.rotate_left && !intent.rotate_right);
        assert!(intent.move_forward && !intent.move_backward);

        input.handle_drag_delta(2.0, 0.0);
        let intent = input.intent();
        assert!(intent.rotate_right && !intent.rotate_left);
        assert!(!intent.move_forward && !intent.move_backward);
    }

    #[test]
    fn pointer_moves_only_count_while_dragging() {
        let mut input = InputState::new();
        input.handle_pointer_move(10.0, 10.0);
        input.handle_pointer_move(20.0, 10.0);
        assert_eq!(input.intent(), InputIntent::default());

        input.handle_pointer_button(true);
        input.handle_pointer_move(10.0, 10.0);
        assert_eq!(input.intent(), InputIntent::default());
        input.handle_pointer_move(10.0, 4.0);
        assert!(input.intent().move_forward);

        input.handle_pointer_button(false);
        assert_eq!(input.intent(), InputIntent::default());
    }

    #[test]
    fn release_keeps_keyboard_intent() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::KeyD, true);
        input.handle_pointer_button(true);
        input.handle_drag_delta(0.0, 5.0);
        assert!(input.intent().move_backward && input.intent().rotate_right);

        input.handle_pointer_button(false);
        assert_eq!(
            input.intent(),
            InputIntent {
                rotate_right: true,
                ..Default::default()
            }
        );
    }
}
