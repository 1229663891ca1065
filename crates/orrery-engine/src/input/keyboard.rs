use std::collections::HashSet;

use glam::DVec3;

// Browser key codes.
pub const KEY_ESCAPE: u32 = 27;
pub const KEY_A: u32 = 65;
pub const KEY_D: u32 = 68;
pub const KEY_E: u32 = 69;
pub const KEY_F: u32 = 70;
pub const KEY_Q: u32 = 81;
pub const KEY_R: u32 = 82;
pub const KEY_S: u32 = 83;
pub const KEY_W: u32 = 87;

/// Keys currently held.
#[derive(Debug, Default, Clone)]
pub struct KeyState {
    held: HashSet<u32>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key_code: u32) {
        self.held.insert(key_code);
    }

    pub fn release(&mut self, key_code: u32) {
        self.held.remove(&key_code);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    fn axis(&self, positive: u32, negative: u32) -> f64 {
        (self.is_held(positive) as i32 - self.is_held(negative) as i32) as f64
    }

    /// Camera-local direction from W/S (forward/back), A/D (left/right) and
    /// R/F (up/down). Not normalized.
    pub fn translation(&self) -> DVec3 {
        DVec3::new(
            self.axis(KEY_D, KEY_A),
            self.axis(KEY_R, KEY_F),
            self.axis(KEY_S, KEY_W),
        )
    }

    /// Roll direction from Q (counter-clockwise) and E (clockwise).
    pub fn roll(&self) -> f64 {
        self.axis(KEY_Q, KEY_E)
    }
}

/// Pointer state accumulated between frames.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// Bitmask of held buttons.
    pub buttons: u8,
    pub dx: f64,
    pub dy: f64,
    pub wheel: f64,
}

impl PointerState {
    pub fn press(&mut self, button: u8) {
        self.buttons |= 1 << button.min(7);
    }

    pub fn release(&mut self, button: u8) {
        self.buttons &= !(1 << button.min(7));
    }

    pub fn is_held(&self, button: u8) -> bool {
        self.buttons & (1 << button.min(7)) != 0
    }

    /// Take the accumulated motion and wheel, leaving buttons held.
    pub fn take_motion(&mut self) -> (f64, f64, f64) {
        let motion = (self.dx, self.dy, self.wheel);
        self.dx = 0.0;
        self.dy = 0.0;
        self.wheel = 0.0;
        motion
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
