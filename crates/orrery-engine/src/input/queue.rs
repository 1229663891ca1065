/// Input events the flight core understands.
/// The host forwards raw browser events; modes interpret them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A mouse button was pressed (0 primary, 1 middle, 2 secondary).
    PointerDown { button: u8 },
    /// A mouse button was released.
    PointerUp { button: u8 },
    /// Relative pointer motion in pixels.
    PointerMove { dx: f32, dy: f32 },
    /// Wheel scroll; positive is away from the user.
    Wheel { delta: f32 },
    /// A key was pressed.
    KeyDown { key_code: u32 },
    /// A key was released.
    KeyUp { key_code: u32 },
    /// The browser released pointer capture on its own (e.g. user hit Escape).
    PointerLockLost,
}

/// Events pushed by the host between ticks, consumed once per tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(64),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
