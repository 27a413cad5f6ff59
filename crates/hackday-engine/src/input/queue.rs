use std::collections::HashSet;

/// Input event types the engine understands.
/// Generic: no game-specific semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at screen coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at screen coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// A touch/cursor moved to screen coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A key was pressed (browser `keyCode`).
    KeyDown { key_code: u32 },
    /// A key was released.
    KeyUp { key_code: u32 },
    /// A custom event from the web shell.
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Held-key tracking with press edges.
///
/// Browsers repeat `keydown` while a key is held; only the first one after
/// a release counts as a press.
#[derive(Debug, Default)]
pub struct KeyState {
    held: HashSet<u32>,
    pressed: HashSet<u32>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold this frame's key events in. Press edges from the previous frame are dropped.
    pub fn apply(&mut self, input: &InputQueue) {
        self.pressed.clear();
        for event in input.iter() {
            match *event {
                InputEvent::KeyDown { key_code } => {
                    if self.held.insert(key_code) {
                        self.pressed.insert(key_code);
                    }
                }
                InputEvent::KeyUp { key_code } => {
                    self.held.remove(&key_code);
                }
                _ => {}
            }
        }
    }

    pub fn is_down(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    /// True only on the frame the key went down.
    pub fn just_pressed(&self, key_code: u32) -> bool {
        self.pressed.contains(&key_code)
    }

    /// Forget everything, e.g. after the page lost focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}
