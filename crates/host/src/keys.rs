//! Key press dispatch.

/// A key press with its modifier state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPress {
    pub key: String,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Parse chord notation such as `ctrl+s` or `alt+meta+x`. The last
    /// segment is the key; unknown modifiers yield `None`.
    pub fn parse(chord: &str) -> Option<Self> {
        let mut segments: Vec<&str> = chord.split('+').collect();
        let key = segments.pop().filter(|key| !key.is_empty())?;
        let mut press = KeyPress::plain(key);
        for modifier in segments {
            match modifier.to_ascii_lowercase().as_str() {
                "alt" => press.alt = true,
                "ctrl" | "control" => press.ctrl = true,
                "meta" | "cmd" | "super" => press.meta = true,
                _ => return None,
            }
        }
        Some(press)
    }

    pub fn is_chord(&self) -> bool {
        self.alt || self.ctrl || self.meta
    }
}

/// What happened to a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Dispatched; the default action is suppressed.
    Intercepted,
    /// A modifier chord, left to its default action.
    PassedThrough,
}

/// Forwards plain key presses to a dispatch callback.
pub struct KeyListener<F: FnMut(&str)> {
    dispatch: F,
}

impl<F: FnMut(&str)> KeyListener<F> {
    pub fn new(dispatch: F) -> Self {
        Self { dispatch }
    }

    pub fn feed(&mut self, press: &KeyPress) -> KeyOutcome {
        if press.is_chord() {
            return KeyOutcome::PassedThrough;
        }
        (self.dispatch)(&press.key);
        KeyOutcome::Intercepted
    }
}
