#![no_std]

//! # Input Types
//!
//! This crate defines the keyboard event types consumed by the vimnav overlay.
//!
//! ## Philosophy
//!
//! - **Events, not strings**: Hosts translate their native key values into typed keys once
//! - **Key-down granularity**: The state of every event is explicit (down, up, repeat)
//! - **Testable**: Events are serializable and can be injected for testing
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - Raw hardware scan codes or physical key positions
//! - A keyboard layout database
//! - IME composition handling

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Logical key
///
/// Printable keys carry the character the host produced (already shifted,
/// so `Shift+g` arrives as `Char('G')`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character
    Char(char),
    Escape,
    Enter,
    Tab,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Shift,
    Control,
    Alt,
    Meta,
    /// Any other named key, kept verbatim (e.g. `"F5"`, `"PageDown"`)
    Named(String),
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value to a logical key.
    ///
    /// Single-character values become [`Key::Char`]; `" "` maps to a space
    /// character as browsers report it.
    pub fn from_dom_key(value: &str) -> Self {
        let mut chars = value.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Key::Char(ch);
        }

        match value {
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            "Tab" => Key::Tab,
            "Backspace" => Key::Backspace,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Shift" => Key::Shift,
            "Control" => Key::Control,
            "Alt" => Key::Alt,
            "Meta" | "OS" => Key::Meta,
            other => Key::Named(other.to_string()),
        }
    }

    /// Returns the character for printable keys
    pub fn as_char(&self) -> Option<char> {
        match self {
            Key::Char(ch) => Some(*ch),
            _ => None,
        }
    }

    /// Returns true for keys that only change modifier state
    pub fn is_modifier(&self) -> bool {
        matches!(self, Key::Shift | Key::Control | Key::Alt | Key::Meta)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(ch) => write!(f, "{}", ch),
            Key::Named(name) => write!(f, "{}", name),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    /// Key went down
    Down,
    /// Key went up
    Up,
    /// Key is auto-repeating while held
    Repeat,
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Down => write!(f, "down"),
            Self::Up => write!(f, "up"),
            Self::Repeat => write!(f, "repeat"),
        }
    }
}

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    pub const NONE: Self = Self { bits: 0 };
    pub const CTRL: Self = Self { bits: 1 << 0 };
    pub const ALT: Self = Self { bits: 1 << 1 };
    pub const SHIFT: Self = Self { bits: 1 << 2 };
    pub const META: Self = Self { bits: 1 << 3 };

    /// Creates a new modifier set with no modifiers
    pub fn none() -> Self {
        Self::NONE
    }

    /// Combines two modifier sets
    pub fn with(mut self, other: Modifiers) -> Self {
        self.bits |= other.bits;
        self
    }

    /// Checks if every modifier in `other` is present
    pub fn contains(&self, other: Modifiers) -> bool {
        (self.bits & other.bits) == other.bits
    }

    pub fn is_ctrl(&self) -> bool {
        self.contains(Self::CTRL)
    }

    pub fn is_alt(&self) -> bool {
        self.contains(Self::ALT)
    }

    pub fn is_shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }

    pub fn is_meta(&self) -> bool {
        self.contains(Self::META)
    }

    /// Returns true if Ctrl, Alt or Meta is held.
    ///
    /// Shift alone is not a chord: it is already folded into the character.
    pub fn is_chord(&self) -> bool {
        self.is_ctrl() || self.is_alt() || self.is_meta()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let mut parts = Vec::new();
        if self.is_ctrl() {
            parts.push("Ctrl");
        }
        if self.is_alt() {
            parts.push("Alt");
        }
        if self.is_shift() {
            parts.push("Shift");
        }
        if self.is_meta() {
            parts.push("Meta");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// Keyboard event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers, state: KeyState) -> Self {
        Self {
            key,
            modifiers,
            state,
        }
    }

    /// Creates a key-down event
    pub fn down(key: Key, modifiers: Modifiers) -> Self {
        Self::new(key, modifiers, KeyState::Down)
    }

    /// Creates a key-up event
    pub fn up(key: Key, modifiers: Modifiers) -> Self {
        Self::new(key, modifiers, KeyState::Up)
    }

    /// Creates a key-down event for a printable character.
    ///
    /// Upper-case ASCII letters carry the Shift modifier, as a browser would
    /// report them.
    pub fn char(ch: char) -> Self {
        let modifiers = if ch.is_ascii_uppercase() {
            Modifiers::SHIFT
        } else {
            Modifiers::none()
        };
        Self::down(Key::Char(ch), modifiers)
    }

    pub fn is_down(&self) -> bool {
        self.state == KeyState::Down
    }

    pub fn is_up(&self) -> bool {
        self.state == KeyState::Up
    }

    pub fn is_repeat(&self) -> bool {
        self.state == KeyState::Repeat
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_chord() {
            write!(f, "{}+{} ({})", self.modifiers, self.key, self.state)
        } else {
            write!(f, "{} ({})", self.key, self.state)
        }
    }
}
