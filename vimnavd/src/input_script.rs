//! # Input Script Parser
//!
//! Provides a simple scripted input format for deterministic testing and demos.
//!
//! ## Format
//!
//! Scripts are line-based, with each line representing one input action:
//! - Key names: `Enter`, `Escape`, `Backspace`, `Tab`, `Space`
//! - Arrow keys: `Up`, `Down`, `Left`, `Right`
//! - Other named keys: `PageUp`, `PageDown`, `Home`, `End`, `Delete`, `F1`-`F12`
//! - Lone modifier presses: `Shift`, `Ctrl`, `Alt`, `Meta`
//! - Characters: `a`, `G`, `7` (upper-case letters carry Shift)
//! - Modifiers: `Ctrl+f`, `Alt+x`, `Shift+g` (same as `G`)
//! - Text strings: `"jjf"` (expanded to individual key presses)
//! - Comments: `# This is a comment`, or trailing after ` #`
//! - Delays: `wait 100ms` (advances the host clock)
//! - Page edits: `detach 3` (removes element 3 from the document)
//!
//! ## Example
//!
//! ```text
//! # Scroll a little, then follow the second link
//! "jj"
//! f                    # Enter hint mode
//! "ab"
//! ```

use input_types::{Key, KeyEvent, Modifiers};
use page_types::ElementId;
use std::collections::VecDeque;
use thiserror::Error;

/// Input script error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputScriptError {
    #[error("Invalid key name: {0}")]
    InvalidKeyName(String),

    #[error("Invalid modifier: {0}")]
    InvalidModifier(String),

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Empty script")]
    EmptyScript,

    #[error("Invalid delay format: {0}")]
    InvalidDelay(String),
}

/// A single scripted input action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedInput {
    /// A single key press
    Key(Key, Modifiers),
    /// Wait for a duration (in milliseconds)
    Wait(u64),
    /// Remove an element from the page
    Detach(ElementId),
}

/// Input script
///
/// Parses and provides scripted input events for deterministic testing.
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    inputs: VecDeque<ScriptedInput>,
}

impl InputScript {
    /// Creates a new empty input script
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a script from text
    pub fn from_text(text: &str) -> Result<Self, InputScriptError> {
        let mut inputs = VecDeque::new();

        for (line_num, line) in text.lines().enumerate() {
            let line = strip_comment(line.trim());

            // Skip empty lines and comments
            if line.is_empty() {
                continue;
            }

            let parsed = Self::parse_line(line, line_num + 1)?;
            inputs.extend(parsed);
        }

        if inputs.is_empty() {
            return Err(InputScriptError::EmptyScript);
        }

        Ok(Self { inputs })
    }

    /// Parses a single line of script
    fn parse_line(line: &str, line_num: usize) -> Result<Vec<ScriptedInput>, InputScriptError> {
        let parse_error = |e: InputScriptError| InputScriptError::ParseError {
            line: line_num,
            message: e.to_string(),
        };

        if let Some(duration) = line.strip_prefix("wait ") {
            let millis = Self::parse_duration(duration).map_err(parse_error)?;
            return Ok(vec![ScriptedInput::Wait(millis)]);
        }

        if let Some(raw) = line.strip_prefix("detach ") {
            let id = raw.trim().parse::<u64>().map_err(|_| InputScriptError::ParseError {
                line: line_num,
                message: format!("Invalid element number: {}", raw.trim()),
            })?;
            return Ok(vec![ScriptedInput::Detach(ElementId::new(id))]);
        }

        // Quoted strings expand to one press per character
        if line.len() >= 2 && line.starts_with('"') && line.ends_with('"') {
            let text = &line[1..line.len() - 1];
            return Ok(text
                .chars()
                .map(|c| ScriptedInput::Key(Key::Char(c), Self::implied_modifiers(c)))
                .collect());
        }

        let (modifiers, key_name) = Self::parse_modifiers(line)?;
        let key = Self::parse_key(key_name).map_err(parse_error)?;

        Ok(vec![Self::apply_shift(key, modifiers)])
    }

    /// Parses modifiers from a key string (e.g., "Ctrl+f" → (Modifiers::CTRL, "f"))
    fn parse_modifiers(input: &str) -> Result<(Modifiers, &str), InputScriptError> {
        let mut modifiers = Modifiers::none();
        let parts: Vec<&str> = input.split('+').collect();

        if parts.len() == 1 {
            return Ok((modifiers, input));
        }

        // All but last part are modifiers
        for modifier_str in &parts[..parts.len() - 1] {
            modifiers = match modifier_str.trim().to_lowercase().as_str() {
                "ctrl" | "control" => modifiers.with(Modifiers::CTRL),
                "alt" => modifiers.with(Modifiers::ALT),
                "shift" => modifiers.with(Modifiers::SHIFT),
                "super" | "meta" => modifiers.with(Modifiers::META),
                other => return Err(InputScriptError::InvalidModifier(other.to_string())),
            };
        }

        Ok((modifiers, parts[parts.len() - 1].trim()))
    }

    /// Parses a key name
    fn parse_key(name: &str) -> Result<Key, InputScriptError> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(c));
        }

        let key = match name.to_lowercase().as_str() {
            // Special keys
            "enter" | "return" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            "backspace" | "back" => Key::Backspace,
            "tab" => Key::Tab,
            "space" => Key::Char(' '),

            // Arrow keys
            "up" | "arrowup" => Key::ArrowUp,
            "down" | "arrowdown" => Key::ArrowDown,
            "left" | "arrowleft" => Key::ArrowLeft,
            "right" | "arrowright" => Key::ArrowRight,

            // Modifier keys pressed on their own
            "shift" => Key::Shift,
            "ctrl" | "control" => Key::Control,
            "alt" => Key::Alt,
            "meta" | "super" => Key::Meta,

            // Named keys, in their DOM spelling
            "pageup" => Key::Named("PageUp".to_string()),
            "pagedown" => Key::Named("PageDown".to_string()),
            "home" => Key::Named("Home".to_string()),
            "end" => Key::Named("End".to_string()),
            "delete" | "del" => Key::Named("Delete".to_string()),

            lower => match lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                Some(n @ 1..=12) => Key::Named(format!("F{}", n)),
                _ => return Err(InputScriptError::InvalidKeyName(name.to_string())),
            },
        };

        Ok(key)
    }

    /// Upper-case letters are typed with Shift held
    fn implied_modifiers(c: char) -> Modifiers {
        if c.is_ascii_uppercase() {
            Modifiers::SHIFT
        } else {
            Modifiers::none()
        }
    }

    /// Folds Shift into letters, the way a keyboard layout would
    fn apply_shift(key: Key, modifiers: Modifiers) -> ScriptedInput {
        match key {
            Key::Char(c) if modifiers.is_shift() => {
                ScriptedInput::Key(Key::Char(c.to_ascii_uppercase()), modifiers)
            }
            Key::Char(c) => {
                ScriptedInput::Key(Key::Char(c), modifiers.with(Self::implied_modifiers(c)))
            }
            other => ScriptedInput::Key(other, modifiers),
        }
    }

    /// Parses a duration string (e.g., "100ms", "1s")
    fn parse_duration(s: &str) -> Result<u64, InputScriptError> {
        let s = s.trim().to_lowercase();

        if let Some(ms_str) = s.strip_suffix("ms") {
            ms_str
                .trim()
                .parse::<u64>()
                .map_err(|_| InputScriptError::InvalidDelay(s.to_string()))
        } else if let Some(s_str) = s.strip_suffix('s') {
            s_str
                .trim()
                .parse::<u64>()
                .ok()
                .and_then(|secs| secs.checked_mul(1000))
                .ok_or_else(|| InputScriptError::InvalidDelay(s.to_string()))
        } else {
            Err(InputScriptError::InvalidDelay(s.to_string()))
        }
    }

    /// Returns the next input, if any
    pub fn next_input(&mut self) -> Option<ScriptedInput> {
        self.inputs.pop_front()
    }

    /// Returns true if the script has more inputs
    pub fn has_more(&self) -> bool {
        !self.inputs.is_empty()
    }

    /// Returns the number of remaining inputs
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }

    /// Converts a scripted input to a key-down event
    pub fn to_key_event(input: &ScriptedInput) -> Option<KeyEvent> {
        match input {
            ScriptedInput::Key(key, modifiers) => Some(KeyEvent::down(key.clone(), *modifiers)),
            ScriptedInput::Wait(_) | ScriptedInput::Detach(_) => None,
        }
    }
}

/// Removes a whole-line `#` comment or a trailing ` #` comment.
///
/// A lone `#` is a key press, and `#` inside a quoted string is text.
fn strip_comment(line: &str) -> &str {
    if line.starts_with('#') && line.len() > 1 {
        return "";
    }

    let search_from = if line.starts_with('"') {
        match line[1..].find('"') {
            Some(close) => close + 2,
            None => return line,
        }
    } else {
        0
    };

    match line[search_from..].find(" #") {
        Some(pos) => line[..search_from + pos].trim_end(),
        None => line,
    }
}
