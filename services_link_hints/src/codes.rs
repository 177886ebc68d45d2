//! Hint code generation
//!
//! Codes are fixed-length strings over a restricted alphabet, produced as
//! the Cartesian product of the alphabet with itself in row-major order.

use serde::{Deserialize, Serialize};
use services_settings::NavigatorSettings;
use std::fmt;
use thiserror::Error;

/// Length of every hint code
pub const CODE_LENGTH: usize = 2;

/// Alphabet validation error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("Hint alphabet is empty once reserved keys are removed")]
    EmptyAlphabet,

    #[error("Hint alphabet contains '{0}' more than once")]
    DuplicateCharacter(char),

    #[error("Hint alphabet contains upper-case '{0}'; typed keys are lower-cased")]
    UppercaseCharacter(char),

    #[error("Hint alphabet contains unprintable character {0:?}")]
    UnprintableCharacter(char),
}

/// A hint code, always lower-case and `CODE_LENGTH` characters long
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HintCode(String);

impl HintCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `prefix` is a prefix of this code
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for HintCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The characters hint codes are built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintAlphabet {
    chars: Vec<char>,
}

impl HintAlphabet {
    /// Builds an alphabet from `alphabet` with every `reserved` key removed.
    ///
    /// Characters must be printable, lower-case and unique.
    pub fn new(alphabet: &str, reserved: &[char]) -> Result<Self, CodeError> {
        let mut chars: Vec<char> = Vec::new();

        for ch in alphabet.chars() {
            if ch.is_control() || ch.is_whitespace() {
                return Err(CodeError::UnprintableCharacter(ch));
            }
            if ch.is_uppercase() {
                return Err(CodeError::UppercaseCharacter(ch));
            }
            if chars.contains(&ch) {
                return Err(CodeError::DuplicateCharacter(ch));
            }
            chars.push(ch);
        }

        chars.retain(|ch| !reserved.contains(ch));
        if chars.is_empty() {
            return Err(CodeError::EmptyAlphabet);
        }

        Ok(Self { chars })
    }

    /// Builds the alphabet described by the settings
    pub fn from_settings(settings: &NavigatorSettings) -> Result<Self, CodeError> {
        Self::new(&settings.alphabet, &settings.reserved_keys)
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Number of distinct codes (`|A|^CODE_LENGTH`)
    pub fn capacity(&self) -> usize {
        self.chars.len().pow(CODE_LENGTH as u32)
    }

    /// Generates the first `min(count, capacity)` codes in row-major order.
    ///
    /// With alphabet `ab` the order is `aa, ab, ba, bb`.
    pub fn generate_codes(&self, count: usize) -> Vec<HintCode> {
        let count = count.min(self.capacity());
        let base = self.chars.len();

        (0..count)
            .map(|index| {
                let mut code = String::with_capacity(CODE_LENGTH);
                let mut divisor = base.pow(CODE_LENGTH as u32 - 1);
                for _ in 0..CODE_LENGTH {
                    code.push(self.chars[(index / divisor) % base]);
                    divisor = (divisor / base).max(1);
                }
                HintCode(code)
            })
            .collect()
    }
}
