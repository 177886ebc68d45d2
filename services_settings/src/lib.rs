//! # Settings Service
//!
//! Typed settings for the vimnav overlay.
//!
//! ## Philosophy
//!
//! - **Typed settings**: Every knob has an explicit type, not a string lookup
//! - **Defaults baked in**: An empty settings file yields the stock behavior
//! - **Validated once**: Settings are checked when loaded, not on every keystroke
//! - **Deterministic**: Settings are serializable and reproducible
//!
//! ## Example
//!
//! ```ignore
//! use services_settings::{NavigatorSettings, ReentryPolicy};
//!
//! let mut settings = NavigatorSettings::default();
//! settings.alphabet = "asdfhjkl".to_string();
//! settings.reentry = ReentryPolicy::Ignore;
//! settings.validate()?;
//! ```

pub mod persistence;

use page_types::{BadgeStyle, Color, ElementKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters hint codes are drawn from by default
pub const DEFAULT_ALPHABET: &str = "abcdehilmnopqrstuvwxyz12345678";

/// Keys never used in hint codes (scroll, sequence prefix and mode entry)
pub const DEFAULT_RESERVED_KEYS: [char; 4] = ['j', 'k', 'g', 'f'];

/// Settings validation error
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("Badge offset must be a finite, non-negative number (got {0})")]
    InvalidBadgeOffset(f64),

    #[error("Scroll amount must be a finite, positive number (got {0})")]
    InvalidScrollAmount(f64),

    #[error("Key sequence timeout must be greater than zero")]
    ZeroSequenceTimeout,
}

/// Order in which eligible elements receive codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOrder {
    /// Document order within each kind; links, then buttons, then inputs
    #[default]
    GroupedByKind,
    /// Pure document order across kinds
    DocumentOrder,
}

/// What entering hint mode does while a session is already live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReentryPolicy {
    /// Tear down the live session and allocate a fresh one
    #[default]
    Reset,
    /// Keep the live session untouched
    Ignore,
}

/// How badges that no longer match the typed prefix are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminatedBadges {
    /// Keep them visible in the eliminated color
    #[default]
    Dim,
    /// Hide them
    Hide,
}

/// Badge fill colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgePalette {
    pub link: Color,
    pub button: Color,
    pub input: Color,
    /// Badges still matching the typed prefix
    pub surviving: Color,
    /// Badges no longer matching the typed prefix
    pub eliminated: Color,
    pub text: Color,
}

impl Default for BadgePalette {
    fn default() -> Self {
        Self {
            link: Color::rgb(0xff, 0xff, 0x00),
            button: Color::rgb(0xff, 0xb3, 0x47),
            input: Color::rgb(0x87, 0xce, 0xfa),
            surviving: Color::rgb(0x88, 0xff, 0x88),
            eliminated: Color::rgb(0xff, 0xff, 0x88),
            text: Color::BLACK,
        }
    }
}

impl BadgePalette {
    /// Style of a freshly rendered badge
    pub fn initial(&self, kind: ElementKind) -> BadgeStyle {
        let background = match kind {
            ElementKind::Link => self.link,
            ElementKind::Button => self.button,
            ElementKind::Input => self.input,
        };
        BadgeStyle::new(background, self.text)
    }

    /// Style of a badge whose code still matches the typed prefix
    pub fn surviving(&self) -> BadgeStyle {
        BadgeStyle::new(self.surviving, self.text)
    }

    /// Style of a badge whose code no longer matches
    pub fn eliminated(&self, mode: EliminatedBadges) -> BadgeStyle {
        let style = BadgeStyle::new(self.eliminated, self.text);
        match mode {
            EliminatedBadges::Dim => style,
            EliminatedBadges::Hide => style.hidden(),
        }
    }
}

/// Navigator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorSettings {
    /// Characters hint codes are drawn from (before reserved keys are removed)
    pub alphabet: String,
    /// Keys removed from the alphabet
    pub reserved_keys: Vec<char>,
    /// Badge distance up and left of the element's top-left corner, in px
    pub badge_offset: f64,
    pub palette: BadgePalette,
    pub eliminated_badges: EliminatedBadges,
    pub scan_order: ScanOrder,
    pub reentry: ReentryPolicy,
    /// Pixels scrolled per `j`/`k` press
    pub scroll_amount: f64,
    /// Maximum gap between keys of a multi-key binding such as `gg`
    pub sequence_timeout_ms: u64,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.to_string(),
            reserved_keys: DEFAULT_RESERVED_KEYS.to_vec(),
            badge_offset: 10.0,
            palette: BadgePalette::default(),
            eliminated_badges: EliminatedBadges::default(),
            scan_order: ScanOrder::default(),
            reentry: ReentryPolicy::default(),
            scroll_amount: 60.0,
            sequence_timeout_ms: 1000,
        }
    }
}

impl NavigatorSettings {
    /// Checks the numeric settings.
    ///
    /// The alphabet is checked by the hint service when it builds its code
    /// space, since only it knows what makes a usable alphabet.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.badge_offset.is_finite() || self.badge_offset < 0.0 {
            return Err(SettingsError::InvalidBadgeOffset(self.badge_offset));
        }
        if !self.scroll_amount.is_finite() || self.scroll_amount <= 0.0 {
            return Err(SettingsError::InvalidScrollAmount(self.scroll_amount));
        }
        if self.sequence_timeout_ms == 0 {
            return Err(SettingsError::ZeroSequenceTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = NavigatorSettings::default();
        assert_eq!(settings.alphabet, "abcdehilmnopqrstuvwxyz12345678");
        assert_eq!(settings.reserved_keys, vec!['j', 'k', 'g', 'f']);
        assert_eq!(settings.badge_offset, 10.0);
        assert_eq!(settings.scroll_amount, 60.0);
        assert_eq!(settings.sequence_timeout_ms, 1000);
        assert_eq!(settings.scan_order, ScanOrder::GroupedByKind);
        assert_eq!(settings.reentry, ReentryPolicy::Reset);
        assert_eq!(settings.eliminated_badges, EliminatedBadges::Dim);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_badge_offset() {
        let mut settings = NavigatorSettings::default();
        settings.badge_offset = -1.0;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::InvalidBadgeOffset(-1.0))
        );

        settings.badge_offset = f64::NAN;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidBadgeOffset(_))
        ));

        settings.badge_offset = 0.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_scroll_amount() {
        let mut settings = NavigatorSettings::default();
        settings.scroll_amount = 0.0;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::InvalidScrollAmount(0.0))
        );
    }

    #[test]
    fn test_validate_sequence_timeout() {
        let mut settings = NavigatorSettings::default();
        settings.sequence_timeout_ms = 0;
        assert_eq!(settings.validate(), Err(SettingsError::ZeroSequenceTimeout));
    }

    #[test]
    fn test_palette_styles_per_kind_are_distinct() {
        let palette = BadgePalette::default();
        let link = palette.initial(ElementKind::Link);
        let button = palette.initial(ElementKind::Button);
        let input = palette.initial(ElementKind::Input);

        assert_ne!(link.background, button.background);
        assert_ne!(button.background, input.background);
        assert_ne!(link.background, input.background);
        assert!(!link.hidden);
    }

    #[test]
    fn test_palette_eliminated_modes() {
        let palette = BadgePalette::default();
        assert!(!palette.eliminated(EliminatedBadges::Dim).hidden);
        assert!(palette.eliminated(EliminatedBadges::Hide).hidden);
        assert_eq!(
            palette.surviving().background,
            Color::rgb(0x88, 0xff, 0x88)
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: NavigatorSettings =
            serde_json::from_str(r#"{ "alphabet": "asdf", "reentry": "ignore" }"#).unwrap();

        assert_eq!(settings.alphabet, "asdf");
        assert_eq!(settings.reentry, ReentryPolicy::Ignore);
        assert_eq!(settings.badge_offset, 10.0);
        assert_eq!(settings.palette, BadgePalette::default());
    }

    #[test]
    fn test_palette_json_uses_hex_colors() {
        let settings: NavigatorSettings =
            serde_json::from_str(r##"{ "palette": { "link": "#00ff00" } }"##).unwrap();

        assert_eq!(settings.palette.link, Color::rgb(0, 0xff, 0));
        assert_eq!(settings.palette.button, BadgePalette::default().button);
    }
}
