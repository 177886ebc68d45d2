//! # Keybindings Module
//!
//! Remappable vim-style bindings for page navigation.
//!
//! ## Philosophy
//!
//! - **Vim-like sequences**: A binding is a short sequence of characters (`j`, `gg`, `G`)
//! - **Explicit mappings**: No hidden or implicit keybindings
//! - **Unambiguous**: No binding may be a prefix of another
//! - **Persistent storage**: Profiles round-trip through JSON

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Navigation action that can be triggered by a keybinding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavAction {
    ScrollDown,
    ScrollUp,
    ScrollToTop,
    ScrollToBottom,
    HistoryBack,
    HistoryForward,
    EnterHintMode,
}

impl NavAction {
    /// Get the action name
    pub fn name(&self) -> &'static str {
        match self {
            NavAction::ScrollDown => "scroll_down",
            NavAction::ScrollUp => "scroll_up",
            NavAction::ScrollToTop => "scroll_to_top",
            NavAction::ScrollToBottom => "scroll_to_bottom",
            NavAction::HistoryBack => "history_back",
            NavAction::HistoryForward => "history_forward",
            NavAction::EnterHintMode => "enter_hint_mode",
        }
    }

    /// Parse action from name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "scroll_down" => Some(NavAction::ScrollDown),
            "scroll_up" => Some(NavAction::ScrollUp),
            "scroll_to_top" => Some(NavAction::ScrollToTop),
            "scroll_to_bottom" => Some(NavAction::ScrollToBottom),
            "history_back" => Some(NavAction::HistoryBack),
            "history_forward" => Some(NavAction::HistoryForward),
            "enter_hint_mode" => Some(NavAction::EnterHintMode),
            _ => None,
        }
    }

    /// Returns true if the host must suppress the triggering key's default
    pub fn suppresses_default(&self) -> bool {
        matches!(self, NavAction::EnterHintMode)
    }
}

impl fmt::Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Binding error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("Key sequence is empty")]
    EmptySequence,

    #[error("Key sequence '{sequence}' conflicts with existing binding '{existing}'")]
    Conflict { sequence: String, existing: String },
}

/// Keybinding profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindingProfile {
    /// Profile name
    pub name: String,
    /// Bindings map: key sequence -> action
    bindings: BTreeMap<String, NavAction>,
}

impl KeyBindingProfile {
    /// Create a new empty profile
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: BTreeMap::new(),
        }
    }

    /// Add a keybinding, replacing any binding for the same sequence.
    ///
    /// Fails if the sequence is a proper prefix of an existing binding or
    /// the other way round, since one of them could never fire.
    pub fn bind(&mut self, sequence: &str, action: NavAction) -> Result<(), BindingError> {
        if sequence.is_empty() {
            return Err(BindingError::EmptySequence);
        }

        if let Some(existing) = self.bindings.keys().find(|existing| {
            existing.as_str() != sequence
                && (existing.starts_with(sequence) || sequence.starts_with(existing.as_str()))
        }) {
            return Err(BindingError::Conflict {
                sequence: sequence.to_string(),
                existing: existing.clone(),
            });
        }

        self.bindings.insert(sequence.to_string(), action);
        Ok(())
    }

    /// Remove a keybinding
    pub fn unbind(&mut self, sequence: &str) -> Option<NavAction> {
        self.bindings.remove(sequence)
    }

    /// Get the action bound to a complete sequence
    pub fn action_for(&self, sequence: &str) -> Option<NavAction> {
        self.bindings.get(sequence).copied()
    }

    /// Returns true if `sequence` is a proper prefix of some binding
    pub fn is_prefix(&self, sequence: &str) -> bool {
        self.bindings
            .keys()
            .any(|bound| bound.len() > sequence.len() && bound.starts_with(sequence))
    }

    /// Get all bindings
    pub fn bindings(&self) -> &BTreeMap<String, NavAction> {
        &self.bindings
    }

    /// Get the number of bindings
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Create the default profile
    ///
    /// `j`/`k` scroll, `gg`/`G` jump to top/bottom, `H`/`L` move through
    /// history and `f` enters hint mode.
    pub fn default_profile() -> Self {
        let mut profile = Self::new("default");
        profile.bindings.extend(
            [
                ("j", NavAction::ScrollDown),
                ("k", NavAction::ScrollUp),
                ("gg", NavAction::ScrollToTop),
                ("G", NavAction::ScrollToBottom),
                ("H", NavAction::HistoryBack),
                ("L", NavAction::HistoryForward),
                ("f", NavAction::EnterHintMode),
            ]
            .into_iter()
            .map(|(sequence, action)| (sequence.to_string(), action)),
        );
        profile
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for KeyBindingProfile {
    fn default() -> Self {
        Self::default_profile()
    }
}
