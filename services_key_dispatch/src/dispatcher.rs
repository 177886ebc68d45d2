//! Key dispatcher
//!
//! Routes key-down events either to the hint controller (while a session
//! is live) or to the navigation bindings.

use crate::keybindings::{KeyBindingProfile, NavAction};
use input_types::{Key, KeyEvent};
use page_api::{NavigationApi, PageApi};
use services_link_hints::{EnterOutcome, HintAction, HintError, HintModeController};
use services_settings::NavigatorSettings;
use std::fmt;

/// Outcome of dispatching one key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a binding; the page handles the key as usual
    Ignored,
    /// Focus is in a text-entry context; the key belongs to the page
    Guarded,
    /// Waiting for the rest of a multi-key sequence
    Pending { sequence: String },
    /// A scroll or history binding ran
    Navigated(NavAction),
    /// The hint-mode binding ran
    HintModeEntered(EnterOutcome),
    /// The key went to the live hint session
    Hint(HintAction),
}

impl DispatchOutcome {
    /// Returns true if the host must suppress the key's default action
    pub fn suppresses_default(&self) -> bool {
        match self {
            DispatchOutcome::HintModeEntered(_) => true,
            DispatchOutcome::Hint(action) => action.suppresses_default(),
            DispatchOutcome::Navigated(action) => action.suppresses_default(),
            DispatchOutcome::Ignored
            | DispatchOutcome::Guarded
            | DispatchOutcome::Pending { .. } => false,
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Ignored => write!(f, "ignored"),
            DispatchOutcome::Guarded => write!(f, "ignored (typing)"),
            DispatchOutcome::Pending { sequence } => write!(f, "pending \"{}\"", sequence),
            DispatchOutcome::Navigated(action) => write!(f, "{}", action),
            DispatchOutcome::HintModeEntered(EnterOutcome::Started { report, .. }) => write!(
                f,
                "hint mode: {} labeled, {} unlabeled, {} skipped",
                report.labeled,
                report.unlabeled.len(),
                report.skipped.len()
            ),
            DispatchOutcome::HintModeEntered(EnterOutcome::AlreadyActive(_)) => {
                write!(f, "hint mode already active")
            }
            DispatchOutcome::Hint(action) => write!(f, "hint: {}", action),
        }
    }
}

/// Key dispatcher
///
/// Owns the hint controller and the pending key sequence. Timestamps are
/// supplied by the caller; the dispatcher never reads a clock.
pub struct KeyDispatcher {
    profile: KeyBindingProfile,
    hints: HintModeController,
    scroll_amount: f64,
    sequence_timeout_ms: u64,
    pending: String,
    last_key_ms: Option<u64>,
}

impl KeyDispatcher {
    /// Creates a dispatcher with the default bindings
    pub fn new(settings: &NavigatorSettings) -> Result<Self, HintError> {
        Ok(Self {
            profile: KeyBindingProfile::default_profile(),
            hints: HintModeController::new(settings)?,
            scroll_amount: settings.scroll_amount,
            sequence_timeout_ms: settings.sequence_timeout_ms,
            pending: String::new(),
            last_key_ms: None,
        })
    }

    /// Replaces the binding profile
    pub fn with_profile(mut self, profile: KeyBindingProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn profile(&self) -> &KeyBindingProfile {
        &self.profile
    }

    pub fn hints(&self) -> &HintModeController {
        &self.hints
    }

    pub fn hints_mut(&mut self) -> &mut HintModeController {
        &mut self.hints
    }

    /// Characters typed towards an incomplete sequence
    pub fn pending_sequence(&self) -> &str {
        &self.pending
    }

    /// Dispatches one key event received at `timestamp_ms`
    pub fn dispatch<P: PageApi + NavigationApi + ?Sized>(
        &mut self,
        page: &mut P,
        event: &KeyEvent,
        timestamp_ms: u64,
    ) -> DispatchOutcome {
        if self.hints.is_active() {
            return DispatchOutcome::Hint(self.hints.handle_key(page, event));
        }

        if !event.is_down() {
            return DispatchOutcome::Ignored;
        }

        if page.focus_in_text_entry() {
            self.pending.clear();
            return DispatchOutcome::Guarded;
        }

        let ch = match &event.key {
            Key::Char(ch) if !event.modifiers.is_chord() => *ch,
            key => {
                if !key.is_modifier() {
                    self.pending.clear();
                }
                return DispatchOutcome::Ignored;
            }
        };

        self.expire_pending(timestamp_ms);
        self.pending.push(ch);

        if let Some(outcome) = self.resolve_pending(page) {
            return outcome;
        }

        // The old prefix led nowhere; the new key may start a sequence itself
        if self.pending.chars().count() > 1 {
            self.pending.clear();
            self.pending.push(ch);
            if let Some(outcome) = self.resolve_pending(page) {
                return outcome;
            }
        }

        self.pending.clear();
        DispatchOutcome::Ignored
    }

    fn expire_pending(&mut self, timestamp_ms: u64) {
        if let Some(last) = self.last_key_ms {
            if timestamp_ms.saturating_sub(last) > self.sequence_timeout_ms {
                self.pending.clear();
            }
        }
        self.last_key_ms = Some(timestamp_ms);
    }

    fn resolve_pending<P: PageApi + NavigationApi + ?Sized>(
        &mut self,
        page: &mut P,
    ) -> Option<DispatchOutcome> {
        if let Some(action) = self.profile.action_for(&self.pending) {
            tracing::debug!("Binding \"{}\" -> {}", self.pending, action);
            self.pending.clear();
            return Some(self.perform(page, action));
        }

        if self.profile.is_prefix(&self.pending) {
            return Some(DispatchOutcome::Pending {
                sequence: self.pending.clone(),
            });
        }

        None
    }

    fn perform<P: PageApi + NavigationApi + ?Sized>(
        &mut self,
        page: &mut P,
        action: NavAction,
    ) -> DispatchOutcome {
        match action {
            NavAction::ScrollDown => page.scroll_by(self.scroll_amount),
            NavAction::ScrollUp => page.scroll_by(-self.scroll_amount),
            NavAction::ScrollToTop => page.scroll_to_top(),
            NavAction::ScrollToBottom => page.scroll_to_bottom(),
            NavAction::HistoryBack => page.history_back(),
            NavAction::HistoryForward => page.history_forward(),
            NavAction::EnterHintMode => {
                return DispatchOutcome::HintModeEntered(self.hints.enter(page));
            }
        }
        DispatchOutcome::Navigated(action)
    }
}
