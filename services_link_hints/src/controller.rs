//! Hint mode controller
//!
//! A two-state machine (`Inactive`, `Active(Session)`) that owns the live
//! session and consumes key-down events one at a time.

use crate::activation::{self, ActivationMethod};
use crate::allocator::{Allocation, AllocationReport, HintAllocator};
use crate::codes::{HintAlphabet, HintCode};
use crate::session::{Candidate, Session, SessionId};
use crate::HintError;
use input_types::{Key, KeyEvent};
use page_api::PageApi;
use page_types::{ElementId, ElementKind};
use serde::{Deserialize, Serialize};
use services_settings::{BadgePalette, EliminatedBadges, NavigatorSettings, ReentryPolicy};
use std::fmt;

/// Controller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintState {
    Inactive,
    Active(Session),
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintExitReason {
    /// A code was typed in full and its element activated
    Matched,
    /// Escape, or an explicit exit from the host
    Cancelled,
    /// The typed prefix matches no code
    DeadEnd,
    /// The matched element was gone by the time it was activated
    StaleTarget,
    /// The host refused the activation for another reason
    ActivationFailed,
    /// Hint mode was entered again and the session was replaced
    Superseded,
}

impl fmt::Display for HintExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Matched => "matched",
            Self::Cancelled => "cancelled",
            Self::DeadEnd => "dead end",
            Self::StaleTarget => "stale target",
            Self::ActivationFailed => "activation failed",
            Self::Superseded => "superseded",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of feeding one key event to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintAction {
    /// Not consumed; the page should handle the key as usual
    Ignored,
    /// Consumed; the session is still live
    Pending { typed: String, surviving: usize },
    /// A code matched and its element was activated; the session has ended
    Activated {
        element: ElementId,
        kind: ElementKind,
        code: HintCode,
        method: ActivationMethod,
    },
    /// The session ended without an activation
    Exited(HintExitReason),
}

impl HintAction {
    /// Returns true if the host must suppress the key's default action
    pub fn suppresses_default(&self) -> bool {
        !matches!(self, HintAction::Ignored)
    }
}

impl fmt::Display for HintAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintAction::Ignored => write!(f, "ignored"),
            HintAction::Pending { typed, surviving } => {
                write!(f, "pending \"{}\" ({} surviving)", typed, surviving)
            }
            HintAction::Activated {
                element,
                kind,
                code,
                method,
            } => write!(f, "activated {} {} [{}] via {:?}", kind, element, code, method),
            HintAction::Exited(reason) => write!(f, "exited ({})", reason),
        }
    }
}

/// Outcome of entering hint mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterOutcome {
    /// A new session was allocated
    Started {
        session: SessionId,
        report: AllocationReport,
    },
    /// A session was already live and the re-entry policy kept it
    AlreadyActive(SessionId),
}

/// Hint event for audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintEvent {
    /// A session was allocated
    SessionStarted {
        session: SessionId,
        labeled: usize,
        timestamp: u64,
    },
    /// More eligible elements than codes
    CapacityExceeded {
        session: SessionId,
        capacity: usize,
        unlabeled: usize,
        timestamp: u64,
    },
    /// A candidate's badge could not be created
    BadgeSkipped {
        session: SessionId,
        element: ElementId,
        timestamp: u64,
    },
    /// The typed prefix narrowed the surviving set
    Narrowed {
        session: SessionId,
        typed: String,
        surviving: usize,
        timestamp: u64,
    },
    /// A candidate was activated
    Activated {
        session: SessionId,
        element: ElementId,
        kind: ElementKind,
        timestamp: u64,
    },
    /// The session ended
    Exited {
        session: SessionId,
        reason: HintExitReason,
        timestamp: u64,
    },
}

/// Classification of a key-down while a session is live
enum SessionKey {
    Modifier,
    Cancel,
    Char(char),
    Other,
}

impl SessionKey {
    fn classify(event: &KeyEvent) -> Self {
        match &event.key {
            key if key.is_modifier() => SessionKey::Modifier,
            Key::Escape => SessionKey::Cancel,
            Key::Char(ch) if !event.modifiers.is_chord() => {
                SessionKey::Char(ch.to_lowercase().next().unwrap_or(*ch))
            }
            _ => SessionKey::Other,
        }
    }
}

/// Hint mode controller
///
/// Owns at most one [`Session`]. The host passes its page into every call;
/// the controller keeps no reference to it.
pub struct HintModeController {
    allocator: HintAllocator,
    palette: BadgePalette,
    eliminated_badges: EliminatedBadges,
    reentry: ReentryPolicy,
    state: HintState,
    /// Audit trail of hint events
    audit_trail: Vec<HintEvent>,
    /// Next timestamp (for simulation)
    next_timestamp: u64,
}

impl HintModeController {
    /// Creates an inactive controller from validated settings
    pub fn new(settings: &NavigatorSettings) -> Result<Self, HintError> {
        settings.validate()?;
        let alphabet = HintAlphabet::from_settings(settings)?;

        Ok(Self {
            allocator: HintAllocator::new(alphabet, settings),
            palette: settings.palette,
            eliminated_badges: settings.eliminated_badges,
            reentry: settings.reentry,
            state: HintState::Inactive,
            audit_trail: Vec::new(),
            next_timestamp: 0,
        })
    }

    pub fn state(&self) -> &HintState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, HintState::Active(_))
    }

    /// Returns the live session, if any
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            HintState::Active(session) => Some(session),
            HintState::Inactive => None,
        }
    }

    pub fn allocator(&self) -> &HintAllocator {
        &self.allocator
    }

    /// Returns the audit trail
    pub fn audit_trail(&self) -> &[HintEvent] {
        &self.audit_trail
    }

    /// Returns the recorded events and clears the trail
    ///
    /// The controller lives as long as the page, so long-running hosts
    /// should drain the trail periodically. Timestamps keep counting.
    pub fn take_audit_trail(&mut self) -> Vec<HintEvent> {
        std::mem::take(&mut self.audit_trail)
    }

    /// Enters hint mode: allocates a session and renders its badges
    pub fn enter<P: PageApi + ?Sized>(&mut self, page: &mut P) -> EnterOutcome {
        if let Some(live) = self.session().map(Session::id) {
            match self.reentry {
                ReentryPolicy::Ignore => {
                    tracing::debug!("Hint mode already active ({}), ignoring entry", live);
                    return EnterOutcome::AlreadyActive(live);
                }
                ReentryPolicy::Reset => {
                    self.teardown(page, HintExitReason::Superseded);
                }
            }
        }

        let Allocation { session, report } = self.allocator.allocate(page);
        let id = session.id();

        let timestamp = self.next_timestamp();
        self.audit_trail.push(HintEvent::SessionStarted {
            session: id,
            labeled: report.labeled,
            timestamp,
        });

        if report.capacity_exceeded() {
            let timestamp = self.next_timestamp();
            self.audit_trail.push(HintEvent::CapacityExceeded {
                session: id,
                capacity: report.capacity,
                unlabeled: report.unlabeled.len(),
                timestamp,
            });
        }

        for skipped in &report.skipped {
            let timestamp = self.next_timestamp();
            self.audit_trail.push(HintEvent::BadgeSkipped {
                session: id,
                element: skipped.element,
                timestamp,
            });
        }

        tracing::info!(
            "Hint mode started ({}): {} of {} eligible elements labeled",
            id,
            report.labeled,
            report.eligible
        );

        self.state = HintState::Active(session);
        EnterOutcome::Started {
            session: id,
            report,
        }
    }

    /// Feeds one key event to the controller
    pub fn handle_key<P: PageApi + ?Sized>(&mut self, page: &mut P, event: &KeyEvent) -> HintAction {
        if !event.is_down() || !self.is_active() {
            return HintAction::Ignored;
        }

        match SessionKey::classify(event) {
            SessionKey::Modifier => self.pending(),
            SessionKey::Cancel => self.exit_with(page, HintExitReason::Cancelled),
            SessionKey::Char(ch) => self.advance(page, ch),
            SessionKey::Other => {
                tracing::debug!("Key {} cannot extend a hint code", event);
                self.exit_with(page, HintExitReason::DeadEnd)
            }
        }
    }

    /// Ends the live session, removing every badge.
    ///
    /// Returns false (and does nothing) if no session is live.
    pub fn exit<P: PageApi + ?Sized>(&mut self, page: &mut P) -> bool {
        self.teardown(page, HintExitReason::Cancelled)
    }

    fn pending(&self) -> HintAction {
        match self.session() {
            Some(session) => HintAction::Pending {
                typed: session.typed().to_string(),
                surviving: session.surviving_count(),
            },
            None => HintAction::Ignored,
        }
    }

    fn advance<P: PageApi + ?Sized>(&mut self, page: &mut P, ch: char) -> HintAction {
        let HintState::Active(session) = &mut self.state else {
            return HintAction::Ignored;
        };

        session.push_char(ch);
        let id = session.id();
        let typed = session.typed().to_string();
        let matched = session.exact_match().cloned();
        let surviving = session.surviving_count();

        if let Some(candidate) = matched {
            return self.activate(page, id, candidate);
        }
        if surviving == 0 {
            tracing::debug!("No hint code starts with \"{}\"", typed);
            return self.exit_with(page, HintExitReason::DeadEnd);
        }

        self.restyle(page);
        let timestamp = self.next_timestamp();
        self.audit_trail.push(HintEvent::Narrowed {
            session: id,
            typed: typed.clone(),
            surviving,
            timestamp,
        });
        tracing::debug!("Hint prefix \"{}\" leaves {} candidates", typed, surviving);

        HintAction::Pending { typed, surviving }
    }

    fn activate<P: PageApi + ?Sized>(
        &mut self,
        page: &mut P,
        session: SessionId,
        candidate: Candidate,
    ) -> HintAction {
        match activation::activate(page, &candidate) {
            Ok(method) => {
                let timestamp = self.next_timestamp();
                self.audit_trail.push(HintEvent::Activated {
                    session,
                    element: candidate.target,
                    kind: candidate.kind,
                    timestamp,
                });
                tracing::info!(
                    "Activated {} {} via hint \"{}\"",
                    candidate.kind,
                    candidate.target,
                    candidate.code
                );
                self.teardown(page, HintExitReason::Matched);

                HintAction::Activated {
                    element: candidate.target,
                    kind: candidate.kind,
                    code: candidate.code,
                    method,
                }
            }
            Err(err) if err.is_stale() => {
                tracing::warn!("Hint target {} is stale: {}", candidate.target, err);
                self.exit_with(page, HintExitReason::StaleTarget)
            }
            Err(err) => {
                tracing::warn!("Could not activate {}: {}", candidate.target, err);
                self.exit_with(page, HintExitReason::ActivationFailed)
            }
        }
    }

    /// Highlights surviving badges and dims (or hides) eliminated ones
    fn restyle<P: PageApi + ?Sized>(&self, page: &mut P) {
        let Some(session) = self.session() else {
            return;
        };

        for candidate in session.candidates() {
            let style = if candidate.code.starts_with(session.typed()) {
                self.palette.surviving()
            } else {
                self.palette.eliminated(self.eliminated_badges)
            };

            if let Err(err) = page.restyle_badge(candidate.badge, style) {
                tracing::debug!("Could not restyle badge for {}: {}", candidate.target, err);
            }
        }
    }

    fn exit_with<P: PageApi + ?Sized>(&mut self, page: &mut P, reason: HintExitReason) -> HintAction {
        self.teardown(page, reason);
        HintAction::Exited(reason)
    }

    fn teardown<P: PageApi + ?Sized>(&mut self, page: &mut P, reason: HintExitReason) -> bool {
        let HintState::Active(session) = std::mem::replace(&mut self.state, HintState::Inactive)
        else {
            return false;
        };

        let id = session.id();
        for candidate in session.into_candidates() {
            if let Err(err) = page.remove_badge(candidate.badge) {
                tracing::debug!("Badge for {} already gone: {}", candidate.target, err);
            }
        }

        let timestamp = self.next_timestamp();
        self.audit_trail.push(HintEvent::Exited {
            session: id,
            reason,
            timestamp,
        });
        tracing::info!("Hint mode ended ({}): {}", id, reason);
        true
    }

    fn next_timestamp(&mut self) -> u64 {
        let ts = self.next_timestamp;
        self.next_timestamp += 1;
        ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input_types::Modifiers;
    use page_types::{Rect, Viewport};
    use sim_page::{ElementSpec, SimulatedPage};

    fn settings(alphabet: &str) -> NavigatorSettings {
        let mut settings = NavigatorSettings::default();
        settings.alphabet = alphabet.to_string();
        settings
    }

    fn page_with_links(count: usize) -> (SimulatedPage, Vec<ElementId>) {
        let mut page = SimulatedPage::new(Viewport::new(800.0, 600.0));
        let links = (0..count)
            .map(|i| page.add_element(ElementSpec::link(Rect::new(20.0 + 30.0 * i as f64, 20.0, 80.0, 20.0))))
            .collect();
        (page, links)
    }

    #[test]
    fn test_starts_inactive() {
        let controller = HintModeController::new(&settings("ab")).unwrap();
        assert!(!controller.is_active());
        assert_eq!(controller.state(), &HintState::Inactive);
        assert!(controller.audit_trail().is_empty());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(matches!(
            HintModeController::new(&settings("")),
            Err(HintError::InvalidAlphabet(_))
        ));

        let mut bad = NavigatorSettings::default();
        bad.scroll_amount = 0.0;
        assert!(matches!(
            HintModeController::new(&bad),
            Err(HintError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_keys_ignored_while_inactive() {
        let (mut page, _) = page_with_links(1);
        let mut controller = HintModeController::new(&settings("ab")).unwrap();

        let action = controller.handle_key(&mut page, &KeyEvent::char('a'));
        assert_eq!(action, HintAction::Ignored);
        assert!(!action.suppresses_default());
    }

    #[test]
    fn test_narrowing_restyles_badges() {
        let (mut page, links) = page_with_links(3);
        let mut controller = HintModeController::new(&settings("ab")).unwrap();
        controller.enter(&mut page);

        let action = controller.handle_key(&mut page, &KeyEvent::char('a'));
        assert_eq!(
            action,
            HintAction::Pending {
                typed: "a".to_string(),
                surviving: 2
            }
        );
        assert!(action.suppresses_default());

        let palette = BadgePalette::default();
        assert_eq!(page.badge_for(links[0]).unwrap().style(), palette.surviving());
        assert_eq!(page.badge_for(links[1]).unwrap().style(), palette.surviving());
        assert_eq!(
            page.badge_for(links[2]).unwrap().style(),
            palette.eliminated(EliminatedBadges::Dim)
        );
    }

    #[test]
    fn test_hidden_eliminated_badges() {
        let (mut page, _) = page_with_links(3);
        let mut hide = settings("ab");
        hide.eliminated_badges = EliminatedBadges::Hide;
        let mut controller = HintModeController::new(&hide).unwrap();
        controller.enter(&mut page);

        controller.handle_key(&mut page, &KeyEvent::char('a'));
        assert_eq!(page.visible_badge_texts(), vec!["aa", "ab"]);
    }

    #[test]
    fn test_modifier_keys_do_not_change_prefix() {
        let (mut page, links) = page_with_links(3);
        let mut controller = HintModeController::new(&settings("ab")).unwrap();
        controller.enter(&mut page);

        let action = controller.handle_key(&mut page, &KeyEvent::down(Key::Shift, Modifiers::SHIFT));
        assert_eq!(
            action,
            HintAction::Pending {
                typed: String::new(),
                surviving: 3
            }
        );
        assert!(action.suppresses_default());

        controller.handle_key(&mut page, &KeyEvent::char('B'));
        let action = controller.handle_key(&mut page, &KeyEvent::char('A'));
        assert!(matches!(action, HintAction::Activated { element, .. } if element == links[2]));
    }

    #[test]
    fn test_key_up_and_repeat_ignored() {
        let (mut page, _) = page_with_links(3);
        let mut controller = HintModeController::new(&settings("ab")).unwrap();
        controller.enter(&mut page);

        let up = KeyEvent::up(Key::Char('a'), Modifiers::none());
        assert_eq!(controller.handle_key(&mut page, &up), HintAction::Ignored);

        let repeat = KeyEvent::new(Key::Char('a'), Modifiers::none(), input_types::KeyState::Repeat);
        assert_eq!(controller.handle_key(&mut page, &repeat), HintAction::Ignored);

        assert_eq!(controller.session().unwrap().typed(), "");
    }

    #[test]
    fn test_named_key_is_dead_end() {
        let (mut page, _) = page_with_links(3);
        let mut controller = HintModeController::new(&settings("ab")).unwrap();
        controller.enter(&mut page);

        let action = controller.handle_key(&mut page, &KeyEvent::down(Key::Enter, Modifiers::none()));
        assert_eq!(action, HintAction::Exited(HintExitReason::DeadEnd));
        assert!(action.suppresses_default());
        assert!(page.badges().is_empty());
    }

    #[test]
    fn test_chorded_char_is_dead_end() {
        let (mut page, _) = page_with_links(3);
        let mut controller = HintModeController::new(&settings("ab")).unwrap();
        controller.enter(&mut page);

        let action = controller.handle_key(&mut page, &KeyEvent::down(Key::Char('a'), Modifiers::CTRL));
        assert_eq!(action, HintAction::Exited(HintExitReason::DeadEnd));
        assert!(page.activations().is_empty());
    }

    #[test]
    fn test_audit_trail_timestamps_are_monotonic() {
        let (mut page, _) = page_with_links(3);
        let mut controller = HintModeController::new(&settings("ab")).unwrap();
        controller.enter(&mut page);
        controller.handle_key(&mut page, &KeyEvent::char('a'));
        controller.handle_key(&mut page, &KeyEvent::char('b'));

        let timestamps: Vec<u64> = controller
            .audit_trail()
            .iter()
            .map(|event| match event {
                HintEvent::SessionStarted { timestamp, .. }
                | HintEvent::CapacityExceeded { timestamp, .. }
                | HintEvent::BadgeSkipped { timestamp, .. }
                | HintEvent::Narrowed { timestamp, .. }
                | HintEvent::Activated { timestamp, .. }
                | HintEvent::Exited { timestamp, .. } => *timestamp,
            })
            .collect();
        assert_eq!(timestamps, vec![0, 1, 2, 3]);
        assert!(matches!(
            controller.audit_trail().last(),
            Some(HintEvent::Exited {
                reason: HintExitReason::Matched,
                ..
            })
        ));
    }

    #[test]
    fn test_take_audit_trail_drains() {
        let (mut page, _) = page_with_links(3);
        let mut controller = HintModeController::new(&settings("ab")).unwrap();
        controller.enter(&mut page);
        controller.handle_key(&mut page, &KeyEvent::char('a'));

        let taken = controller.take_audit_trail();
        assert_eq!(taken.len(), 2);
        assert!(controller.audit_trail().is_empty());

        controller.exit(&mut page);
        assert!(matches!(
            controller.audit_trail(),
            [HintEvent::Exited { timestamp: 2, .. }]
        ));
    }

    #[test]
    fn test_audit_trail_serializes() {
        let (mut page, _) = page_with_links(1);
        let mut controller = HintModeController::new(&settings("ab")).unwrap();
        controller.enter(&mut page);
        controller.exit(&mut page);

        let json = serde_json::to_string(controller.audit_trail()).unwrap();
        let events: Vec<HintEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(events, controller.audit_trail());
    }

    #[test]
    fn test_exit_reason_display() {
        assert_eq!(HintExitReason::DeadEnd.to_string(), "dead end");
        assert_eq!(
            HintAction::Exited(HintExitReason::Cancelled).to_string(),
            "exited (cancelled)"
        );
    }
}
