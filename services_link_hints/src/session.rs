//! Hint sessions
//!
//! A session is the state of one hint-mode activation: the labeled
//! candidates, fixed when the session starts, and the prefix typed so far.

use crate::codes::HintCode;
use page_types::{BadgeId, ElementId, ElementKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a hint session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new unique session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// One labeled, rendered element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Handle to the page element (borrowed, never owned)
    pub target: ElementId,
    pub kind: ElementKind,
    pub code: HintCode,
    /// Overlay badge showing `code`; owned by the session
    pub badge: BadgeId,
}

/// Live state of one hint-mode activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    candidates: Vec<Candidate>,
    typed: String,
}

impl Session {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            id: SessionId::new(),
            candidates,
            typed: String::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Candidates in scan order
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Prefix typed so far
    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Extends the typed prefix by one (already lower-cased) character
    pub(crate) fn push_char(&mut self, ch: char) {
        self.typed.push(ch);
    }

    /// Returns the candidate whose code equals the typed prefix
    pub fn exact_match(&self) -> Option<&Candidate> {
        self.candidates
            .iter()
            .find(|candidate| candidate.code.as_str() == self.typed)
    }

    /// Candidates whose code starts with the typed prefix
    pub fn surviving(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates
            .iter()
            .filter(move |candidate| candidate.code.starts_with(&self.typed))
    }

    pub fn surviving_count(&self) -> usize {
        self.surviving().count()
    }

    /// Returns true if the typed prefix can still complete some code
    pub fn is_live_prefix(&self) -> bool {
        self.surviving().next().is_some()
    }

    pub(crate) fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::HintAlphabet;

    fn session(count: usize) -> Session {
        let alphabet = HintAlphabet::new("ab", &[]).unwrap();
        let candidates = alphabet
            .generate_codes(count)
            .into_iter()
            .enumerate()
            .map(|(index, code)| Candidate {
                target: ElementId::new(index as u64 + 1),
                kind: ElementKind::Link,
                code,
                badge: BadgeId::new(),
            })
            .collect();
        Session::new(candidates)
    }

    #[test]
    fn test_new_session_has_empty_prefix() {
        let session = session(3);
        assert_eq!(session.typed(), "");
        assert_eq!(session.surviving_count(), 3);
        assert!(session.exact_match().is_none());
        assert!(session.is_live_prefix());
    }

    #[test]
    fn test_narrowing() {
        let mut session = session(3);

        session.push_char('a');
        let surviving: Vec<&str> = session.surviving().map(|c| c.code.as_str()).collect();
        assert_eq!(surviving, vec!["aa", "ab"]);
        assert!(session.exact_match().is_none());

        session.push_char('b');
        let matched = session.exact_match().unwrap();
        assert_eq!(matched.target, ElementId::new(2));
    }

    #[test]
    fn test_dead_prefix() {
        let mut session = session(3);
        session.push_char('b');
        session.push_char('b');
        assert!(session.exact_match().is_none());
        assert!(!session.is_live_prefix());
    }

    #[test]
    fn test_empty_session() {
        let mut session = Session::new(Vec::new());
        assert!(session.is_empty());
        assert!(!session.is_live_prefix());

        session.push_char('a');
        assert_eq!(session.surviving_count(), 0);
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(Session::new(Vec::new()).id(), Session::new(Vec::new()).id());
    }
}
