//! Deterministic fault injection
//!
//! Lets tests make the simulated page refuse badge insertion, the way a real
//! document can when an element vanishes between the scan and the render,
//! and refuse focus for elements that are still attached.
//!
//! ## Example
//!
//! ```
//! use page_types::{ElementId, Viewport};
//! use sim_page::{fault_injection::OverlayFault, SimulatedPage};
//!
//! let page = SimulatedPage::new(Viewport::new(800.0, 600.0))
//!     .with_overlay_fault(OverlayFault::RejectBadgeFor(ElementId::new(2)));
//! ```

use page_types::ElementId;
use std::fmt;

/// A fault to inject into badge insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayFault {
    /// Refuse the badge anchored to one element
    RejectBadgeFor(ElementId),
    /// Refuse every badge
    RejectAll,
}

impl OverlayFault {
    /// Returns true if this fault refuses a badge anchored to `anchor`
    pub fn rejects(&self, anchor: ElementId) -> bool {
        match self {
            OverlayFault::RejectBadgeFor(element) => *element == anchor,
            OverlayFault::RejectAll => true,
        }
    }
}

impl fmt::Display for OverlayFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayFault::RejectBadgeFor(element) => {
                write!(f, "injected overlay fault for {}", element)
            }
            OverlayFault::RejectAll => write!(f, "injected overlay fault for every badge"),
        }
    }
}

/// A fault to inject into element activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationFault {
    /// Refuse keyboard focus for one element (e.g. a disabled input)
    RefuseFocus(ElementId),
}

impl ActivationFault {
    /// Returns true if this fault refuses focus for `target`
    pub fn refuses_focus(&self, target: ElementId) -> bool {
        match self {
            ActivationFault::RefuseFocus(element) => *element == target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects() {
        let fault = OverlayFault::RejectBadgeFor(ElementId::new(2));
        assert!(fault.rejects(ElementId::new(2)));
        assert!(!fault.rejects(ElementId::new(3)));
        assert!(OverlayFault::RejectAll.rejects(ElementId::new(3)));
    }

    #[test]
    fn test_refuses_focus() {
        let fault = ActivationFault::RefuseFocus(ElementId::new(4));
        assert!(fault.refuses_focus(ElementId::new(4)));
        assert!(!fault.refuses_focus(ElementId::new(5)));
    }
}
