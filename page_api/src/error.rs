//! Page error types

use page_types::{BadgeId, ElementId};
use thiserror::Error;

/// Errors that can occur when interacting with the host page
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    /// The handle was never issued by this page
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    /// The element existed but has since been removed from the document
    #[error("Element is no longer attached to the document: {0}")]
    StaleElement(ElementId),

    /// The element cannot take keyboard focus
    #[error("Element cannot receive focus: {0}")]
    NotFocusable(ElementId),

    /// Badge handle is unknown (never created, or already removed)
    #[error("Badge not found: {0}")]
    BadgeNotFound(BadgeId),

    /// The host refused to insert an overlay element
    #[error("Overlay insertion failed: {0}")]
    OverlayFailed(String),
}

impl PageError {
    /// Returns true if the error means the target element went away
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            PageError::StaleElement(_) | PageError::ElementNotFound(_)
        )
    }
}
