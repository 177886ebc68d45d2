//! Page API traits

use crate::PageError;
use page_types::{
    BadgeId, BadgeSpec, BadgeStyle, ComputedVisibility, ElementDescriptor, ElementId, Rect,
    Viewport,
};

/// The page API trait
///
/// This is everything the hint subsystem needs from the document it is
/// injected into. Multiple implementations are possible:
/// - Simulated page (for testing and the scripted host)
/// - A browser DOM binding
///
/// # Design Principles
///
/// **Borrowed elements**: Element handles are issued by the page. The overlay
/// annotates elements but never creates or destroys them.
///
/// **Owned badges**: Badges are created through this trait and must be
/// removed through it; the page does not clean them up on its own.
///
/// **Fallible activation**: The element behind a handle can disappear at any
/// time, so every per-element call can fail with [`PageError::StaleElement`].
pub trait PageApi {
    /// Returns every element handle in document order
    fn elements(&self) -> Vec<ElementId>;

    /// Returns the attributes used to classify an element
    fn describe(&self, element: ElementId) -> Result<ElementDescriptor, PageError>;

    /// Returns the element's bounding box relative to the viewport, or `None`
    /// if it has no layout box
    fn bounding_rect(&self, element: ElementId) -> Result<Option<Rect>, PageError>;

    /// Returns the computed display/visibility of an element
    fn computed_visibility(&self, element: ElementId) -> Result<ComputedVisibility, PageError>;

    /// Returns the current viewport dimensions
    fn viewport(&self) -> Viewport;

    /// Returns true if the element is still part of the document
    fn is_attached(&self, element: ElementId) -> bool;

    /// Inserts a badge above all page content
    fn create_badge(&mut self, spec: BadgeSpec) -> Result<BadgeId, PageError>;

    /// Changes the look of an existing badge
    fn restyle_badge(&mut self, badge: BadgeId, style: BadgeStyle) -> Result<(), PageError>;

    /// Removes a badge from the overlay
    fn remove_badge(&mut self, badge: BadgeId) -> Result<(), PageError>;

    /// Invokes the element's primary activation (a simulated click)
    fn click(&mut self, element: ElementId) -> Result<(), PageError>;

    /// Moves keyboard focus to the element
    fn focus(&mut self, element: ElementId) -> Result<(), PageError>;

    /// Returns the element holding keyboard focus, if any
    fn active_element(&self) -> Option<ElementId>;

    /// Returns true if keyboard focus is inside a text-entry context
    ///
    /// While this holds the overlay stays out of the user's way.
    fn focus_in_text_entry(&self) -> bool {
        self.active_element()
            .and_then(|element| self.describe(element).ok())
            .map(|descriptor| descriptor.is_text_entry())
            .unwrap_or(false)
    }
}

/// Scrolling and history primitives used by the key bindings
pub trait NavigationApi {
    /// Scrolls vertically by `delta` pixels (negative scrolls up)
    fn scroll_by(&mut self, delta: f64);

    /// Scrolls to the top of the document
    fn scroll_to_top(&mut self);

    /// Scrolls to the bottom of the document
    fn scroll_to_bottom(&mut self);

    /// Goes back one entry in the session history
    fn history_back(&mut self);

    /// Goes forward one entry in the session history
    fn history_forward(&mut self);
}
