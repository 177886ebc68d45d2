//! # Simulated Page
//!
//! This crate provides an in-process implementation of the page API.
//!
//! ## Purpose
//!
//! The simulated page allows exercising the overlay without a browser:
//! - Runs under `cargo test`
//! - Deterministic (document order, geometry and focus are plain data)
//! - Inspectable (badges, clicks, focus moves and scrolling are all recorded)
//!
//! Element rects are given in document coordinates. `bounding_rect` reports
//! them relative to the viewport, so scrolling changes which elements are
//! visible. There is no horizontal scrolling.
//!
//! It is also the page behind the scripted `vimnavd` host.

pub mod fault_injection;
pub mod fixture;

use fault_injection::{ActivationFault, OverlayFault};
use page_api::{NavigationApi, PageApi, PageError};
use page_types::{
    BadgeId, BadgeSpec, BadgeStyle, ComputedVisibility, ElementDescriptor, ElementId, Rect,
    Viewport,
};
use serde::{Deserialize, Serialize};

/// Description of an element to insert into the simulated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    #[serde(flatten)]
    pub descriptor: ElementDescriptor,
    /// Bounding box in document coordinates; `None` means no layout box
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub visibility: ComputedVisibility,
}

impl ElementSpec {
    pub fn new(descriptor: ElementDescriptor, rect: Rect) -> Self {
        Self {
            descriptor,
            rect: Some(rect),
            visibility: ComputedVisibility::visible(),
        }
    }

    /// An anchor at the given position
    pub fn link(rect: Rect) -> Self {
        Self::new(ElementDescriptor::new("a"), rect)
    }

    /// A `<button>` at the given position
    pub fn button(rect: Rect) -> Self {
        Self::new(ElementDescriptor::new("button"), rect)
    }

    /// A text `<input>` at the given position
    pub fn text_input(rect: Rect) -> Self {
        Self::new(ElementDescriptor::new("input").with_input_type("text"), rect)
    }

    /// Removes the layout box
    pub fn without_layout(mut self) -> Self {
        self.rect = None;
        self
    }

    pub fn with_visibility(mut self, visibility: ComputedVisibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// Element record inside the simulated document
#[derive(Debug, Clone)]
struct SimElement {
    id: ElementId,
    spec: ElementSpec,
    attached: bool,
}

/// Badge currently drawn in the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct SimBadge {
    pub id: BadgeId,
    pub spec: BadgeSpec,
}

impl SimBadge {
    pub fn text(&self) -> &str {
        &self.spec.text
    }

    pub fn style(&self) -> BadgeStyle {
        self.spec.style
    }
}

/// Activation performed on an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Clicked(ElementId),
    Focused(ElementId),
}

/// Scroll or history movement performed on the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NavigationEvent {
    ScrolledBy(f64),
    ScrolledToTop,
    ScrolledToBottom,
    HistoryBack,
    HistoryForward,
}

/// Simulated page state
///
/// Unlike a browser document, this state is directly accessible for testing.
pub struct SimulatedPage {
    viewport: Viewport,
    /// Elements in document order
    elements: Vec<SimElement>,
    next_element_id: u64,
    /// Badges in insertion order
    badges: Vec<SimBadge>,
    active_element: Option<ElementId>,
    activations: Vec<Activation>,
    navigation_log: Vec<NavigationEvent>,
    scroll_top: f64,
    document_height: f64,
    overlay_faults: Vec<OverlayFault>,
    activation_faults: Vec<ActivationFault>,
}

impl SimulatedPage {
    /// Creates an empty page whose document is exactly one viewport tall
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            elements: Vec::new(),
            next_element_id: 1,
            badges: Vec::new(),
            active_element: None,
            activations: Vec::new(),
            navigation_log: Vec::new(),
            scroll_top: 0.0,
            document_height: viewport.height,
            overlay_faults: Vec::new(),
            activation_faults: Vec::new(),
        }
    }

    /// Sets the total scrollable document height
    pub fn with_document_height(mut self, height: f64) -> Self {
        self.document_height = height.max(self.viewport.height);
        self
    }

    /// Installs an overlay fault
    pub fn with_overlay_fault(mut self, fault: OverlayFault) -> Self {
        self.overlay_faults.push(fault);
        self
    }

    /// Installs an activation fault
    pub fn with_activation_fault(mut self, fault: ActivationFault) -> Self {
        self.activation_faults.push(fault);
        self
    }

    /// Appends an element at the end of the document
    pub fn add_element(&mut self, spec: ElementSpec) -> ElementId {
        let id = ElementId::new(self.next_element_id);
        self.next_element_id += 1;
        self.elements.push(SimElement {
            id,
            spec,
            attached: true,
        });
        id
    }

    /// Removes an element from the document; its handle becomes stale
    pub fn detach(&mut self, element: ElementId) -> bool {
        match self.elements.iter_mut().find(|e| e.id == element) {
            Some(record) if record.attached => {
                record.attached = false;
                if self.active_element == Some(element) {
                    self.active_element = None;
                }
                true
            }
            _ => false,
        }
    }

    /// Puts keyboard focus on an element without recording an activation
    pub fn set_active_element(&mut self, element: Option<ElementId>) {
        self.active_element = element;
    }

    pub fn badges(&self) -> &[SimBadge] {
        &self.badges
    }

    /// Returns the badge annotating an element, if one is drawn
    pub fn badge_for(&self, element: ElementId) -> Option<&SimBadge> {
        self.badges.iter().find(|b| b.spec.anchor == element)
    }

    /// Returns the texts of badges that are not hidden, in insertion order
    pub fn visible_badge_texts(&self) -> Vec<String> {
        self.badges
            .iter()
            .filter(|b| !b.spec.style.hidden)
            .map(|b| b.spec.text.clone())
            .collect()
    }

    pub fn activations(&self) -> &[Activation] {
        &self.activations
    }

    pub fn navigation_log(&self) -> &[NavigationEvent] {
        &self.navigation_log
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport.height).max(0.0)
    }

    fn lookup(&self, element: ElementId) -> Result<&SimElement, PageError> {
        self.elements
            .iter()
            .find(|e| e.id == element)
            .ok_or(PageError::ElementNotFound(element))
    }

    fn lookup_attached(&self, element: ElementId) -> Result<&SimElement, PageError> {
        let record = self.lookup(element)?;
        if record.attached {
            Ok(record)
        } else {
            Err(PageError::StaleElement(element))
        }
    }
}

impl PageApi for SimulatedPage {
    fn elements(&self) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| e.attached)
            .map(|e| e.id)
            .collect()
    }

    fn describe(&self, element: ElementId) -> Result<ElementDescriptor, PageError> {
        Ok(self.lookup_attached(element)?.spec.descriptor.clone())
    }

    fn bounding_rect(&self, element: ElementId) -> Result<Option<Rect>, PageError> {
        let scroll_top = self.scroll_top;
        Ok(self
            .lookup_attached(element)?
            .spec
            .rect
            .map(|rect| Rect::new(rect.top - scroll_top, rect.left, rect.width, rect.height)))
    }

    fn computed_visibility(&self, element: ElementId) -> Result<ComputedVisibility, PageError> {
        Ok(self.lookup_attached(element)?.spec.visibility)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn is_attached(&self, element: ElementId) -> bool {
        self.lookup_attached(element).is_ok()
    }

    fn create_badge(&mut self, spec: BadgeSpec) -> Result<BadgeId, PageError> {
        if let Some(fault) = self
            .overlay_faults
            .iter()
            .find(|fault| fault.rejects(spec.anchor))
        {
            return Err(PageError::OverlayFailed(fault.to_string()));
        }

        let id = BadgeId::new();
        self.badges.push(SimBadge { id, spec });
        Ok(id)
    }

    fn restyle_badge(&mut self, badge: BadgeId, style: BadgeStyle) -> Result<(), PageError> {
        let record = self
            .badges
            .iter_mut()
            .find(|b| b.id == badge)
            .ok_or(PageError::BadgeNotFound(badge))?;
        record.spec.style = style;
        Ok(())
    }

    fn remove_badge(&mut self, badge: BadgeId) -> Result<(), PageError> {
        let pos = self
            .badges
            .iter()
            .position(|b| b.id == badge)
            .ok_or(PageError::BadgeNotFound(badge))?;
        self.badges.remove(pos);
        Ok(())
    }

    fn click(&mut self, element: ElementId) -> Result<(), PageError> {
        self.lookup_attached(element)?;
        self.activations.push(Activation::Clicked(element));
        Ok(())
    }

    fn focus(&mut self, element: ElementId) -> Result<(), PageError> {
        self.lookup_attached(element)?;
        if self
            .activation_faults
            .iter()
            .any(|fault| fault.refuses_focus(element))
        {
            return Err(PageError::NotFocusable(element));
        }
        self.active_element = Some(element);
        self.activations.push(Activation::Focused(element));
        Ok(())
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active_element
    }
}

impl NavigationApi for SimulatedPage {
    fn scroll_by(&mut self, delta: f64) {
        self.scroll_top = (self.scroll_top + delta).clamp(0.0, self.max_scroll());
        self.navigation_log.push(NavigationEvent::ScrolledBy(delta));
    }

    fn scroll_to_top(&mut self) {
        self.scroll_top = 0.0;
        self.navigation_log.push(NavigationEvent::ScrolledToTop);
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.max_scroll();
        self.navigation_log.push(NavigationEvent::ScrolledToBottom);
    }

    fn history_back(&mut self) {
        self.navigation_log.push(NavigationEvent::HistoryBack);
    }

    fn history_forward(&mut self) {
        self.navigation_log.push(NavigationEvent::HistoryForward);
    }
}
