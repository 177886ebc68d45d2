//! Page fixtures
//!
//! A fixture is a JSON description of a document: the viewport, the
//! scrollable height and the elements in document order. Rects are in
//! document coordinates. Fixtures feed the
//! scripted host and keep integration tests readable.
//!
//! ```json
//! {
//!   "viewport": { "width": 800, "height": 600 },
//!   "elements": [
//!     { "tag": "a", "rect": { "top": 10, "left": 20, "width": 80, "height": 16 } },
//!     { "tag": "input", "input_type": "search",
//!       "rect": { "top": 40, "left": 20, "width": 200, "height": 24 } }
//!   ]
//! }
//! ```

use crate::{ElementSpec, SimulatedPage};
use page_types::Viewport;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixture error types
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to parse page fixture: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid viewport: {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

/// Serializable description of a simulated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFixture {
    pub viewport: Viewport,
    /// Total scrollable height; defaults to the viewport height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_height: Option<f64>,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

impl PageFixture {
    /// Parses a fixture from JSON text
    pub fn from_json(text: &str) -> Result<Self, FixtureError> {
        let fixture: PageFixture = serde_json::from_str(text)?;
        let Viewport { width, height } = fixture.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(FixtureError::InvalidViewport { width, height });
        }
        Ok(fixture)
    }

    /// Builds a simulated page containing the fixture's elements
    pub fn build(&self) -> SimulatedPage {
        let mut page = SimulatedPage::new(self.viewport);
        if let Some(height) = self.document_height {
            page = page.with_document_height(height);
        }
        for spec in &self.elements {
            page.add_element(spec.clone());
        }
        page
    }
}
