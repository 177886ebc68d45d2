#![no_std]

//! # Page Types
//!
//! This crate defines the page-side vocabulary shared by the vimnav services
//! and the hosts that implement them.
//!
//! ## Philosophy
//!
//! - **Handles, not nodes**: Page elements are referenced by opaque handles owned by the host
//! - **Geometry is data**: Bounding boxes and viewports are plain values
//! - **Classification is pure**: Deciding whether an element can carry a hint needs no host calls
//! - **Testable**: Everything here is serializable and can be snapshot-tested
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A DOM implementation
//! - A CSS engine (only the visibility facts the overlay needs)
//! - A rendering system

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle to a page element
///
/// Handles are issued by the host. Holding one never implies ownership of
/// the element's lifecycle; the element may disappear at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element:{}", self.0)
    }
}

/// Unique identifier for a hint badge overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BadgeId(Uuid);

impl BadgeId {
    /// Creates a new unique badge ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BadgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "badge:{}", self.0)
    }
}

/// Kind of hintable element
///
/// The kind selects the activation: links and buttons are clicked, inputs
/// receive focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Link,
    Button,
    Input,
}

impl ElementKind {
    /// Fixed order used when candidates are grouped by kind
    pub const SCAN_ORDER: [ElementKind; 3] =
        [ElementKind::Link, ElementKind::Button, ElementKind::Input];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Link => "link",
            ElementKind::Button => "button",
            ElementKind::Input => "input",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The attributes of an element that decide whether it can carry a hint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Tag name, compared case-insensitively
    pub tag: String,
    /// `type` attribute (for `input` elements)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// ARIA `role` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Whether the element is editable content
    #[serde(default)]
    pub content_editable: bool,
}

impl ElementDescriptor {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            input_type: None,
            role: None,
            content_editable: false,
        }
    }

    pub fn with_input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_content_editable(mut self, editable: bool) -> Self {
        self.content_editable = editable;
        self
    }

    fn tag_is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Effective input type; a missing type attribute means `text`
    fn effective_input_type(&self) -> String {
        self.input_type
            .as_deref()
            .unwrap_or("text")
            .to_ascii_lowercase()
    }

    /// Classifies the element, or returns `None` if it cannot carry a hint.
    ///
    /// Precedence is link > button > input, so every element gets at most
    /// one kind.
    pub fn classify(&self) -> Option<ElementKind> {
        if self.tag_is("a") {
            return Some(ElementKind::Link);
        }

        let is_input = self.tag_is("input");
        let input_type = self.effective_input_type();
        let button_role = self
            .role
            .as_deref()
            .map(|role| role.eq_ignore_ascii_case("button"))
            .unwrap_or(false);

        if self.tag_is("button")
            || button_role
            || (is_input && matches!(input_type.as_str(), "button" | "submit"))
        {
            return Some(ElementKind::Button);
        }

        if (is_input && input_type != "hidden") || self.tag_is("textarea") || self.tag_is("select")
        {
            return Some(ElementKind::Input);
        }

        None
    }

    /// Returns true if keyboard focus on this element means the user is typing
    pub fn is_text_entry(&self) -> bool {
        self.content_editable
            || self.tag_is("input")
            || self.tag_is("textarea")
            || self.tag_is("select")
            || self.tag_is("button")
    }
}

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Bounding box relative to the viewport, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Returns true if the box has a non-zero rendered size
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Returns true if the box lies entirely inside the viewport
    pub fn is_within(&self, viewport: &Viewport) -> bool {
        self.top >= 0.0
            && self.left >= 0.0
            && self.bottom() <= viewport.height
            && self.right() <= viewport.width
    }
}

/// Computed style facts relevant to visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComputedVisibility {
    #[serde(default)]
    pub display_none: bool,
    #[serde(default)]
    pub visibility_hidden: bool,
}

impl ComputedVisibility {
    pub fn visible() -> Self {
        Self::default()
    }

    pub fn is_shown(&self) -> bool {
        !self.display_none && !self.visibility_hidden
    }
}

/// Error parsing a `#rrggbb` color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid color (expected #rrggbb): {}", self.0)
    }
}

/// RGB fill color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        let digits = value
            .strip_prefix('#')
            .filter(|digits| digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| ColorParseError(value.to_string()))?;

        let channel = |range: core::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError(value.to_string()))
        };

        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Visual style of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeStyle {
    pub background: Color,
    pub foreground: Color,
    /// Hidden badges stay in the overlay but are not drawn
    #[serde(default)]
    pub hidden: bool,
}

impl BadgeStyle {
    pub fn new(background: Color, foreground: Color) -> Self {
        Self {
            background,
            foreground,
            hidden: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Everything a host needs to draw one badge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeSpec {
    /// Text shown in the badge (the hint code)
    pub text: String,
    /// Element the badge annotates
    pub anchor: ElementId,
    /// Viewport-relative position of the badge's top-left corner
    pub top: f64,
    pub left: f64,
    pub style: BadgeStyle,
}

impl BadgeSpec {
    /// Builds a badge placed `offset` pixels up and left of `rect`
    pub fn near(
        text: impl Into<String>,
        anchor: ElementId,
        rect: &Rect,
        offset: f64,
        style: BadgeStyle,
    ) -> Self {
        Self {
            text: text.into(),
            anchor,
            top: rect.top - offset,
            left: rect.left - offset,
            style,
        }
    }
}
