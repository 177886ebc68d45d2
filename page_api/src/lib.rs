//! # Page API
//!
//! This crate defines the interface between the vimnav services and the page
//! they are injected into.
//!
//! ## Philosophy
//!
//! The page provides **primitives**, not policies:
//! - Element enumeration and description (not eligibility rules)
//! - Geometry and computed visibility (not viewport filtering)
//! - Overlay insertion (not badge layout)
//! - Click and focus (not activation choice)
//!
//! ## Design Goals
//!
//! 1. **Testability**: The entire API can be simulated in-process
//! 2. **Explicitness**: The services never reach for a global document
//! 3. **Graceful failure**: Every element call reports staleness instead of faulting
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A DOM binding (hosts provide those)
//! - A selector engine
//! - An event loop

pub mod error;
pub mod page;

pub use error::PageError;
pub use page::{NavigationApi, PageApi};
