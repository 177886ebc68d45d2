//! # vimnav Host Runtime
//!
//! This crate provides a deterministic host for the vimnav overlay.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: Services never print
//! - **Input is explicit events**: Not a live keyboard
//! - **Time is simulated**: Sequence timeouts follow the script's clock
//! - **Deterministic mode is first-class**: Every run of a script is identical
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Loads a page fixture into a simulated page
//! - Loads optional settings
//! - Feeds scripted keys through the key dispatcher
//! - Records a trace of outcomes and renders the final page state
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Drive a real browser
//! - Render badges graphically

pub mod input_script;
pub mod runtime;

pub use input_script::{InputScript, InputScriptError, ScriptedInput};
pub use runtime::{HostRuntime, HostRuntimeConfig, HostRuntimeError, TraceEntry, TraceEvent};
