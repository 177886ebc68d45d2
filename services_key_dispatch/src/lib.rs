//! # Key Dispatch Service
//!
//! This crate turns a page's key-down stream into navigation: vim-style
//! scrolling and history bindings, plus entry into link-hint mode.
//!
//! ## Philosophy
//!
//! - **Stay out of the way**: Keys typed into text fields, and chords with
//!   Ctrl/Alt/Meta, always belong to the page
//! - **Explicit time**: Sequence timeouts use caller-supplied timestamps, never timers
//! - **One owner**: While a hint session is live, every key goes to it
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - Continuous scrolling while a key is held
//! - A general shortcut manager (only character sequences bind)

pub mod dispatcher;
pub mod keybindings;

pub use dispatcher::{DispatchOutcome, KeyDispatcher};
pub use keybindings::{BindingError, KeyBindingProfile, NavAction};
