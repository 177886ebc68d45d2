//! # Link Hints Service
//!
//! This crate implements keyboard link hints: visible interactive elements
//! are labeled with short codes, and typing a code activates its element.
//!
//! ## Philosophy
//!
//! - **Explicit state**: Hint mode is a state machine object, not a global flag
//! - **Borrowed elements**: The page owns its elements; sessions hold handles only
//! - **Owned badges**: Every badge a session creates is removed when it ends
//! - **Typed outcomes**: Dead ends and stale targets are results, not errors
//! - **Auditable**: Session starts, narrowing, activations and exits are recorded
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A key binding layer (see `services_key_dispatch`)
//! - A renderer (badges are drawn by the page)
//! - A re-scanner (the candidate set is fixed for a session's lifetime)
//!
//! ## Example
//!
//! ```ignore
//! let mut controller = HintModeController::new(&NavigatorSettings::default())?;
//! controller.enter(&mut page);
//! let action = controller.handle_key(&mut page, &KeyEvent::char('a'));
//! if action.suppresses_default() {
//!     // host: preventDefault()
//! }
//! ```

pub mod activation;
pub mod allocator;
pub mod codes;
pub mod controller;
pub mod session;

pub use activation::ActivationMethod;
pub use allocator::{Allocation, AllocationReport, HintAllocator, ScannedElement, SkippedCandidate};
pub use codes::{CodeError, HintAlphabet, HintCode, CODE_LENGTH};
pub use controller::{EnterOutcome, HintAction, HintEvent, HintExitReason, HintModeController, HintState};
pub use session::{Candidate, Session, SessionId};

use services_settings::SettingsError;
use thiserror::Error;

/// Hint service construction error
#[derive(Debug, Error, PartialEq)]
pub enum HintError {
    #[error("Invalid hint alphabet: {0}")]
    InvalidAlphabet(#[from] CodeError),

    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),
}
