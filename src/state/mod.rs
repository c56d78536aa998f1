//! Application state modules
//!
//! Each state struct owns the fields of one operation (health probe,
//! negative-prompt enhancement, image generation) together with its async
//! tasks. State structs communicate results back to the app through
//! `StateEvent`s instead of mutating shared fields, so every transition is
//! unit-testable without a rendering environment.

mod generation;
mod health;
mod negative;
mod ui;

pub use generation::GenerationState;
pub use health::{BackendStatus, HealthState};
pub use negative::NegativePromptState;
pub use ui::{Tab, UiState};

/// Events that state poll methods can return
#[derive(Debug)]
pub enum StateEvent {
    /// Update the status bar message
    StatusMessage(String),

    /// Log an info message
    LogInfo(String),

    /// Log an error message
    LogError(String),
}
