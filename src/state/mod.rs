//! Application state modules
//!
//! State structs own their related fields and poll methods; results are
//! communicated back to TurnstileApp as events instead of direct mutation.

mod session;
mod ui;

pub use session::{Phase, SessionState};
pub use ui::{Tab, UiState};

/// Events that state poll methods can return.
#[derive(Debug)]
pub enum StateEvent {
    /// Update the status message
    StatusMessage(String),

    /// Log an error message
    LogError(String),

    /// Log an info message
    LogInfo(String),
}
