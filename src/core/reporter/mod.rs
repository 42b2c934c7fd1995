//=========================================================================
// Reporter
//=========================================================================
//
// User-facing notifications and the fatal-error path.
//
// Components:
// - `ui_thread`: UI-thread task marshaling
// - `dialog`: dialog descriptions, outcomes and the presenter seam
// - `terminator`: process termination seam
// - `fault_reporter`: the reporter itself
//
//=========================================================================

//=== Module Declarations =================================================

pub mod dialog;
pub mod fault_reporter;
pub mod terminator;
pub mod ui_thread;

//=== Public API ==========================================================

pub use dialog::{DialogOutcome, DialogPresenter, LogPresenter, MessageDialog};
pub use fault_reporter::FaultReporter;
pub use terminator::{ExitProcess, ProcessTerminator};
pub use ui_thread::{ui_channel, UiQueue, UiTask, UiThread};

//=== Test Doubles ========================================================
