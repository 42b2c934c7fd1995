//=========================================================================
// Dialogs
//=========================================================================
//
// Presentation seam for user-facing notifications. Presenters are only
// ever invoked on the UI thread; the reporter does the marshaling.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info, warn};

//=== DialogOutcome =======================================================

/// How a message dialog was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Closed; the application continues.
    Dismiss,
    /// Closed; the process must end.
    DismissAndTerminate,
}

//=== MessageDialog =======================================================

/// A blocking message dialog with a single acknowledge action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDialog {
    pub title: String,
    pub message: String,
    /// Whether the dialog may be closed without acknowledging it.
    pub cancelable: bool,
    /// Whether acknowledging ends the process.
    pub terminate_on_ack: bool,
}

impl MessageDialog {
    pub const FATAL_TITLE: &'static str = "Fatal error occurred";

    pub fn info(title: impl Into<String>, message: impl Into<String>, terminate_on_ack: bool) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            cancelable: true,
            terminate_on_ack,
        }
    }

    /// The non-cancelable dialog shown before the process is killed.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            title: Self::FATAL_TITLE.to_string(),
            message: message.into(),
            cancelable: false,
            terminate_on_ack: true,
        }
    }

    /// Outcome of pressing the acknowledge button.
    pub fn acknowledged(&self) -> DialogOutcome {
        if self.terminate_on_ack {
            DialogOutcome::DismissAndTerminate
        } else {
            DialogOutcome::Dismiss
        }
    }
}

//=== DialogPresenter =====================================================

/// Shows dialogs on the UI thread.
pub trait DialogPresenter: Send + Sync {
    /// Shows `dialog` and returns once it is closed.
    fn show_message(&self, dialog: &MessageDialog) -> DialogOutcome;

    fn show_loading(&self, title: &str, message: &str);

    fn hide_loading(&self);

    /// Short non-modal notification.
    fn show_toast(&self, text: &str);
}

//=== LogPresenter ========================================================

/// Presenter for hosts without native dialogs: writes to the log and
/// acknowledges every message immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPresenter;

impl DialogPresenter for LogPresenter {
    fn show_message(&self, dialog: &MessageDialog) -> DialogOutcome {
        if dialog.cancelable {
            info!(target: "reporter", "[{}] {}", dialog.title, dialog.message);
        } else {
            error!(target: "reporter", "[{}] {}", dialog.title, dialog.message);
        }
        dialog.acknowledged()
    }

    fn show_loading(&self, title: &str, message: &str) {
        info!(target: "reporter", "[{}] {}", title, message);
    }

    fn hide_loading(&self) {
        info!(target: "reporter", "Loading finished");
    }

    fn show_toast(&self, text: &str) {
        warn!(target: "reporter", "{}", text);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_dialog_is_not_cancelable() {
        let dialog = MessageDialog::fatal("boom");
        assert!(!dialog.cancelable);
        assert_eq!(dialog.title, "Fatal error occurred");
        assert_eq!(dialog.acknowledged(), DialogOutcome::DismissAndTerminate);
    }

    #[test]
    fn info_dialog_outcome_follows_flag() {
        assert_eq!(
            MessageDialog::info("t", "m", false).acknowledged(),
            DialogOutcome::Dismiss
        );
        assert_eq!(
            MessageDialog::info("t", "m", true).acknowledged(),
            DialogOutcome::DismissAndTerminate
        );
    }

    #[test]
    fn log_presenter_acknowledges() {
        let outcome = LogPresenter.show_message(&MessageDialog::info("Hello", "world", false));
        assert_eq!(outcome, DialogOutcome::Dismiss);
    }
}
