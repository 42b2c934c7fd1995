//=========================================================================
// Fault Reporter
//=========================================================================
//
// Single entry point for user-facing notifications from any thread.
//
// Fatal path:
//   terminate_application(msg)
//     1. RenderControl::halt()              (calling thread, immediately)
//     2. UiThread::run(show fatal dialog)   (inline or queued)
//     3. ProcessTerminator::terminate(1)    (UI thread, after the dialog)
//
// Only the first fatal call produces a dialog; later calls only make
// sure rendering stays halted.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::dialog::{DialogOutcome, DialogPresenter, MessageDialog};
use super::terminator::{ExitProcess, ProcessTerminator};
use super::ui_thread::UiThread;
use crate::core::error::{EngineError, ErrorCode};
use crate::core::surface::RenderControl;

const LOADING_TITLE: &str = "Loading";
const LOADING_MESSAGE: &str = "The game is loading... Please wait.";

//=== FaultReporter =======================================================

/// Marshals dialogs onto the UI thread and owns the fatal-error path.
pub struct FaultReporter {
    ui: UiThread,
    presenter: Arc<dyn DialogPresenter>,
    terminator: Arc<dyn ProcessTerminator>,
    render_control: Mutex<Option<RenderControl>>,
    loading_visible: Arc<AtomicBool>,
    terminating: AtomicBool,
}

impl FaultReporter {
    /// Creates a reporter bound to `ui`.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::WrongThread`] when called off the UI thread.
    pub fn new(
        ui: UiThread,
        presenter: Arc<dyn DialogPresenter>,
        terminator: Arc<dyn ProcessTerminator>,
    ) -> Result<Self, EngineError> {
        if !ui.is_current() {
            return Err(EngineError::new(
                ErrorCode::WrongThread,
                "fault reporter must be created on the UI thread",
            ));
        }

        Ok(Self {
            ui,
            presenter,
            terminator,
            render_control: Mutex::new(None),
            loading_visible: Arc::new(AtomicBool::new(false)),
            terminating: AtomicBool::new(false),
        })
    }

    /// Reporter that exits the process on fatal errors.
    pub fn with_presenter(ui: UiThread, presenter: Arc<dyn DialogPresenter>) -> Result<Self, EngineError> {
        Self::new(ui, presenter, Arc::new(ExitProcess))
    }

    /// Registers the render flag halted by [`terminate_application`].
    ///
    /// [`terminate_application`]: Self::terminate_application
    pub fn attach_render_control(&self, control: RenderControl) {
        let mut slot = self.render_control.lock().unwrap_or_else(|e| e.into_inner());
        if self.terminating.load(Ordering::Acquire) {
            control.halt();
        }
        *slot = Some(control);
    }

    pub fn ui_thread(&self) -> &UiThread {
        &self.ui
    }

    pub fn is_terminating(&self) -> bool {
        self.terminating.load(Ordering::Acquire)
    }

    //--- Notifications ----------------------------------------------------

    /// Shows a blocking message; acknowledging it ends the process when
    /// `terminate_on_ack` is set.
    pub fn show_message(&self, title: impl Into<String>, message: impl Into<String>, terminate_on_ack: bool) {
        let dialog = MessageDialog::info(title, message, terminate_on_ack);
        let presenter = Arc::clone(&self.presenter);
        let terminator = Arc::clone(&self.terminator);

        self.ui.run(move || {
            if presenter.show_message(&dialog) == DialogOutcome::DismissAndTerminate {
                terminator.terminate(ExitProcess::FATAL_EXIT_CODE);
            }
        });
    }

    pub fn show_loading(&self) {
        let presenter = Arc::clone(&self.presenter);
        let visible = Arc::clone(&self.loading_visible);

        self.ui.run(move || {
            if visible.swap(true, Ordering::AcqRel) {
                debug!(target: "reporter", "Loading indicator already shown");
                return;
            }
            presenter.show_loading(LOADING_TITLE, LOADING_MESSAGE);
        });
    }

    /// Hides the loading indicator; a hide without a prior show is ignored.
    pub fn hide_loading(&self) {
        let presenter = Arc::clone(&self.presenter);
        let visible = Arc::clone(&self.loading_visible);

        self.ui.run(move || {
            if !visible.swap(false, Ordering::AcqRel) {
                warn!(target: "reporter", "hide_loading without a visible indicator");
                return;
            }
            presenter.hide_loading();
        });
    }

    pub fn show_toast(&self, text: impl Into<String>) {
        let text = text.into();
        let presenter = Arc::clone(&self.presenter);
        self.ui.run(move || presenter.show_toast(&text));
    }

    //--- Fatal Path -------------------------------------------------------

    /// Halts rendering, then shows the fatal dialog and ends the process.
    ///
    /// Safe to call from any thread, any number of times.
    pub fn terminate_application(&self, message: impl Into<String>) {
        let message = message.into();

        if self.halt_rendering() {
            debug!(target: "reporter", "Already terminating, ignoring: {}", message);
            return;
        }

        error!(target: "reporter", "Fatal error: {}", message);

        let dialog = MessageDialog::fatal(message);
        let presenter = Arc::clone(&self.presenter);
        let terminator = Arc::clone(&self.terminator);

        self.ui.run(move || {
            if presenter.show_message(&dialog) == DialogOutcome::Dismiss {
                warn!(target: "reporter", "Fatal dialog dismissed without terminating");
            }
            terminator.terminate(ExitProcess::FATAL_EXIT_CODE);
        });
    }

    /// Marks the reporter as terminating and halts the attached control.
    /// Returns whether termination had already begun.
    fn halt_rendering(&self) -> bool {
        // Flag and halt under the slot lock so no attach lands in between.
        let slot = self.render_control.lock().unwrap_or_else(|e| e.into_inner());
        let already = self.terminating.swap(true, Ordering::AcqRel);
        if let Some(control) = slot.as_ref() {
            control.halt();
        }
        already
    }
}

impl std::fmt::Debug for FaultReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultReporter")
            .field("ui", &self.ui.id())
            .field("loading_visible", &self.loading_visible.load(Ordering::Relaxed))
            .field("terminating", &self.terminating.load(Ordering::Relaxed))
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reporter::testing::{
        recording_reporter as reporter, PresenterCall, RecordingPresenter, RecordingTerminator,
    };
    use crate::core::reporter::ui_thread::ui_channel;
    use std::thread;

    //=====================================================================
    // Construction
    //=====================================================================

    #[test]
    fn construction_off_ui_thread_fails() {
        let (ui, _queue) = ui_channel();

        let result = thread::spawn(move || {
            FaultReporter::new(ui, Arc::new(RecordingPresenter::default()), Arc::new(RecordingTerminator::default()))
                .map(|_| ())
        })
        .join()
        .unwrap();

        assert_eq!(result.unwrap_err().code(), ErrorCode::WrongThread);
    }

    //=====================================================================
    // Loading Indicator
    //=====================================================================

    #[test]
    fn show_then_hide_loading() {
        let (reporter, _queue, presenter, _) = reporter();

        reporter.show_loading();
        reporter.hide_loading();

        assert_eq!(
            presenter.calls(),
            vec![PresenterCall::ShowLoading, PresenterCall::HideLoading]
        );
    }

    #[test]
    fn hide_without_show_is_ignored() {
        let (reporter, _queue, presenter, _) = reporter();

        reporter.hide_loading();
        reporter.hide_loading();

        assert!(presenter.calls().is_empty());
    }

    #[test]
    fn double_show_presents_once() {
        let (reporter, _queue, presenter, _) = reporter();

        reporter.show_loading();
        reporter.show_loading();
        reporter.hide_loading();
        reporter.hide_loading();

        assert_eq!(
            presenter.calls(),
            vec![PresenterCall::ShowLoading, PresenterCall::HideLoading]
        );
    }

    #[test]
    fn loading_from_worker_thread_is_marshaled() {
        let (reporter, queue, presenter, _) = reporter();

        let remote = Arc::clone(&reporter);
        thread::spawn(move || {
            remote.show_loading();
            remote.hide_loading();
        })
        .join()
        .unwrap();

        assert!(presenter.calls().is_empty());
        queue.drain();
        assert_eq!(
            presenter.calls(),
            vec![PresenterCall::ShowLoading, PresenterCall::HideLoading]
        );
        assert_eq!(presenter.threads(), vec![reporter.ui_thread().id(); 2]);
    }

    //=====================================================================
    // Messages
    //=====================================================================

    #[test]
    fn dismissed_message_keeps_running() {
        let (reporter, _queue, presenter, terminator) = reporter();

        reporter.show_message("Info", "hello", false);

        assert_eq!(presenter.calls().len(), 1);
        assert!(terminator.exit_codes().is_empty());
    }

    #[test]
    fn terminating_message_ends_process() {
        let (reporter, _queue, _presenter, terminator) = reporter();

        reporter.show_message("Bye", "game over", true);

        assert_eq!(terminator.exit_codes(), vec![1]);
    }

    #[test]
    fn toast_is_forwarded() {
        let (reporter, _queue, presenter, _) = reporter();
        reporter.show_toast("Level 2");
        assert_eq!(presenter.calls(), vec![PresenterCall::Toast("Level 2".to_string())]);
    }

    //=====================================================================
    // Fatal Path
    //=====================================================================

    #[test]
    fn terminate_halts_before_dialog() {
        let (reporter, queue, presenter, terminator) = reporter();
        let control = RenderControl::new();
        reporter.attach_render_control(control.clone());
        presenter.watch(control.clone());

        let remote = Arc::clone(&reporter);
        thread::spawn(move || remote.terminate_application("surface lost"))
            .join()
            .unwrap();

        // Halted on the calling thread, dialog still pending on the UI queue
        assert!(control.is_halted());
        assert!(presenter.calls().is_empty());

        queue.drain();

        assert_eq!(
            presenter.calls(),
            vec![PresenterCall::Message {
                title: "Fatal error occurred".to_string(),
                message: "surface lost".to_string(),
                cancelable: false,
            }]
        );
        assert_eq!(presenter.halted_at_show(), vec![true]);
        assert_eq!(terminator.exit_codes(), vec![1]);
    }

    #[test]
    fn repeated_terminate_shows_one_dialog() {
        let (reporter, queue, presenter, terminator) = reporter();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let remote = Arc::clone(&reporter);
                thread::spawn(move || remote.terminate_application(format!("error {}", i)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        reporter.terminate_application("late error");
        queue.drain();

        assert_eq!(presenter.calls().len(), 1);
        assert_eq!(terminator.exit_codes(), vec![1]);
        assert!(reporter.is_terminating());
    }

    #[test]
    fn control_attached_after_terminate_is_halted() {
        let (reporter, _queue, _presenter, _terminator) = reporter();

        reporter.terminate_application("early");
        let control = RenderControl::new();
        reporter.attach_render_control(control.clone());

        assert!(control.is_halted());
    }

    #[test]
    fn attach_racing_terminate_is_always_halted() {
        for _ in 0..200 {
            let (reporter, _queue, _presenter, _terminator) = reporter();
            let control = RenderControl::new();

            let attacher = {
                let reporter = Arc::clone(&reporter);
                let control = control.clone();
                thread::spawn(move || reporter.attach_render_control(control))
            };
            let terminator = {
                let reporter = Arc::clone(&reporter);
                thread::spawn(move || reporter.terminate_application("racing"))
            };
            attacher.join().unwrap();
            terminator.join().unwrap();

            assert!(control.is_halted());
        }
    }
}
