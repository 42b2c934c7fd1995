//=========================================================================
// Lifecycle Bridge
//=========================================================================
//
// Maps host lifecycle callbacks onto engine calls.
//
// State machine:
// ```text
//   Uninitialized ──create()──> Ready ──start()──> Running
//        │                        ▲                 │   ▲
//        │ classification         │        pause()  │   │ resume()
//        │ failure                │                 ▼   │
//        ▼                        │               Suspended
//     Failed (absorbing)          │                 │
//                                 └──start()── Stopped <──stop()── Running/Suspended
// ```
//
// Nothing reaches the engine once the bridge is Failed. Transitions not
// shown above are logged and ignored.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::native::{lock_engine, HostContext, NativeEngine, SharedEngine};
use crate::core::assets::AssetSource;
use crate::core::error::EngineError;
use crate::core::reporter::FaultReporter;
use crate::core::screen::{DisplayMetrics, ScreenProfile};
use crate::core::surface::RenderControl;

//=== LifecycleState ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Ready,
    Running,
    Suspended,
    Stopped,
    Failed,
}

//=== LifecycleBridge =====================================================

/// Forwards lifecycle transitions to a [`NativeEngine`].
pub struct LifecycleBridge<E: NativeEngine> {
    state: LifecycleState,
    profile: Option<ScreenProfile>,
    engine: SharedEngine<E>,
    reporter: Arc<FaultReporter>,
    assets: Arc<dyn AssetSource>,
    render_control: RenderControl,
}

impl<E: NativeEngine> LifecycleBridge<E> {
    pub fn new(
        engine: SharedEngine<E>,
        reporter: Arc<FaultReporter>,
        assets: Arc<dyn AssetSource>,
        render_control: RenderControl,
    ) -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            profile: None,
            engine,
            reporter,
            assets,
            render_control,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn profile(&self) -> Option<ScreenProfile> {
        self.profile
    }

    pub fn engine(&self) -> &SharedEngine<E> {
        &self.engine
    }

    //--- Transitions ------------------------------------------------------

    /// Classifies the screen: Uninitialized → Ready, or → Failed.
    ///
    /// # Errors
    ///
    /// Returns the classification error after routing it through the
    /// reporter's fatal path.
    pub fn create(&mut self, metrics: &DisplayMetrics) -> Result<(), EngineError> {
        if !self.expect_state("create", &[LifecycleState::Uninitialized]) {
            return Ok(());
        }

        match ScreenProfile::classify(metrics) {
            Ok(profile) => {
                info!(
                    target: "lifecycle",
                    "Screen classified as {:?}/{:?}",
                    profile.size(),
                    profile.density()
                );
                self.profile = Some(profile);
                self.state = LifecycleState::Ready;
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Starts the engine session: Ready/Stopped → Running.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if !self.expect_state("start", &[LifecycleState::Ready, LifecycleState::Stopped]) {
            return Ok(());
        }

        let Some(profile) = self.profile else {
            // Ready implies a profile
            return Ok(());
        };

        let context = HostContext {
            profile,
            reporter: Arc::clone(&self.reporter),
            assets: Arc::clone(&self.assets),
        };

        let result = lock_engine(&self.engine).and_then(|mut engine| engine.start(context));
        match result {
            Ok(()) => {
                self.render_control.resume();
                self.state = LifecycleState::Running;
                info!(target: "lifecycle", "Engine started");
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Running → Suspended; drawing switches to on-demand.
    pub fn pause(&mut self) {
        if !self.expect_state("pause", &[LifecycleState::Running]) {
            return;
        }

        self.render_control.pause();
        if self.with_engine(|engine| engine.pause()) {
            self.state = LifecycleState::Suspended;
            debug!(target: "lifecycle", "Engine paused");
        }
    }

    /// Suspended → Running; drawing switches back to continuous.
    pub fn resume(&mut self) {
        if !self.expect_state("resume", &[LifecycleState::Suspended]) {
            return;
        }

        if self.with_engine(|engine| engine.resume()) {
            self.render_control.resume();
            self.state = LifecycleState::Running;
            debug!(target: "lifecycle", "Engine resumed");
        }
    }

    /// Running/Suspended → Stopped.
    pub fn stop(&mut self) {
        if !self.expect_state("stop", &[LifecycleState::Running, LifecycleState::Suspended]) {
            return;
        }

        self.render_control.pause();
        if self.with_engine(|engine| engine.stop()) {
            self.state = LifecycleState::Stopped;
            info!(target: "lifecycle", "Engine stopped");
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn expect_state(&self, operation: &str, allowed: &[LifecycleState]) -> bool {
        if allowed.contains(&self.state) {
            return true;
        }
        if self.state == LifecycleState::Failed {
            debug!(target: "lifecycle", "{} skipped: bridge failed", operation);
        } else {
            warn!(target: "lifecycle", "{} ignored in state {:?}", operation, self.state);
        }
        false
    }

    fn with_engine(&mut self, call: impl FnOnce(&mut E)) -> bool {
        let result = lock_engine(&self.engine).map(|mut engine| call(&mut *engine));
        match result {
            Ok(()) => true,
            Err(e) => {
                self.fail(&e);
                false
            }
        }
    }

    fn fail(&mut self, error: &EngineError) {
        self.state = LifecycleState::Failed;
        self.reporter.terminate_application(error.to_string());
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
