//=========================================================================
// Native Engine Interface
//=========================================================================
//
// The contract between the host shell and the game engine, plus the
// explicit context object handed to the engine for the session.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::{Arc, Mutex, MutexGuard};

//=== Internal Dependencies ===============================================

use crate::core::assets::AssetSource;
use crate::core::error::{EngineError, ErrorCode};
use crate::core::reporter::FaultReporter;
use crate::core::screen::ScreenProfile;

//=== HostContext =========================================================

/// Host services available to the engine between `start` and `stop`.
#[derive(Clone)]
pub struct HostContext {
    pub profile: ScreenProfile,
    pub reporter: Arc<FaultReporter>,
    pub assets: Arc<dyn AssetSource>,
}

impl std::fmt::Debug for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext")
            .field("profile", &self.profile)
            .field("reporter", &self.reporter)
            .finish_non_exhaustive()
    }
}

//=== NativeEngine ========================================================

/// Game engine driven by the host.
///
/// Lifecycle calls arrive on the UI thread, `surface_changed` and
/// `draw_frame` on the render thread, `touch_event` on the UI thread.
pub trait NativeEngine: Send + 'static {
    /// Begins a session. The engine keeps `context` until [`stop`].
    ///
    /// [`stop`]: NativeEngine::stop
    fn start(&mut self, context: HostContext) -> Result<(), EngineError>;

    /// Ends the session and releases the host context.
    fn stop(&mut self);

    fn pause(&mut self);

    fn resume(&mut self);

    /// New drawable size in pixels. An error is fatal.
    fn surface_changed(&mut self, width: u32, height: u32) -> Result<(), EngineError>;

    /// Produces one frame. An error is fatal.
    fn draw_frame(&mut self) -> Result<(), EngineError>;

    /// One pointer event; `code` follows the touch code protocol.
    fn touch_event(&mut self, code: i32, x: f32, y: f32) -> bool;
}

//=== SharedEngine ========================================================

/// Engine shared between the UI and render threads.
pub type SharedEngine<E> = Arc<Mutex<E>>;

pub fn share<E: NativeEngine>(engine: E) -> SharedEngine<E> {
    Arc::new(Mutex::new(engine))
}

/// Locks the engine; a poisoned lock means a previous call panicked.
pub fn lock_engine<E>(engine: &SharedEngine<E>) -> Result<MutexGuard<'_, E>, EngineError> {
    engine
        .lock()
        .map_err(|_| EngineError::new(ErrorCode::InvalidState, "engine lock poisoned"))
}
