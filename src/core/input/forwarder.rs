//=========================================================================
// Input Forwarder
//=========================================================================
//
// One engine call per host pointer event, synchronously, on the UI
// thread. No buffering or coalescing.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::touch::TouchKind;
use crate::core::lifecycle::{lock_engine, NativeEngine, SharedEngine};

//=== InputForwarder ======================================================

pub struct InputForwarder<E: NativeEngine> {
    engine: SharedEngine<E>,
}

impl<E: NativeEngine> InputForwarder<E> {
    pub fn new(engine: SharedEngine<E>) -> Self {
        Self { engine }
    }

    /// Forwards one event, including `TouchKind::Other` as the sentinel
    /// code. Returns the engine's "handled" answer unchanged; the host
    /// does not act on it.
    pub fn forward(&self, kind: TouchKind, x: f32, y: f32) -> bool {
        let code = kind.code();
        trace!(target: "platform::input", "touch {:?} ({}) at {:.1},{:.1}", kind, code, x, y);

        match lock_engine(&self.engine) {
            Ok(mut engine) => engine.touch_event(code, x, y),
            Err(e) => {
                warn!(target: "platform::input", "Touch dropped: {}", e);
                false
            }
        }
    }
}

impl<E: NativeEngine> Clone for InputForwarder<E> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
