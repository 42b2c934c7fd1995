//=========================================================================
// Input
//=========================================================================
//
// Pointer input from the host to the engine.
//
// Event Flow:
// ```text
// Platform (winit Touch / mouse)
//         ↓  TouchKind
//    InputForwarder ── touch_event(code, x, y) ──> NativeEngine
//                                                     ↓
//                                              GestureRecognizer
//                                                     ↓
//                                              Gesture (per update)
// ```
//
//=========================================================================

//=== Module Declarations =================================================

pub mod forwarder;
pub mod gesture;
pub mod touch;

//=== Public API ==========================================================

pub use forwarder::InputForwarder;
pub use gesture::{Gesture, GestureRecognizer};
pub use touch::{
    TouchCode, TouchKind, TOUCH_MOVE, TOUCH_PRESS, TOUCH_PROTOCOL_VERSION, TOUCH_RELEASE,
    TOUCH_UNHANDLED,
};
