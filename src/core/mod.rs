//=========================================================================
// Core
//=========================================================================
//
// Host-side systems shared by every engine implementation.
//
// Responsibilities:
// - Classify the screen and negotiate the drawing surface
// - Drive the engine through its lifecycle and forward input
// - Run the render thread at a fixed pace
// - Report fatal errors on the UI thread
//
// Threads:
// ```text
//  UI Thread                          Render Thread
//  ┌───────────────────────────┐     ┌──────────────────────────┐
//  │ LifecycleBridge           │     │ ConfigChooser            │
//  │ InputForwarder            │     │ SurfaceContext           │
//  │ UiQueue::drain()          │     │ draw_frame() @ fps       │
//  │   └─ FaultReporter dialogs│     │                          │
//  └───────────┬───────────────┘     └───────────▲──────────────┘
//              │       RenderCommand (crossbeam) │
//              └─────────────────────────────────┘
//                 RenderControl (atomic, shared)
// ```
//
//=========================================================================

//=== Module Declarations =================================================

pub mod assets;
pub mod error;
pub mod input;
pub mod lifecycle;
pub mod logging;
pub mod render;
pub mod reporter;
pub mod screen;
pub mod surface;

//=== Public API ==========================================================

pub use assets::{AssetSource, DirectoryAssets, MemoryAssets};
pub use error::{EngineError, ErrorCode};
pub use lifecycle::{HostContext, LifecycleBridge, LifecycleState, NativeEngine, SharedEngine};
pub use reporter::{DialogOutcome, DialogPresenter, FaultReporter, LogPresenter};
pub use screen::{DisplayMetrics, ScreenDensity, ScreenProfile, ScreenSize};
pub use surface::{RenderControl, SurfaceConfigRequest};
