//=========================================================================
// Display Surface
//=========================================================================
//
// Framebuffer config negotiation, context ownership and the shared
// render-mode flag.
//
// Components:
// - `display`: the EGL seam and its in-memory implementation
// - `config`: config selection and context creation
// - `render_mode`: continuous / on-demand / halted drawing
//
//=========================================================================

//=== Module Declarations =================================================

pub mod config;
pub mod display;
pub mod render_mode;

//=== Public API ==========================================================

pub use config::{ConfigChooser, ContextFactory, SurfaceConfigRequest, SurfaceContext};
pub use display::{ConfigAttributes, EglDisplay, EglInt, MemoryContext, MemoryDisplay};
pub use render_mode::{RenderControl, RenderMode};
