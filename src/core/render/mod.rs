//=========================================================================
// Render
//=========================================================================
//
// Render thread and the command channel feeding it.
//
// Components:
// - `command`: UI → render messages and per-frame collection
// - `thread`: the render thread itself
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod command;
pub mod thread;

//=== Public API ==========================================================

pub use command::RenderCommand;
pub use thread::{RenderSettings, RenderThread};
