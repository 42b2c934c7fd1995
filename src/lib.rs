//=========================================================================
// Pac-Man Library Root
//
// This crate hosts the Pac-Man game engine in a desktop window the way
// the Android shell hosts it on a device.
//
// Responsibilities:
// - Expose the host entry point (`Engine`, `EngineBuilder`)
// - Expose the host systems (`core`) and the game (`game`)
// - Keep the Winit integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use pacman::EngineBuilder;
//
// fn main() {
//     EngineBuilder::new().build().run();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the host systems: screen classification, surface
// negotiation, lifecycle, input forwarding, fault reporting and the
// render thread.
//
// `game` contains the engine behind the `NativeEngine` seam.
//
pub mod core;
pub mod game;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit window and event loop and is kept
// private, as it is not part of the public API surface.
//
// `engine` defines the host entry point and its builder.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
pub use platform::PlatformError;
