//=========================================================================
// Game
//=========================================================================
//
// The Pac-Man game engine driven by the host through `NativeEngine`.
//
// Layers:
// ```text
//   PacmanEngine        frames, swipes, loading, toasts
//        ↓
//   GameSession         rules: dots, tunnels, collisions, levels
//        ↓
//   PacmanController    AiController      Scheduler
//        ↓                   ↓
//   Actor / FrameAnimator    Map / DotsGrid   (loaded by GameLoader)
// ```
//
//=========================================================================

//=== Module Declarations =================================================

pub mod actor;
pub mod animator;
pub mod dots;
pub mod engine;
pub mod geometry;
pub mod ghosts;
pub mod loader;
pub mod map;
pub mod pacman;
pub mod scheduler;
pub mod session;

//=== Public API ==========================================================

pub use engine::PacmanEngine;
pub use geometry::{CellIndex, MoveDirection, Point, Region};
pub use ghosts::{GhostKind, GhostState};
pub use loader::GameLoader;
pub use map::{Map, MapTexture};
pub use session::{DrawItem, GameSession, SessionEvent, SessionStatus, Sprite};
