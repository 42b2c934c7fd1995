//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use pacman::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Host entry point
pub use crate::engine::{Engine, EngineBuilder};

// Engine seam and host context
pub use crate::core::lifecycle::{HostContext, NativeEngine};
pub use crate::core::error::{EngineError, ErrorCode};
pub use crate::core::assets::{AssetSource, DirectoryAssets};

// Host services
pub use crate::core::reporter::{DialogOutcome, DialogPresenter, FaultReporter};
pub use crate::core::screen::{DisplayMetrics, ScreenProfile};
pub use crate::core::surface::SurfaceConfigRequest;

// Game
pub use crate::game::{DrawItem, GameSession, MoveDirection, PacmanEngine, Sprite};
