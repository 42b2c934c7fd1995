//=========================================================================
// Render Control
//=========================================================================
//
// Shared draw-mode flag between the UI side and the render thread.
//
//   Continuous ──pause()──> OnDemand ──resume()──> Continuous
//        │                     │
//        └──────halt()─────────┴──> Halted (permanent)
//
// The render thread reads the mode once per frame. Writers are the
// lifecycle bridge (pause/resume) and the fault reporter (halt).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

//=== RenderMode ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RenderMode {
    /// A frame is drawn every tick.
    Continuous = 0,
    /// Paused; frames are drawn only when explicitly requested.
    OnDemand = 1,
    /// Stopped after a fatal error; never leaves this mode.
    Halted = 2,
}

impl RenderMode {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Continuous,
            1 => Self::OnDemand,
            _ => Self::Halted,
        }
    }
}

//=== RenderControl =======================================================

/// Cloneable handle to the shared render mode.
#[derive(Debug, Clone)]
pub struct RenderControl {
    mode: Arc<AtomicU8>,
}

impl RenderControl {
    pub fn new() -> Self {
        Self {
            mode: Arc::new(AtomicU8::new(RenderMode::Continuous as u8)),
        }
    }

    pub fn mode(&self) -> RenderMode {
        RenderMode::from_raw(self.mode.load(Ordering::Acquire))
    }

    pub fn should_draw(&self) -> bool {
        self.mode() == RenderMode::Continuous
    }

    pub fn is_halted(&self) -> bool {
        self.mode() == RenderMode::Halted
    }

    /// Switches to on-demand drawing unless halted.
    pub fn pause(&self) {
        self.transition(RenderMode::Continuous, RenderMode::OnDemand);
    }

    /// Switches back to continuous drawing unless halted.
    pub fn resume(&self) {
        self.transition(RenderMode::OnDemand, RenderMode::Continuous);
    }

    /// Stops drawing for the rest of the session.
    pub fn halt(&self) {
        self.mode.store(RenderMode::Halted as u8, Ordering::Release);
    }

    fn transition(&self, from: RenderMode, to: RenderMode) {
        let _ = self.mode.compare_exchange(
            from as u8,
            to as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

impl Default for RenderControl {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
