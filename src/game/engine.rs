//=========================================================================
// Pac-Man Engine
//=========================================================================
//
// The game behind the `NativeEngine` seam.
//
// Threads:
// - UI thread: start / stop / pause / resume / touch_event
// - Render thread: surface_changed / draw_frame
//
// Frame Flow:
// ```text
//   draw_frame
//     ├─ elapsed wall time ─> fixed 40 ms steps (at most 5 per frame)
//     ├─ latest swipe ─> Pac-Man direction (or restart after game over)
//     ├─ session events ─> toasts
//     └─ draw list for the frame
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use super::geometry::MoveDirection;
use super::loader::{EngineConfig, GameLoader};
use super::map::MapTexture;
use super::session::{DrawItem, GameSession, SessionEvent, SessionStatus};
use crate::core::error::{EngineError, ErrorCode};
use crate::core::input::{Gesture, GestureRecognizer};
use crate::core::lifecycle::{HostContext, NativeEngine};

//=== Constants ===========================================================

/// Length of one simulation step in milliseconds.
pub const STEP_MS: u64 = 40;
/// Steps a single frame may catch up on after a stall.
pub const MAX_STEPS_PER_FRAME: u64 = 5;

impl From<Gesture> for MoveDirection {
    fn from(gesture: Gesture) -> Self {
        match gesture {
            Gesture::SwipeLeft => MoveDirection::Left,
            Gesture::SwipeRight => MoveDirection::Right,
            Gesture::SwipeUp => MoveDirection::Up,
            Gesture::SwipeDown => MoveDirection::Down,
        }
    }
}

//=== PacmanEngine ========================================================

#[derive(Default)]
pub struct PacmanEngine {
    context: Option<HostContext>,
    loader: Option<GameLoader>,
    config: Option<EngineConfig>,

    session: Option<GameSession>,
    surface: (u32, u32),
    texture: Option<MapTexture>,
    frame: Vec<DrawItem>,

    gestures: GestureRecognizer,
    paused: bool,
    last_frame: Option<Instant>,
    accumulator: u64,
}

impl PacmanEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Maze texture for the current surface.
    pub fn texture(&self) -> Option<&MapTexture> {
        self.texture.as_ref()
    }

    /// Draw list produced by the last `draw_frame`.
    pub fn frame(&self) -> &[DrawItem] {
        &self.frame
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Runs the game forward by `dt` milliseconds of wall time.
    pub fn advance(&mut self, dt: u64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let Some(gesture) = self.gestures.take() {
            if session.status() == SessionStatus::GameOver {
                session.restart();
            } else {
                session.change_direction(gesture.into());
            }
        }

        self.accumulator = (self.accumulator + dt).min(STEP_MS * MAX_STEPS_PER_FRAME);
        while self.accumulator >= STEP_MS {
            session.update(STEP_MS);
            self.accumulator -= STEP_MS;
        }

        for event in session.take_events() {
            let text = match event {
                SessionEvent::GhostEaten(kind) => {
                    debug!(target: "game", "{:?} back to the house", kind);
                    continue;
                }
                SessionEvent::LifeLost { lives } => format!("{} lives left", lives),
                SessionEvent::LevelCompleted { level } => format!("Level {} completed", level),
                SessionEvent::GameOver { score } => format!("Game over! Score: {}", score),
            };
            if let Some(context) = &self.context {
                context.reporter.show_toast(text);
            }
        }
    }

    fn load_session(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        let (Some(context), Some(loader), Some(config)) = (&self.context, &self.loader, &self.config) else {
            return Err(EngineError::new(ErrorCode::InvalidState, "surface changed before start"));
        };

        let multiplier = config.multiplier(width, height);
        if multiplier == 0 {
            return Err(EngineError::new(
                ErrorCode::BadArgument,
                format!("surface {}x{} is smaller than the base resolution", width, height),
            ));
        }

        context.reporter.show_loading();
        let loaded = GameSession::load(loader, multiplier, (width, height));
        context.reporter.hide_loading();

        let session = loaded?;
        self.texture = Some(session.map().generate_texture());
        self.session = Some(session);
        self.surface = (width, height);
        self.accumulator = 0;
        Ok(())
    }
}

impl NativeEngine for PacmanEngine {
    fn start(&mut self, context: HostContext) -> Result<(), EngineError> {
        let loader = GameLoader::new(context.assets.clone());
        let config = loader.load_config()?;

        info!(
            target: "game",
            "Engine started: base {}x{}, screen {:?}",
            config.base_resolution.width,
            config.base_resolution.height,
            context.profile
        );
        self.loader = Some(loader);
        self.config = Some(config);
        self.context = Some(context);
        Ok(())
    }

    fn stop(&mut self) {
        info!(target: "game", "Engine stopped");
        self.session = None;
        self.texture = None;
        self.frame.clear();
        self.surface = (0, 0);
        self.loader = None;
        self.config = None;
        self.context = None;
        self.gestures = GestureRecognizer::new();
        self.paused = false;
        self.last_frame = None;
        self.accumulator = 0;
    }

    fn pause(&mut self) {
        debug!(target: "game", "Engine paused");
        self.paused = true;
        self.last_frame = None;
    }

    fn resume(&mut self) {
        debug!(target: "game", "Engine resumed");
        self.paused = false;
        self.last_frame = None;
    }

    fn surface_changed(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        if self.session.is_some() && self.surface == (width, height) {
            debug!(target: "game", "Surface unchanged at {}x{}", width, height);
            return Ok(());
        }

        info!(target: "game", "Surface changed to {}x{}", width, height);
        self.load_session(width, height)
    }

    fn draw_frame(&mut self) -> Result<(), EngineError> {
        if self.session.is_none() {
            trace!(target: "game", "No session to draw");
            return Ok(());
        }

        let now = Instant::now();
        let elapsed = self
            .last_frame
            .map(|last| now.duration_since(last).as_millis() as u64)
            .unwrap_or(0);
        self.last_frame = Some(now);

        if !self.paused {
            self.advance(elapsed);
        }

        if let Some(session) = &self.session {
            self.frame = session.draw_list();
        }
        Ok(())
    }

    fn touch_event(&mut self, code: i32, x: f32, y: f32) -> bool {
        self.gestures.push(code, x, y)
    }
}

impl std::fmt::Debug for PacmanEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacmanEngine")
            .field("started", &self.context.is_some())
            .field("surface", &self.surface)
            .field("session", &self.session)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
