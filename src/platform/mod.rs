//=========================================================================
// Platform Subsystem
//
// Hosts the engine in a Winit window: the desktop stand-in for the
// Android activity.
//
// Architecture:
// ```text
//  Main (UI) Thread:                      Render Thread:
//  ┌───────────────────────────────┐     ┌────────────────────────┐
//  │  Winit Event Loop             │     │  RenderThread          │
//  │   resumed / suspended         │     │   surface_changed      │
//  │    └─ LifecycleBridge         │     │   draw_frame @ fps     │
//  │   Touch / left mouse          │     │                        │
//  │    └─ InputProcessor          │     └───────────▲────────────┘
//  │        └─ InputForwarder      │                 │
//  │   Resized ────────────────────┼── RenderCommand ┘
//  │   about_to_wait               │
//  │    └─ UiQueue::drain()        │
//  └───────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Window on first resume**: the window, the engine session and the
//   render thread come up in the first `resumed()`; later resumes only
//   resume the bridge
// - **Synchronous input**: every pointer event is forwarded as it
//   arrives, no batching
// - **UI tasks**: reporter dialogs posted from other threads run in
//   `about_to_wait()`
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== External Crates =====================================================

use std::sync::Arc;

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::input::InputForwarder;
use crate::core::lifecycle::{LifecycleBridge, NativeEngine};
use crate::core::render::{RenderSettings, RenderThread};
use crate::core::reporter::{FaultReporter, UiQueue};
use crate::core::screen::DisplayMetrics;
use crate::core::surface::{MemoryDisplay, RenderControl};
use input_processor::{InputProcessor, PointerEvent};

//=== WindowSettings ======================================================

#[derive(Debug, Clone)]
pub(crate) struct WindowSettings {
    pub title: String,
    /// Logical size of the window at creation.
    pub size: (u32, u32),
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are typically fatal - if the event loop can't be created,
/// the engine cannot run.
#[derive(Debug)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    EventLoopCreation(winit::error::EventLoopError),

    /// Event loop execution error (rare, indicates corruption).
    EventLoopExecution(winit::error::EventLoopError),
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

//=== Platform ============================================================

/// Window, lifecycle and input host for one engine.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(..)` - nothing is created yet
/// 2. **Execution**: `platform.run()` - starts the event loop
/// 3. **First resume**: window, screen classification, engine start,
///    render thread
/// 4. **Shutdown**: close request → render thread joined, engine stopped
///
/// # Thread Safety
///
/// Lives on the main thread. The engine is shared with the render thread
/// through the bridge's `SharedEngine`.
pub(crate) struct Platform<E: NativeEngine> {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,
    window_settings: WindowSettings,

    bridge: LifecycleBridge<E>,
    forwarder: InputForwarder<E>,
    input_processor: InputProcessor,

    reporter: Arc<FaultReporter>,
    ui_queue: UiQueue,

    render_control: RenderControl,
    render_settings: RenderSettings,
    render: Option<RenderThread>,

    /// Replaces the metrics derived from the window when set.
    metrics_override: Option<DisplayMetrics>,
}

impl<E: NativeEngine> Platform<E> {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(
        bridge: LifecycleBridge<E>,
        reporter: Arc<FaultReporter>,
        ui_queue: UiQueue,
        render_control: RenderControl,
        render_settings: RenderSettings,
        window_settings: WindowSettings,
        metrics_override: Option<DisplayMetrics>,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        let forwarder = InputForwarder::new(Arc::clone(bridge.engine()));

        Self {
            window: None,
            window_settings,
            bridge,
            forwarder,
            input_processor: InputProcessor::new(),
            reporter,
            ui_queue,
            render_control,
            render_settings,
            render: None,
            metrics_override,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new()
            .map_err(PlatformError::EventLoopCreation)?;

        event_loop.run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Screen classification, engine start and the render thread.
    fn launch(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        let metrics = self
            .metrics_override
            .unwrap_or_else(|| DisplayMetrics::from_window(size.width, size.height, scale_factor));

        if self.bridge.create(&metrics).is_err() || self.bridge.start().is_err() {
            return;
        }

        match RenderThread::spawn(
            MemoryDisplay::with_common_configs(),
            Arc::clone(self.bridge.engine()),
            self.render_control.clone(),
            Arc::clone(&self.reporter),
            self.render_settings,
        ) {
            Ok(render) => {
                render.resize(size.width, size.height);
                self.render = Some(render);
            }
            Err(e) => self.reporter.terminate_application(e.to_string()),
        }
    }

    fn forward(&self, event: Option<PointerEvent>) {
        if let Some(event) = event {
            let handled = self.forwarder.forward(event.kind, event.x, event.y);
            trace!(target: "platform::input", "{:?} handled: {}", event.kind, handled);
        }
    }

    /// Joins the render thread, then stops the engine. Safe to repeat.
    fn shutdown(&mut self) {
        if let Some(render) = self.render.take() {
            if let Err(e) = render.shutdown() {
                error!(target: "platform", "Render shutdown failed: {}", e);
            }
        }
        self.bridge.stop();
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl<E: NativeEngine> ApplicationHandler for Platform<E> {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists, resuming engine");
            self.bridge.resume();
            return;
        }

        let (width, height) = self.window_settings.size;
        let attrs = WindowAttributes::default()
            .with_title(self.window_settings.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                let scale_factor = window.scale_factor();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    scale_factor
                );
                self.window = Some(window);
                self.launch(size, scale_factor);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.reporter.terminate_application(format!("Window creation failed: {}", e));
                event_loop.exit();
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "Application suspended");
        self.bridge.pause();
    }

    /// Handles per-window events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                debug!(target: "platform", "Resized to {}x{}", size.width, size.height);
                if let Some(render) = &self.render {
                    render.resize(size.width, size.height);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input_processor
                    .process_mouse_move(position.x as f32, position.y as f32);
                self.forward(event);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(button, state);
                self.forward(event);
            }

            WindowEvent::Touch(touch) => {
                let event = self.input_processor.process_touch(
                    touch.id,
                    touch.phase,
                    touch.location.x as f32,
                    touch.location.y as f32,
                );
                self.forward(event);
            }

            WindowEvent::RedrawRequested => {
                if let Some(render) = &self.render {
                    render.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.ui_queue.drain();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
        self.ui_queue.drain();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::MemoryAssets;
    use crate::core::input::TouchKind;
    use crate::core::lifecycle::{share, LifecycleState};
    use crate::core::lifecycle::testing::{EngineCall, RecordingEngine};
    use crate::core::reporter::testing::recording_reporter;

    fn platform() -> Platform<RecordingEngine> {
        let (reporter, queue, _presenter, _terminator) = recording_reporter();
        let control = RenderControl::new();
        reporter.attach_render_control(control.clone());
        let bridge = LifecycleBridge::new(
            share(RecordingEngine::default()),
            Arc::clone(&reporter),
            Arc::new(MemoryAssets::new()),
            control.clone(),
        );

        Platform::new(
            bridge,
            reporter,
            queue,
            control,
            RenderSettings::default(),
            WindowSettings {
                title: "Pac-Man".to_string(),
                size: (448, 576),
            },
            None,
        )
    }

    fn calls(platform: &Platform<RecordingEngine>) -> Vec<EngineCall> {
        platform.bridge.engine().lock().unwrap().calls.clone()
    }

    //=====================================================================
    // Platform Tests
    //=====================================================================

    #[test]
    fn platform_creation() {
        let platform = platform();
        assert!(platform.window().is_none(), "Window should be created lazily");
        assert!(platform.render.is_none());
        assert_eq!(platform.bridge.state(), LifecycleState::Uninitialized);
    }

    #[test]
    fn pointer_events_reach_the_engine() {
        let platform = platform();

        platform.forward(Some(PointerEvent {
            kind: TouchKind::Press,
            x: 3.0,
            y: 4.0,
        }));
        platform.forward(None);

        assert_eq!(calls(&platform), vec![EngineCall::Touch(1, 3.0, 4.0)]);
    }

    #[test]
    fn launch_with_unsupported_screen_fails_before_the_engine() {
        let mut platform = platform();
        platform.metrics_override = Some(DisplayMetrics::new(2, 213));

        platform.launch(PhysicalSize::new(448, 576), 1.0);

        assert_eq!(platform.bridge.state(), LifecycleState::Failed);
        assert!(platform.render.is_none());
        assert!(calls(&platform).is_empty());
        assert!(platform.render_control.is_halted());
    }

    #[test]
    fn launch_starts_engine_and_renderer() {
        let mut platform = platform();

        platform.launch(PhysicalSize::new(448, 576), 1.0);
        assert_eq!(platform.bridge.state(), LifecycleState::Running);
        assert!(platform.render.is_some());

        platform.shutdown();
        assert_eq!(platform.bridge.state(), LifecycleState::Stopped);
        assert!(platform.render.is_none());

        let calls = calls(&platform);
        assert!(matches!(calls.first(), Some(EngineCall::Start(_))));
        assert_eq!(calls.last(), Some(&EngineCall::Stop));
    }

    #[test]
    fn repeated_shutdown_is_harmless() {
        let mut platform = platform();
        platform.shutdown();
        platform.shutdown();
        assert_eq!(platform.bridge.state(), LifecycleState::Uninitialized);
    }

    //=====================================================================
    // PlatformError Tests
    //=====================================================================

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }

    #[test]
    fn platform_error_display_format() {
        fn assert_display<T: std::fmt::Display>() {}
        assert_display::<PlatformError>();
    }
}
