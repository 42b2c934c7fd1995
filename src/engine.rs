//=========================================================================
// Pac-Man Host
//
// Main entry point: configures and runs the host shell around an engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_fps()              ├─ initializes logging
//         ├─ with_channel_capacity() ├─ binds the reporter to this thread
//         ├─ with_surface_request()  └─ runs platform
//         ├─ with_asset_dir()           blocks until exit
//         ├─ with_display_metrics()
//         ├─ with_presenter()
//         └─ with_engine()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;
use std::sync::Arc;

use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::assets::DirectoryAssets;
use crate::core::lifecycle::{share, LifecycleBridge, NativeEngine};
use crate::core::logging::{init_logging, LoggingConfig};
use crate::core::render::RenderSettings;
use crate::core::reporter::{ui_channel, DialogPresenter, FaultReporter, LogPresenter};
use crate::core::screen::DisplayMetrics;
use crate::core::surface::{RenderControl, SurfaceConfigRequest};
use crate::game::PacmanEngine;
use crate::platform::{Platform, WindowSettings};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **FPS**: 60.0 (render thread frames per second)
/// - **Channel capacity**: 64 render commands
/// - **Surface**: RGB565, no depth or stencil minimum
/// - **Assets**: `./assets`
/// - **Screen**: classified from the window
/// - **Dialogs**: [`LogPresenter`]
///
/// # Examples
///
/// Simple usage with defaults:
/// ```no_run
/// use pacman::EngineBuilder;
///
/// EngineBuilder::new().build().run();
/// ```
///
/// Advanced configuration:
/// ```no_run
/// use pacman::EngineBuilder;
/// use pacman::core::{DisplayMetrics, SurfaceConfigRequest};
///
/// EngineBuilder::new()
///     .with_fps(30.0)                                    // Battery saver
///     .with_surface_request(SurfaceConfigRequest::opaque(16, 8))
///     .with_display_metrics(DisplayMetrics::new(2, 240)) // Normal / hdpi
///     .with_asset_dir("/usr/share/pacman")
///     .build()
///     .run();
/// ```
///
/// Another engine behind the same host:
/// ```no_run
/// # use pacman::EngineBuilder;
/// # use pacman::core::{EngineError, HostContext, NativeEngine};
/// struct Blank;
///
/// impl NativeEngine for Blank {
///     fn start(&mut self, _: HostContext) -> Result<(), EngineError> { Ok(()) }
///     fn stop(&mut self) {}
///     fn pause(&mut self) {}
///     fn resume(&mut self) {}
///     fn surface_changed(&mut self, _: u32, _: u32) -> Result<(), EngineError> { Ok(()) }
///     fn draw_frame(&mut self) -> Result<(), EngineError> { Ok(()) }
///     fn touch_event(&mut self, _: i32, _: f32, _: f32) -> bool { false }
/// }
///
/// EngineBuilder::new().with_engine(Blank).build().run();
/// ```
pub struct EngineBuilder<E: NativeEngine = PacmanEngine> {
    engine: E,
    fps: f64,
    channel_capacity: usize,
    surface_request: SurfaceConfigRequest,
    asset_dir: PathBuf,
    display_metrics: Option<DisplayMetrics>,
    presenter: Arc<dyn DialogPresenter>,
    window: WindowSettings,
    logging: LoggingConfig,
}

impl EngineBuilder<PacmanEngine> {
    /// Creates a new builder for the Pac-Man engine with default settings.
    pub fn new() -> Self {
        Self {
            engine: PacmanEngine::new(),
            fps: 60.0,
            channel_capacity: 64,
            surface_request: SurfaceConfigRequest::default(),
            asset_dir: PathBuf::from("assets"),
            display_metrics: None,
            presenter: Arc::new(LogPresenter),
            window: WindowSettings {
                title: "Pac-Man".to_string(),
                size: (448, 576),
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EngineBuilder<PacmanEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: NativeEngine> EngineBuilder<E> {
    /// Sets the target frames per second of the render thread.
    ///
    /// While the lifecycle is suspended the thread only draws on request,
    /// whatever this value.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0.0`.
    pub fn with_fps(mut self, fps: f64) -> Self {
        assert!(fps > 0.0, "FPS must be positive, got {}", fps);
        self.fps = fps;
        self
    }

    /// Sets the capacity of the UI → render command channel.
    ///
    /// Default: 64
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the surface configuration the render thread negotiates for.
    pub fn with_surface_request(mut self, request: SurfaceConfigRequest) -> Self {
        self.surface_request = request;
        self
    }

    /// Sets the directory game data is loaded from.
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    /// Uses fixed screen metrics instead of deriving them from the window.
    pub fn with_display_metrics(mut self, metrics: DisplayMetrics) -> Self {
        self.display_metrics = Some(metrics);
        self
    }

    /// Sets how dialogs, the loading indicator and toasts are shown.
    pub fn with_presenter(mut self, presenter: Arc<dyn DialogPresenter>) -> Self {
        self.presenter = presenter;
        self
    }

    /// Sets the window title and logical size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window(mut self, title: impl Into<String>, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.window = WindowSettings {
            title: title.into(),
            size: (width, height),
        };
        self
    }

    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Replaces the engine, keeping every other setting.
    pub fn with_engine<F: NativeEngine>(self, engine: F) -> EngineBuilder<F> {
        EngineBuilder {
            engine,
            fps: self.fps,
            channel_capacity: self.channel_capacity,
            surface_request: self.surface_request,
            asset_dir: self.asset_dir,
            display_metrics: self.display_metrics,
            presenter: self.presenter,
            window: self.window,
            logging: self.logging,
        }
    }

    /// Builds the engine instance. Nothing runs until [`Engine::run`].
    pub fn build(self) -> Engine<E> {
        info!(
            target: "platform",
            "Building host (FPS: {}, channel: {}, assets: {})",
            self.fps,
            self.channel_capacity,
            self.asset_dir.display()
        );

        Engine {
            engine: self.engine,
            render: RenderSettings {
                request: self.surface_request,
                fps: self.fps,
                channel_capacity: self.channel_capacity,
            },
            asset_dir: self.asset_dir,
            display_metrics: self.display_metrics,
            presenter: self.presenter,
            window: self.window,
            logging: self.logging,
        }
    }
}

//=== Engine ==============================================================

/// Configured host, ready to run.
///
/// # Architecture
///
/// ```text
/// Engine (Main / UI Thread)
///   ├─► FaultReporter + UiQueue (bound to this thread)
///   ├─► LifecycleBridge ─► NativeEngine (shared)
///   │
///   └─► Platform (Event Loop)
///         ├─► Window, pointer input
///         └─► RenderThread @ FPS (spawned on first resume)
/// ```
pub struct Engine<E: NativeEngine = PacmanEngine> {
    engine: E,
    render: RenderSettings,
    asset_dir: PathBuf,
    display_metrics: Option<DisplayMetrics>,
    presenter: Arc<dyn DialogPresenter>,
    window: WindowSettings,
    logging: LoggingConfig,
}

impl<E: NativeEngine> Engine<E> {
    //--- Execution --------------------------------------------------------

    /// Runs the host on the calling thread and blocks until the window
    /// closes. The calling thread becomes the UI thread.
    ///
    /// # Lifecycle
    ///
    /// 1. Initializes logging
    /// 2. Creates the UI task queue and the fault reporter on this thread
    /// 3. Runs the platform event loop (blocks here); the first resume
    ///    starts the engine and the render thread
    /// 4. On window close: render thread joined, engine stopped
    ///
    /// Fatal errors end the process through the reporter.
    pub fn run(self) {
        init_logging(self.logging.clone());
        info!(target: "platform", "Starting host runtime (FPS: {})", self.render.fps);

        //--- 1. Bind the reporter to the UI thread -----------------------
        let (ui, ui_queue) = ui_channel();
        let reporter = match FaultReporter::with_presenter(ui, Arc::clone(&self.presenter)) {
            Ok(reporter) => Arc::new(reporter),
            Err(e) => {
                error!(target: "platform", "Reporter unavailable: {}", e);
                return;
            }
        };

        let render_control = RenderControl::new();
        reporter.attach_render_control(render_control.clone());

        //--- 2. Wire the engine ------------------------------------------
        let bridge = LifecycleBridge::new(
            share(self.engine),
            Arc::clone(&reporter),
            Arc::new(DirectoryAssets::new(self.asset_dir)),
            render_control.clone(),
        );

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(
            bridge,
            reporter,
            ui_queue,
            render_control,
            self.render,
            self.window,
            self.display_metrics,
        );
        info!(target: "platform", "Platform initialized, entering event loop");

        if let Err(e) = platform.run() {
            error!(target: "platform", "Platform error: {}", e);
        }

        info!(target: "platform", "Host shutdown complete");
    }
}

impl<E: NativeEngine> std::fmt::Debug for Engine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("render", &self.render)
            .field("asset_dir", &self.asset_dir)
            .field("display_metrics", &self.display_metrics)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
