//=========================================================================
// Render Thread
//=========================================================================
//
// Dedicated thread owning the rendering context.
//
// Each tick:
//  1. Collects commands (resize, redraw, shutdown)
//  2. Forwards the latest size to the engine
//  3. Draws one frame while drawing is continuous (or on request)
//  4. Sleeps to maintain fixed pacing
//
// Context creation happens before the first tick and destruction after
// the last one, so no draw call ever overlaps either. Engine errors go
// through the reporter's fatal path, which halts drawing; the thread
// then idles until shutdown.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::command::{CommandCollector, RenderCommand, TickControl};
use crate::core::error::{EngineError, ErrorCode};
use crate::core::lifecycle::{lock_engine, NativeEngine, SharedEngine};
use crate::core::reporter::FaultReporter;
use crate::core::surface::{
    ConfigChooser, ContextFactory, EglDisplay, RenderControl, SurfaceConfigRequest,
};

//=== RenderSettings ======================================================

#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub request: SurfaceConfigRequest,
    pub fps: f64,
    pub channel_capacity: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            request: SurfaceConfigRequest::default(),
            fps: 60.0,
            channel_capacity: 64,
        }
    }
}

//=== RenderThread ========================================================

/// Handle to the running render thread.
pub struct RenderThread {
    sender: Sender<RenderCommand>,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    /// Spawns the render thread.
    ///
    /// Config negotiation and context creation run on the new thread;
    /// their failures are reported as fatal.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::ThreadFailed`] if the OS refuses the thread.
    pub fn spawn<D, E>(
        display: D,
        engine: SharedEngine<E>,
        control: RenderControl,
        reporter: Arc<FaultReporter>,
        settings: RenderSettings,
    ) -> Result<Self, EngineError>
    where
        D: EglDisplay + Send + 'static,
        E: NativeEngine,
    {
        assert!(settings.fps > 0.0, "FPS must be positive, got {}", settings.fps);

        let (sender, receiver) = bounded(settings.channel_capacity);
        let frame_duration = Duration::from_secs_f64(1.0 / settings.fps);

        let handle = thread::Builder::new()
            .name("render".to_string())
            .spawn(move || {
                let mut collector = CommandCollector::new(receiver);
                render_loop(
                    &display,
                    &engine,
                    &control,
                    &reporter,
                    settings.request,
                    &mut collector,
                    frame_duration,
                );
            })
            .map_err(|e| EngineError::new(ErrorCode::ThreadFailed, e.to_string()))?;

        info!(target: "render", "Render thread spawned ({} fps)", settings.fps);

        Ok(Self {
            sender,
            handle: Some(handle),
        })
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.send(RenderCommand::Resize { width, height });
    }

    pub fn request_redraw(&self) {
        self.send(RenderCommand::Redraw);
    }

    /// Stops the thread and waits for the context to be destroyed.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::ThreadFailed`] if the render thread panicked.
    pub fn shutdown(mut self) -> Result<(), EngineError> {
        self.join()
    }

    pub fn sender(&self) -> Sender<RenderCommand> {
        self.sender.clone()
    }

    fn send(&self, command: RenderCommand) {
        if self.sender.send(command).is_err() {
            warn!(target: "render", "Render thread gone, dropping {:?}", command);
        }
    }

    fn join(&mut self) -> Result<(), EngineError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        let _ = self.sender.send(RenderCommand::Shutdown);
        handle.join().map_err(|e| {
            error!(target: "render", "Render thread panicked: {:?}", e);
            EngineError::new(ErrorCode::ThreadFailed, "render thread panicked")
        })?;

        info!(target: "render", "Render thread terminated cleanly");
        Ok(())
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        let _ = self.join();
    }
}

//=== Render Loop =========================================================

fn render_loop<D, E>(
    display: &D,
    engine: &SharedEngine<E>,
    control: &RenderControl,
    reporter: &FaultReporter,
    request: SurfaceConfigRequest,
    collector: &mut CommandCollector,
    frame_duration: Duration,
) where
    D: EglDisplay,
    E: NativeEngine,
{
    //--- Context setup ----------------------------------------------------
    let config = match ConfigChooser::new(request).choose(display) {
        Ok(config) => config,
        Err(e) => {
            reporter.terminate_application(e.to_string());
            idle_until_shutdown(collector, frame_duration);
            return;
        }
    };

    let mut surface = match ContextFactory.create(display, &config) {
        Ok(surface) => surface,
        Err(e) => {
            reporter.terminate_application(e.to_string());
            idle_until_shutdown(collector, frame_duration);
            return;
        }
    };

    //--- Frame loop -------------------------------------------------------
    loop {
        let frame_start = Instant::now();

        if collector.collect_frame() == TickControl::Exit {
            debug!(target: "render", "Shutdown received");
            break;
        }

        if let Some((width, height)) = collector.take_resize() {
            if !control.is_halted() {
                debug!(target: "render", "Surface changed: {}x{}", width, height);
                let result = lock_engine(engine).and_then(|mut e| e.surface_changed(width, height));
                if let Err(e) = result {
                    reporter.terminate_application(e.to_string());
                }
            }
        }

        let redraw = collector.take_redraw();
        if control.should_draw() || (redraw && !control.is_halted()) {
            let result = lock_engine(engine).and_then(|mut e| e.draw_frame());
            if let Err(e) = result {
                reporter.terminate_application(e.to_string());
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }

    surface.destroy();
}

fn idle_until_shutdown(collector: &mut CommandCollector, frame_duration: Duration) {
    while collector.collect_frame() == TickControl::Continue {
        thread::sleep(frame_duration);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lifecycle::share;
    use crate::core::lifecycle::testing::{EngineCall, RecordingEngine};
    use crate::core::reporter::testing::{recording_reporter, PresenterCall};
    use crate::core::surface::{ConfigAttributes, MemoryDisplay};

    fn settings() -> RenderSettings {
        RenderSettings {
            fps: 200.0,
            ..RenderSettings::default()
        }
    }

    fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    //=====================================================================
    // Drawing
    //=====================================================================

    #[test]
    fn draws_and_destroys_context() {
        let (reporter, _queue, _presenter, _) = recording_reporter();
        let display = MemoryDisplay::with_common_configs();
        let engine = share(RecordingEngine::default());
        let control = RenderControl::new();

        let render = RenderThread::spawn(
            display.clone(),
            engine.clone(),
            control,
            reporter,
            settings(),
        )
        .unwrap();

        render.resize(640, 480);
        assert!(wait_for(|| engine.lock().unwrap().draw_count() >= 3));
        assert_eq!(display.live_contexts(), 1);

        render.shutdown().unwrap();

        assert_eq!(display.live_contexts(), 0);
        assert!(engine.lock().unwrap().calls.contains(&EngineCall::SurfaceChanged(640, 480)));
    }

    #[test]
    fn paused_control_stops_drawing() {
        let (reporter, _queue, _presenter, _) = recording_reporter();
        let engine = share(RecordingEngine::default());
        let control = RenderControl::new();
        control.pause();

        let render = RenderThread::spawn(
            MemoryDisplay::with_common_configs(),
            engine.clone(),
            control.clone(),
            reporter,
            settings(),
        )
        .unwrap();

        thread::sleep(Duration::from_millis(50));
        assert_eq!(engine.lock().unwrap().draw_count(), 0);

        render.request_redraw();
        assert!(wait_for(|| engine.lock().unwrap().draw_count() == 1));

        control.resume();
        assert!(wait_for(|| engine.lock().unwrap().draw_count() > 1));

        render.shutdown().unwrap();
    }

    //=====================================================================
    // Failures
    //=====================================================================

    #[test]
    fn negotiation_failure_is_fatal() {
        let (reporter, queue, presenter, terminator) = recording_reporter();
        let control = RenderControl::new();
        reporter.attach_render_control(control.clone());
        let engine = share(RecordingEngine::default());

        let display = MemoryDisplay::new(vec![ConfigAttributes::new(8, 8, 8, 8, 24, 8)]);
        let render = RenderThread::spawn(
            display.clone(),
            engine.clone(),
            control.clone(),
            reporter,
            settings(),
        )
        .unwrap();

        assert!(wait_for(|| control.is_halted()));
        render.shutdown().unwrap();
        queue.drain();

        assert_eq!(display.live_contexts(), 0);
        assert_eq!(engine.lock().unwrap().draw_count(), 0);
        assert!(matches!(
            presenter.calls().as_slice(),
            [PresenterCall::Message { cancelable: false, .. }]
        ));
        assert_eq!(terminator.exit_codes(), vec![1]);
    }

    #[test]
    fn surface_error_halts_before_dialog() {
        let (reporter, queue, presenter, _) = recording_reporter();
        let control = RenderControl::new();
        reporter.attach_render_control(control.clone());
        presenter.watch(control.clone());

        let mut failing = RecordingEngine::default();
        failing.fail_surface = true;
        let engine = share(failing);

        let render = RenderThread::spawn(
            MemoryDisplay::with_common_configs(),
            engine.clone(),
            control.clone(),
            reporter,
            settings(),
        )
        .unwrap();

        render.resize(10, 10);
        assert!(wait_for(|| control.is_halted()));

        let draws = engine.lock().unwrap().draw_count();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(engine.lock().unwrap().draw_count(), draws);

        render.shutdown().unwrap();
        queue.drain();

        assert_eq!(presenter.halted_at_show(), vec![true]);
    }

    #[test]
    fn draw_error_is_reported_once() {
        let (reporter, queue, presenter, _) = recording_reporter();
        let control = RenderControl::new();
        reporter.attach_render_control(control.clone());

        let mut failing = RecordingEngine::default();
        failing.fail_draw_after = Some(2);
        let engine = share(failing);

        let render = RenderThread::spawn(
            MemoryDisplay::with_common_configs(),
            engine.clone(),
            control.clone(),
            reporter,
            settings(),
        )
        .unwrap();

        assert!(wait_for(|| control.is_halted()));
        render.shutdown().unwrap();
        queue.drain();

        assert_eq!(presenter.calls().len(), 1);
    }
}
