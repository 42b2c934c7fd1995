//=========================================================================
// Lifecycle
//=========================================================================
//
// Engine contract, host context and the lifecycle state machine.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod bridge;
pub mod native;

//=== Public API ==========================================================

pub use bridge::{LifecycleBridge, LifecycleState};
pub use native::{lock_engine, share, HostContext, NativeEngine, SharedEngine};

//=== Test Doubles ========================================================

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::core::error::{EngineError, ErrorCode};
    use crate::core::screen::ScreenProfile;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum EngineCall {
        Start(ScreenProfile),
        Stop,
        Pause,
        Resume,
        SurfaceChanged(u32, u32),
        Touch(i32, f32, f32),
    }

    /// Engine that records every call.
    #[derive(Default)]
    pub(crate) struct RecordingEngine {
        pub(crate) calls: Vec<EngineCall>,
        pub(crate) context: Option<HostContext>,
        pub(crate) fail_start: bool,
        pub(crate) fail_surface: bool,
        pub(crate) fail_draw_after: Option<usize>,
        pub(crate) touch_result: bool,
        draws: usize,
    }

    impl RecordingEngine {
        pub(crate) fn draw_count(&self) -> usize {
            self.draws
        }
    }

    impl NativeEngine for RecordingEngine {
        fn start(&mut self, context: HostContext) -> Result<(), EngineError> {
            self.calls.push(EngineCall::Start(context.profile));
            if self.fail_start {
                return Err(EngineError::new(ErrorCode::AssetNotFound, "config.json"));
            }
            self.context = Some(context);
            Ok(())
        }

        fn stop(&mut self) {
            self.calls.push(EngineCall::Stop);
            self.context = None;
        }

        fn pause(&mut self) {
            self.calls.push(EngineCall::Pause);
        }

        fn resume(&mut self) {
            self.calls.push(EngineCall::Resume);
        }

        fn surface_changed(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
            self.calls.push(EngineCall::SurfaceChanged(width, height));
            if self.fail_surface {
                return Err(EngineError::new(ErrorCode::BadArgument, "viewport too small"));
            }
            Ok(())
        }

        fn draw_frame(&mut self) -> Result<(), EngineError> {
            self.draws += 1;
            if self.fail_draw_after.map_or(false, |limit| self.draws > limit) {
                return Err(EngineError::new(ErrorCode::InvalidState, "draw failed"));
            }
            Ok(())
        }

        fn touch_event(&mut self, code: i32, x: f32, y: f32) -> bool {
            self.calls.push(EngineCall::Touch(code, x, y));
            self.touch_result
        }
    }
}
