//=========================================================================
// Surface Config Negotiation
//=========================================================================
//
// Picks a framebuffer config for the requested precision and creates an
// ES2 context on it.
//
// Selection:
//   choose_configs(baseline) ─→ [configs] ─→ first with
//       depth >= min && stencil >= min && exact R,G,B,A
//
// The baseline only asks for 4+ bits per colour channel and ES2
// support; the exact match happens here, not in the driver, because
// drivers sort by their own preference.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use super::display::*;
use crate::core::error::{EngineError, ErrorCode};

//=== SurfaceConfigRequest ================================================

/// Desired channel precision. Colour channels match exactly, depth and
/// stencil are minimums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfigRequest {
    pub red: EglInt,
    pub green: EglInt,
    pub blue: EglInt,
    pub alpha: EglInt,
    pub depth: EglInt,
    pub stencil: EglInt,
}

impl SurfaceConfigRequest {
    /// RGB565 without alpha.
    pub fn opaque(depth: EglInt, stencil: EglInt) -> Self {
        Self {
            red: 5,
            green: 6,
            blue: 5,
            alpha: 0,
            depth,
            stencil,
        }
    }

    /// RGBA8888.
    pub fn translucent(depth: EglInt, stencil: EglInt) -> Self {
        Self {
            red: 8,
            green: 8,
            blue: 8,
            alpha: 8,
            depth,
            stencil,
        }
    }
}

impl Default for SurfaceConfigRequest {
    fn default() -> Self {
        Self::opaque(0, 0)
    }
}

//=== ConfigChooser =======================================================

const BASELINE_FILTER: [EglInt; 9] = [
    EGL_RED_SIZE, 4,
    EGL_GREEN_SIZE, 4,
    EGL_BLUE_SIZE, 4,
    EGL_RENDERABLE_TYPE, EGL_OPENGL_ES2_BIT,
    EGL_NONE,
];

const DESCRIBED_ATTRIBUTES: [(EglInt, &str); 10] = [
    (EGL_CONFIG_ID, "EGL_CONFIG_ID"),
    (EGL_BUFFER_SIZE, "EGL_BUFFER_SIZE"),
    (EGL_RED_SIZE, "EGL_RED_SIZE"),
    (EGL_GREEN_SIZE, "EGL_GREEN_SIZE"),
    (EGL_BLUE_SIZE, "EGL_BLUE_SIZE"),
    (EGL_ALPHA_SIZE, "EGL_ALPHA_SIZE"),
    (EGL_DEPTH_SIZE, "EGL_DEPTH_SIZE"),
    (EGL_STENCIL_SIZE, "EGL_STENCIL_SIZE"),
    (EGL_SAMPLES, "EGL_SAMPLES"),
    (EGL_RENDERABLE_TYPE, "EGL_RENDERABLE_TYPE"),
];

/// Selects a config for a [`SurfaceConfigRequest`].
#[derive(Debug, Clone, Copy)]
pub struct ConfigChooser {
    request: SurfaceConfigRequest,
}

impl ConfigChooser {
    pub fn new(request: SurfaceConfigRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> SurfaceConfigRequest {
        self.request
    }

    /// Enumerates the display's baseline configs and selects one.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::NoMatchingConfig`] when the baseline yields nothing or
    /// no enumerated config matches the request.
    pub fn choose<D: EglDisplay>(&self, display: &D) -> Result<D::Config, EngineError> {
        let configs = display.choose_configs(&BASELINE_FILTER)?;

        if configs.is_empty() {
            return Err(EngineError::new(
                ErrorCode::NoMatchingConfig,
                "no configs match the baseline filter",
            ));
        }

        debug!(target: "render", "{} baseline configs", configs.len());
        if log::log_enabled!(target: "render", log::Level::Trace) {
            Self::describe_configs(display, &configs);
        }

        self.select(display, &configs).ok_or_else(|| {
            EngineError::new(ErrorCode::NoMatchingConfig, format!("{:?}", self.request))
        })
    }

    /// Returns the first config whose depth and stencil meet the minimums
    /// and whose colour channels match exactly. Missing attributes read
    /// as 0.
    pub fn select<D: EglDisplay>(&self, display: &D, configs: &[D::Config]) -> Option<D::Config> {
        let attrib = |config: &D::Config, name| display.config_attrib(config, name).unwrap_or(0);
        let wanted = &self.request;

        let index = configs.iter().position(|config| {
            attrib(config, EGL_DEPTH_SIZE) >= wanted.depth
                && attrib(config, EGL_STENCIL_SIZE) >= wanted.stencil
                && attrib(config, EGL_RED_SIZE) == wanted.red
                && attrib(config, EGL_GREEN_SIZE) == wanted.green
                && attrib(config, EGL_BLUE_SIZE) == wanted.blue
                && attrib(config, EGL_ALPHA_SIZE) == wanted.alpha
        })?;

        info!(target: "render", "Selected config {}", index);
        Some(configs[index].clone())
    }

    /// Logs every described attribute of every config at trace level.
    pub fn describe_configs<D: EglDisplay>(display: &D, configs: &[D::Config]) {
        for (index, config) in configs.iter().enumerate() {
            trace!(target: "render", "Config {}:", index);
            for (attrib, name) in DESCRIBED_ATTRIBUTES {
                match display.config_attrib(config, attrib) {
                    Some(value) => trace!(target: "render", "  {}: {}", name, value),
                    None => trace!(target: "render", "  {}: <unavailable>", name),
                }
            }
        }
    }
}

//=== ContextFactory ======================================================

/// Creates ES2 contexts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextFactory;

impl ContextFactory {
    pub const CLIENT_VERSION: EglInt = 2;

    pub fn create<'d, D: EglDisplay>(
        &self,
        display: &'d D,
        config: &D::Config,
    ) -> Result<SurfaceContext<'d, D>, EngineError> {
        let attribs = [EGL_CONTEXT_CLIENT_VERSION, Self::CLIENT_VERSION, EGL_NONE];
        let context = display.create_context(config, &attribs)?;
        debug!(target: "render", "Context created (client version {})", Self::CLIENT_VERSION);

        Ok(SurfaceContext {
            display,
            context: Some(context),
        })
    }
}

//=== SurfaceContext ======================================================

/// Owns a created context; destroys it exactly once.
pub struct SurfaceContext<'d, D: EglDisplay> {
    display: &'d D,
    context: Option<D::Context>,
}

impl<'d, D: EglDisplay> SurfaceContext<'d, D> {
    pub fn context(&self) -> Option<&D::Context> {
        self.context.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.context.is_some()
    }

    /// Destroys the context now. Later calls and the drop are no-ops.
    pub fn destroy(&mut self) {
        if let Some(context) = self.context.take() {
            self.display.destroy_context(context);
            debug!(target: "render", "Context destroyed");
        }
    }
}

impl<D: EglDisplay> Drop for SurfaceContext<'_, D> {
    fn drop(&mut self) {
        self.destroy();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
