//=========================================================================
// Display Seam
//=========================================================================
//
// The narrow slice of EGL the surface negotiator needs, expressed as a
// trait so the negotiation logic never touches a driver directly.
//
// `MemoryDisplay` is the in-process implementation backing headless runs
// and tests. It answers `choose_configs` by filtering a fixed list of
// config descriptions the same way a driver would: size attributes are
// minimums, the renderable type is a bitmask.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

//=== Internal Dependencies ===============================================

use crate::core::error::{EngineError, ErrorCode};

//=== EGL Constants =======================================================

pub type EglInt = i32;

pub const EGL_BUFFER_SIZE: EglInt = 0x3020;
pub const EGL_ALPHA_SIZE: EglInt = 0x3021;
pub const EGL_BLUE_SIZE: EglInt = 0x3022;
pub const EGL_GREEN_SIZE: EglInt = 0x3023;
pub const EGL_RED_SIZE: EglInt = 0x3024;
pub const EGL_DEPTH_SIZE: EglInt = 0x3025;
pub const EGL_STENCIL_SIZE: EglInt = 0x3026;
pub const EGL_CONFIG_ID: EglInt = 0x3028;
pub const EGL_SAMPLES: EglInt = 0x3031;
pub const EGL_SAMPLE_BUFFERS: EglInt = 0x3032;
pub const EGL_NONE: EglInt = 0x3038;
pub const EGL_RENDERABLE_TYPE: EglInt = 0x3040;
pub const EGL_CONTEXT_CLIENT_VERSION: EglInt = 0x3098;

pub const EGL_OPENGL_ES2_BIT: EglInt = 4;

//=== EglDisplay ==========================================================

/// Minimal display interface used by config selection and context setup.
pub trait EglDisplay {
    type Config: Clone;
    type Context;

    /// Returns every config satisfying `filter`, an `EGL_NONE`-terminated
    /// attribute/value list.
    fn choose_configs(&self, filter: &[EglInt]) -> Result<Vec<Self::Config>, EngineError>;

    /// Reads one attribute of a config; `None` when the query fails.
    fn config_attrib(&self, config: &Self::Config, attrib: EglInt) -> Option<EglInt>;

    /// Creates a context for `config` with an `EGL_NONE`-terminated
    /// attribute list.
    fn create_context(
        &self,
        config: &Self::Config,
        attribs: &[EglInt],
    ) -> Result<Self::Context, EngineError>;

    fn destroy_context(&self, context: Self::Context);
}

/// Iterates attribute/value pairs up to the terminating `EGL_NONE`.
pub(crate) fn attrib_pairs(list: &[EglInt]) -> impl Iterator<Item = (EglInt, EglInt)> + '_ {
    list.chunks_exact(2)
        .take_while(|pair| pair[0] != EGL_NONE)
        .map(|pair| (pair[0], pair[1]))
}

//=== ConfigAttributes ====================================================

/// One framebuffer configuration offered by a [`MemoryDisplay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigAttributes {
    pub red: EglInt,
    pub green: EglInt,
    pub blue: EglInt,
    pub alpha: EglInt,
    pub depth: EglInt,
    pub stencil: EglInt,
    pub samples: EglInt,
    pub renderable_type: EglInt,
}

impl ConfigAttributes {
    /// An ES2-renderable config without multisampling.
    pub fn new(
        red: EglInt,
        green: EglInt,
        blue: EglInt,
        alpha: EglInt,
        depth: EglInt,
        stencil: EglInt,
    ) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
            depth,
            stencil,
            samples: 0,
            renderable_type: EGL_OPENGL_ES2_BIT,
        }
    }

    fn get(&self, attrib: EglInt) -> Option<EglInt> {
        match attrib {
            EGL_RED_SIZE => Some(self.red),
            EGL_GREEN_SIZE => Some(self.green),
            EGL_BLUE_SIZE => Some(self.blue),
            EGL_ALPHA_SIZE => Some(self.alpha),
            EGL_DEPTH_SIZE => Some(self.depth),
            EGL_STENCIL_SIZE => Some(self.stencil),
            EGL_BUFFER_SIZE => Some(self.red + self.green + self.blue + self.alpha),
            EGL_SAMPLES => Some(self.samples),
            EGL_SAMPLE_BUFFERS => Some(i32::from(self.samples > 0)),
            EGL_RENDERABLE_TYPE => Some(self.renderable_type),
            _ => None,
        }
    }

    fn satisfies(&self, filter: &[EglInt]) -> bool {
        attrib_pairs(filter).all(|(attrib, wanted)| match attrib {
            EGL_RENDERABLE_TYPE => self.renderable_type & wanted == wanted,
            _ => self.get(attrib).map_or(false, |value| value >= wanted),
        })
    }
}

//=== MemoryDisplay =======================================================

/// Handle for a context created by a [`MemoryDisplay`].
#[derive(Debug, PartialEq, Eq)]
pub struct MemoryContext {
    pub id: u64,
    pub config_id: EglInt,
    pub client_version: EglInt,
}

/// In-memory display with a fixed config list.
#[derive(Debug, Clone)]
pub struct MemoryDisplay {
    configs: Vec<ConfigAttributes>,
    live_contexts: Arc<AtomicUsize>,
    next_context_id: Arc<AtomicU64>,
    fail_context_creation: bool,
}

impl MemoryDisplay {
    pub fn new(configs: Vec<ConfigAttributes>) -> Self {
        Self {
            configs,
            live_contexts: Arc::new(AtomicUsize::new(0)),
            next_context_id: Arc::new(AtomicU64::new(1)),
            fail_context_creation: false,
        }
    }

    /// A display offering the usual mobile formats.
    pub fn with_common_configs() -> Self {
        Self::new(vec![
            ConfigAttributes::new(8, 8, 8, 8, 24, 8),
            ConfigAttributes::new(5, 6, 5, 0, 16, 0),
            ConfigAttributes::new(8, 8, 8, 0, 24, 0),
        ])
    }

    /// Makes every context creation fail.
    pub fn failing_contexts(mut self) -> Self {
        self.fail_context_creation = true;
        self
    }

    /// Number of created contexts not yet destroyed.
    ///
    /// Clones share the counter.
    pub fn live_contexts(&self) -> usize {
        self.live_contexts.load(Ordering::SeqCst)
    }
}

impl EglDisplay for MemoryDisplay {
    /// Index into the config list; doubles as the config id.
    type Config = usize;
    type Context = MemoryContext;

    fn choose_configs(&self, filter: &[EglInt]) -> Result<Vec<usize>, EngineError> {
        Ok(self
            .configs
            .iter()
            .enumerate()
            .filter(|(_, config)| config.satisfies(filter))
            .map(|(index, _)| index)
            .collect())
    }

    fn config_attrib(&self, config: &usize, attrib: EglInt) -> Option<EglInt> {
        let attributes = self.configs.get(*config)?;
        if attrib == EGL_CONFIG_ID {
            return EglInt::try_from(*config).ok();
        }
        attributes.get(attrib)
    }

    fn create_context(&self, config: &usize, attribs: &[EglInt]) -> Result<MemoryContext, EngineError> {
        if self.fail_context_creation {
            return Err(EngineError::new(ErrorCode::ContextCreation, "display refused context"));
        }

        if *config >= self.configs.len() {
            return Err(EngineError::new(
                ErrorCode::ContextCreation,
                format!("unknown config {}", config),
            ));
        }

        let client_version = attrib_pairs(attribs)
            .find(|(attrib, _)| *attrib == EGL_CONTEXT_CLIENT_VERSION)
            .map_or(1, |(_, value)| value);

        self.live_contexts.fetch_add(1, Ordering::SeqCst);

        Ok(MemoryContext {
            id: self.next_context_id.fetch_add(1, Ordering::SeqCst),
            config_id: EglInt::try_from(*config).unwrap_or(EglInt::MAX),
            client_version,
        })
    }

    fn destroy_context(&self, _context: MemoryContext) {
        self.live_contexts.fetch_sub(1, Ordering::SeqCst);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_treats_sizes_as_minimums() {
        let display = MemoryDisplay::new(vec![
            ConfigAttributes::new(8, 8, 8, 8, 24, 8),
            ConfigAttributes::new(2, 2, 2, 0, 0, 0),
        ]);

        let filter = [EGL_RED_SIZE, 4, EGL_GREEN_SIZE, 4, EGL_BLUE_SIZE, 4, EGL_NONE];
        assert_eq!(display.choose_configs(&filter).unwrap(), vec![0]);
    }

    #[test]
    fn filter_checks_renderable_bits() {
        let mut es1_only = ConfigAttributes::new(8, 8, 8, 8, 24, 8);
        es1_only.renderable_type = 1;
        let display = MemoryDisplay::new(vec![es1_only]);

        let filter = [EGL_RENDERABLE_TYPE, EGL_OPENGL_ES2_BIT, EGL_NONE];
        assert!(display.choose_configs(&filter).unwrap().is_empty());
    }

    #[test]
    fn unknown_attribute_reads_as_none() {
        let display = MemoryDisplay::with_common_configs();
        assert_eq!(display.config_attrib(&0, 0x7fff), None);
        assert_eq!(display.config_attrib(&99, EGL_RED_SIZE), None);
    }

    #[test]
    fn contexts_are_counted() {
        let display = MemoryDisplay::with_common_configs();
        let attribs = [EGL_CONTEXT_CLIENT_VERSION, 2, EGL_NONE];

        let context = display.create_context(&1, &attribs).unwrap();
        assert_eq!(context.client_version, 2);
        assert_eq!(display.live_contexts(), 1);

        display.destroy_context(context);
        assert_eq!(display.live_contexts(), 0);
    }

    #[test]
    fn failing_display_creates_nothing() {
        let display = MemoryDisplay::with_common_configs().failing_contexts();
        let err = display.create_context(&0, &[EGL_NONE]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ContextCreation);
        assert_eq!(display.live_contexts(), 0);
    }
}
