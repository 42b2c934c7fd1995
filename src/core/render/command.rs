//=========================================================================
// Render Commands
//=========================================================================
//
// UI → render thread messages with bounded polling and shutdown
// detection.
//
// Architecture:
//   Receiver<RenderCommand> → collect_frame() → pending resize/redraw
//                                             → TickControl
//
// Resizes are coalesced: only the latest size in a frame is applied.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== RenderCommand =======================================================

/// Messages sent from the UI thread to the render thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCommand {
    /// The drawable changed size (pixels).
    Resize { width: u32, height: u32 },

    /// Draw one frame even when drawing on demand.
    Redraw,

    /// Destroy the context and exit the render thread.
    Shutdown,
}

//=== TickControl =========================================================

/// Render loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== CommandCollector ====================================================

/// Drains pending commands once per frame.
pub(crate) struct CommandCollector {
    receiver: Receiver<RenderCommand>,
    resize: Option<(u32, u32)>,
    redraw: bool,
}

impl CommandCollector {
    pub(crate) fn new(receiver: Receiver<RenderCommand>) -> Self {
        Self {
            receiver,
            resize: None,
            redraw: false,
        }
    }

    /// Collects pending commands (bounded to prevent starvation).
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        const MAX_COMMANDS_PER_FRAME: usize = 100;

        let mut drained = 0;
        while drained < MAX_COMMANDS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(RenderCommand::Shutdown) => return TickControl::Exit,
                Ok(RenderCommand::Resize { width, height }) => self.resize = Some((width, height)),
                Ok(RenderCommand::Redraw) => self.redraw = true,
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
            drained += 1;
        }

        if drained >= MAX_COMMANDS_PER_FRAME {
            warn!(target: "render", "Command backlog: drained {} commands this frame", drained);
        }

        TickControl::Continue
    }

    /// Latest size received since the last call.
    pub(crate) fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.resize.take()
    }

    pub(crate) fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<RenderCommand>();
        let mut collector = CommandCollector::new(rx);

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert_eq!(collector.take_resize(), None);
        assert!(!collector.take_redraw());
    }

    #[test]
    fn resizes_are_coalesced() {
        let (tx, rx) = unbounded();
        let mut collector = CommandCollector::new(rx);

        tx.send(RenderCommand::Resize { width: 100, height: 100 }).unwrap();
        tx.send(RenderCommand::Resize { width: 800, height: 600 }).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert_eq!(collector.take_resize(), Some((800, 600)));
        assert_eq!(collector.take_resize(), None);
    }

    #[test]
    fn redraw_is_taken_once() {
        let (tx, rx) = unbounded();
        let mut collector = CommandCollector::new(rx);

        tx.send(RenderCommand::Redraw).unwrap();
        collector.collect_frame();

        assert!(collector.take_redraw());
        assert!(!collector.take_redraw());
    }

    #[test]
    fn collect_returns_exit_on_shutdown() {
        let (tx, rx) = unbounded();
        let mut collector = CommandCollector::new(rx);

        tx.send(RenderCommand::Shutdown).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (tx, rx) = unbounded::<RenderCommand>();
        let mut collector = CommandCollector::new(rx);

        drop(tx);

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }
}
