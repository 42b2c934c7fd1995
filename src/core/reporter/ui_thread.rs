//=========================================================================
// UI Thread Marshaling
//=========================================================================
//
// Serial task queue bound to the thread that owns user-facing UI.
//
// Architecture:
//   any thread ── UiThread::run(task) ──┬─ on UI thread → run inline
//                                       └─ elsewhere    → Sender<UiTask>
//                                                            ↓
//   UI thread ── UiQueue::drain() ← Receiver<UiTask> (winit about_to_wait)
//
// Tasks are fire-and-forget: nothing waits for their completion.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread::{self, ThreadId};

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{trace, warn};

//=== UiTask ==============================================================

pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Creates a task queue bound to the calling thread.
pub fn ui_channel() -> (UiThread, UiQueue) {
    let (sender, receiver) = unbounded();
    let ui = UiThread {
        id: thread::current().id(),
        sender,
    };
    (ui, UiQueue { receiver })
}

//=== UiThread ============================================================

/// Cloneable handle for running work on the UI thread.
#[derive(Debug, Clone)]
pub struct UiThread {
    id: ThreadId,
    sender: Sender<UiTask>,
}

impl UiThread {
    pub fn id(&self) -> ThreadId {
        self.id
    }

    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }

    /// Runs `task` inline when called on the UI thread, otherwise queues it.
    pub fn run<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_current() {
            task();
        } else {
            self.post(task);
        }
    }

    /// Queues `task` even when called on the UI thread.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.sender.send(Box::new(task)).is_err() {
            warn!(target: "reporter", "UI queue closed, dropping task");
        }
    }
}

//=== UiQueue =============================================================

/// Receiving end of the UI task queue; drained on the UI thread.
#[derive(Debug)]
pub struct UiQueue {
    receiver: Receiver<UiTask>,
}

impl UiQueue {
    /// Runs pending tasks (bounded to keep the event loop responsive).
    ///
    /// Returns the number of tasks run.
    pub fn drain(&self) -> usize {
        const MAX_TASKS_PER_DRAIN: usize = 64;

        let mut ran = 0;
        while ran < MAX_TASKS_PER_DRAIN {
            match self.receiver.try_recv() {
                Ok(task) => {
                    task();
                    ran += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if ran >= MAX_TASKS_PER_DRAIN {
            warn!(target: "reporter", "UI queue backlog: ran {} tasks this pass", ran);
        } else if ran > 0 {
            trace!(target: "reporter", "Ran {} UI tasks", ran);
        }

        ran
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn runs_inline_on_ui_thread() {
        let (ui, queue) = ui_channel();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        ui.run(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn queues_from_other_threads() {
        let (ui, queue) = ui_channel();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        let remote = ui.clone();
        thread::spawn(move || {
            remote.run(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        })
        .join()
        .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(queue.drain(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn queued_tasks_run_on_the_ui_thread() {
        let (ui, queue) = ui_channel();
        let seen = Arc::new(std::sync::Mutex::new(None));

        let s = seen.clone();
        let remote = ui.clone();
        thread::spawn(move || {
            remote.run(move || {
                *s.lock().unwrap() = Some(thread::current().id());
            });
        })
        .join()
        .unwrap();

        queue.drain();
        assert_eq!(*seen.lock().unwrap(), Some(ui.id()));
    }

    #[test]
    fn post_defers_even_on_ui_thread() {
        let (ui, queue) = ui_channel();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        ui.post(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        queue.drain();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn closed_queue_drops_task() {
        let (ui, queue) = ui_channel();
        drop(queue);

        // Must not panic
        ui.post(|| {});
    }
}
