//=========================================================================
// Scheduler
//=========================================================================
//
// Game rules expressed as timed actions and condition triggers, all run
// against a shared context once per update.
//
// Update Flow:
// ```text
//   update(dt, ctx)
//     ├─ actions:  elapsed += dt; elapsed ≥ delay → run, elapsed = 0
//     │            one-shot or Unregister → removed
//     ├─ triggers: condition(ctx) → run; Unregister → removed
//     └─ removals applied after both passes
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== ActionResult ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    None,
    /// Remove the action (or trigger) after this pass.
    Unregister,
}

pub type ActionId = u64;

type ActionFn<C> = Box<dyn FnMut(&mut C) -> ActionResult + Send>;
type ConditionFn<C> = Box<dyn Fn(&C) -> bool + Send>;

struct ScheduledAction<C> {
    id: ActionId,
    delay: u64,
    elapsed: u64,
    repeatable: bool,
    action: ActionFn<C>,
}

struct Trigger<C> {
    id: ActionId,
    condition: ConditionFn<C>,
    action: ActionFn<C>,
}

//=== Scheduler ===========================================================

pub struct Scheduler<C> {
    next_id: ActionId,
    actions: Vec<ScheduledAction<C>>,
    triggers: Vec<Trigger<C>>,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self {
            next_id: 0,
            actions: Vec::new(),
            triggers: Vec::new(),
        }
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `action` every `delay` ms, or once when not `repeatable`.
    pub fn register_action<F>(&mut self, delay: u64, repeatable: bool, action: F) -> ActionId
    where
        F: FnMut(&mut C) -> ActionResult + Send + 'static,
    {
        let id = self.allocate_id();
        self.actions.push(ScheduledAction {
            id,
            delay,
            elapsed: 0,
            repeatable,
            action: Box::new(action),
        });
        id
    }

    /// Runs `action` on every update where `condition` holds.
    pub fn register_trigger<P, F>(&mut self, condition: P, action: F) -> ActionId
    where
        P: Fn(&C) -> bool + Send + 'static,
        F: FnMut(&mut C) -> ActionResult + Send + 'static,
    {
        let id = self.allocate_id();
        self.triggers.push(Trigger {
            id,
            condition: Box::new(condition),
            action: Box::new(action),
        });
        id
    }

    pub fn unregister(&mut self, id: ActionId) -> bool {
        let before = self.len();
        self.actions.retain(|a| a.id != id);
        self.triggers.retain(|t| t.id != id);
        self.len() != before
    }

    /// Registered actions plus triggers.
    pub fn len(&self) -> usize {
        self.actions.len() + self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.triggers.clear();
    }

    pub fn update(&mut self, dt: u64, context: &mut C) {
        let mut finished = Vec::new();

        for scheduled in &mut self.actions {
            scheduled.elapsed += dt;
            if scheduled.elapsed < scheduled.delay {
                continue;
            }

            scheduled.elapsed = 0;
            let result = (scheduled.action)(context);
            if !scheduled.repeatable || result == ActionResult::Unregister {
                finished.push(scheduled.id);
            }
        }

        for trigger in &mut self.triggers {
            if (trigger.condition)(context) && (trigger.action)(context) == ActionResult::Unregister {
                finished.push(trigger.id);
            }
        }

        if !finished.is_empty() {
            trace!(target: "game", "Unregistering {:?}", finished);
            self.actions.retain(|a| !finished.contains(&a.id));
            self.triggers.retain(|t| !finished.contains(&t.id));
        }
    }

    fn allocate_id(&mut self) -> ActionId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl<C> std::fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("actions", &self.actions.len())
            .field("triggers", &self.triggers.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
