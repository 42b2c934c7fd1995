//=========================================================================
// Pac-Man Controller
//=========================================================================
//
// The player's actor plus its chomping animation.
//
// The animation runs while Pac-Man moves and freezes when he stops
// against a wall; every accepted turn restarts it and rotates the sprite.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::actor::{Actor, ActorEvent};
use super::animator::FrameAnimator;
use super::geometry::{CellIndex, MoveDirection, Region};
use super::loader::ActorSpec;
use super::map::Map;

//=== Constants ===========================================================

/// Sprite frames: closed, half open, open, half open.
pub const PACMAN_FRAMES: [usize; 4] = [0, 1, 2, 1];
pub const PACMAN_FRAME_DURATION: u64 = 55;

//=== PacmanController ====================================================

#[derive(Debug, Clone)]
pub struct PacmanController {
    actor: Actor,
    animator: FrameAnimator,
    rotation: u16,
    spec: ActorSpec,
}

impl PacmanController {
    /// Places Pac-Man at the start and sets him moving.
    pub fn new(spec: ActorSpec, actor_size: i32, map: &Map) -> Self {
        let actor = Actor::new(
            actor_size,
            spec.speed,
            map.start_position(spec.start_cell, actor_size),
            MoveDirection::None,
            map.cell_size(),
        );

        let mut controller = Self {
            actor,
            animator: FrameAnimator::new(PACMAN_FRAMES.to_vec(), PACMAN_FRAME_DURATION),
            rotation: 0,
            spec,
        };
        controller.change_direction(spec.start_direction, map);
        controller
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn direction(&self) -> MoveDirection {
        self.actor.direction()
    }

    pub fn region(&self) -> Region {
        self.actor.region()
    }

    pub fn rotation(&self) -> u16 {
        self.rotation
    }

    pub fn frame(&self) -> usize {
        self.animator.frame()
    }

    pub fn is_animating(&self) -> bool {
        !self.animator.is_paused()
    }

    /// Turns towards `direction`; ignored when that way is blocked.
    pub fn change_direction(&mut self, direction: MoveDirection, map: &Map) -> bool {
        if !self.actor.move_direction(direction, map) {
            return false;
        }

        self.animator.resume();
        self.rotation = direction.rotation();
        true
    }

    /// Jumps to `cell` and keeps running in the current direction.
    pub fn translate_to(&mut self, cell: CellIndex, map: &Map) {
        let direction = self.actor.direction();
        self.actor.translate_to(cell, map);
        self.change_direction(direction, map);
    }

    pub fn update(&mut self, dt: u64) {
        if self.actor.update(dt) == Some(ActorEvent::TargetAchieved) {
            self.animator.pause();
        }
        self.animator.update(dt);
    }

    /// Back to the start cell, as after losing a life.
    pub fn reset(&mut self, map: &Map) {
        let size = self.actor.size();
        self.actor = Actor::new(
            size,
            self.spec.speed,
            map.start_position(self.spec.start_cell, size),
            MoveDirection::None,
            map.cell_size(),
        );
        self.animator.reset();
        self.rotation = 0;
        self.change_direction(self.spec.start_direction, map);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::map::tests::layout;

    fn map() -> Map {
        Map::new(
            layout(&["#######", "#     #", "# ### #", "#     #", "#######"]),
            8,
            (56, 40),
        )
    }

    fn spec() -> ActorSpec {
        ActorSpec {
            start_cell: CellIndex::new(1, 3),
            start_direction: MoveDirection::Left,
            speed: 10,
        }
    }

    #[test]
    fn starts_moving_in_start_direction() {
        let map = map();
        let pacman = PacmanController::new(spec(), 12, &map);

        assert_eq!(pacman.direction(), MoveDirection::Left);
        assert_eq!(pacman.rotation(), 180);
        assert!(pacman.actor().is_moving());
        assert_eq!(pacman.actor().target(), map.actor_position(CellIndex::new(1, 1), 12));
    }

    #[test]
    fn blocked_turn_keeps_rotation() {
        let map = map();
        let mut pacman = PacmanController::new(spec(), 12, &map);

        assert!(!pacman.change_direction(MoveDirection::Up, &map));
        assert_eq!(pacman.rotation(), 180);

        assert!(pacman.change_direction(MoveDirection::Right, &map));
        assert_eq!(pacman.rotation(), 0);
    }

    #[test]
    fn animation_pauses_at_wall_and_resumes_on_turn() {
        let map = map();
        let mut pacman = PacmanController::new(spec(), 12, &map);

        for _ in 0..50 {
            pacman.update(40);
        }
        assert!(!pacman.actor().is_moving());
        assert!(!pacman.is_animating());
        assert_eq!(map.find_cell(&pacman.region()), CellIndex::new(1, 1));

        assert!(pacman.change_direction(MoveDirection::Down, &map));
        assert!(pacman.is_animating());
    }

    #[test]
    fn reset_returns_to_start() {
        let map = map();
        let mut pacman = PacmanController::new(spec(), 12, &map);
        for _ in 0..10 {
            pacman.update(40);
        }

        pacman.reset(&map);
        assert_eq!(pacman.actor().position(), map.start_position(CellIndex::new(1, 3), 12));
        assert_eq!(pacman.direction(), MoveDirection::Left);
    }
}
