//=========================================================================
// Actor
//=========================================================================
//
// A square sprite moving across the maze towards a target point.
//
// Position is the sprite's top-left corner in pixels. Each update moves
// both axes towards the target by `speed × cell_size × dt / 1000` pixels,
// never overshooting.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::geometry::{CellIndex, MoveDirection, Point, Region};
use super::map::Map;

//=== ActorEvent ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorEvent {
    /// The actor stopped on its move target.
    TargetAchieved,
}

//=== Actor ===============================================================

#[derive(Debug, Clone)]
pub struct Actor {
    size: i32,
    speed: u32,
    cell_size: i32,
    position: Point,
    direction: MoveDirection,
    target: Point,
    moving: bool,
}

impl Actor {
    /// `speed` is in cells per second.
    pub fn new(size: i32, speed: u32, position: Point, direction: MoveDirection, cell_size: i32) -> Self {
        Self {
            size,
            speed,
            cell_size,
            position,
            direction,
            target: position,
            moving: false,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed;
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn region(&self) -> Region {
        Region::square(self.position, self.size)
    }

    pub fn direction(&self) -> MoveDirection {
        self.direction
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Heads for `target`, facing `direction`.
    pub fn move_to(&mut self, target: Point, direction: MoveDirection) {
        self.target = target;
        self.direction = direction;
        self.moving = target != self.position;
    }

    /// Heads for the furthest walkable cell in `direction`.
    ///
    /// Returns false, leaving the current move untouched, when the next
    /// cell in that direction is blocked.
    pub fn move_direction(&mut self, direction: MoveDirection, map: &Map) -> bool {
        let current = map.find_cell(&self.region());
        let furthest = map.find_max_available_cell(current, direction);
        if furthest == current {
            return false;
        }

        self.move_to(map.actor_position(furthest, self.size), direction);
        true
    }

    /// Places the actor on `cell` and stops it.
    pub fn translate_to(&mut self, cell: CellIndex, map: &Map) {
        self.place(map.actor_position(cell, self.size));
    }

    /// Places the actor at `position` and stops it.
    pub fn place(&mut self, position: Point) {
        self.position = position;
        self.target = position;
        self.moving = false;
    }

    /// Advances `dt` milliseconds.
    pub fn update(&mut self, dt: u64) -> Option<ActorEvent> {
        if !self.moving {
            return None;
        }

        let offset = (u64::from(self.speed) * self.cell_size as u64 * dt / 1000) as i32;
        self.position.x = approach(self.position.x, self.target.x, offset);
        self.position.y = approach(self.position.y, self.target.y, offset);

        if self.position == self.target {
            self.moving = false;
            Some(ActorEvent::TargetAchieved)
        } else {
            None
        }
    }
}

fn approach(current: i32, target: i32, step: i32) -> i32 {
    let diff = target - current;
    current + diff.signum() * step.min(diff.abs())
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::map::tests::layout;

    fn corridor() -> Map {
        Map::new(layout(&["#######", "#     #", "#######"]), 8, (56, 24))
    }

    #[test]
    fn update_moves_by_speed_and_stops_on_target() {
        let mut actor = Actor::new(12, 10, Point::new(0, 0), MoveDirection::None, 8);
        actor.move_to(Point::new(10, 0), MoveDirection::Right);

        // 10 cells/s × 8 px × 40 ms = 3 px
        assert_eq!(actor.update(40), None);
        assert_eq!(actor.position(), Point::new(3, 0));

        actor.update(40);
        actor.update(40);
        assert_eq!(actor.update(40), Some(ActorEvent::TargetAchieved));
        assert_eq!(actor.position(), Point::new(10, 0));
        assert!(!actor.is_moving());
        assert_eq!(actor.update(40), None);
    }

    #[test]
    fn both_axes_converge() {
        let mut actor = Actor::new(12, 10, Point::new(0, 5), MoveDirection::None, 8);
        actor.move_to(Point::new(-6, 4), MoveDirection::Left);

        actor.update(40);
        assert_eq!(actor.position(), Point::new(-3, 4));
    }

    #[test]
    fn move_direction_targets_furthest_cell() {
        let map = corridor();
        let mut actor = Actor::new(12, 8, Point::new(0, 0), MoveDirection::None, 8);
        actor.translate_to(CellIndex::new(1, 2), &map);

        assert!(actor.move_direction(MoveDirection::Right, &map));
        assert_eq!(actor.target(), map.actor_position(CellIndex::new(1, 5), 12));
        assert_eq!(actor.direction(), MoveDirection::Right);

        assert!(!actor.move_direction(MoveDirection::Up, &map));
        assert_eq!(actor.direction(), MoveDirection::Right);
    }

    #[test]
    fn translate_stops_the_actor() {
        let map = corridor();
        let mut actor = Actor::new(12, 8, Point::new(0, 0), MoveDirection::None, 8);
        actor.translate_to(CellIndex::new(1, 1), &map);
        actor.move_direction(MoveDirection::Right, &map);

        actor.translate_to(CellIndex::new(1, 4), &map);
        assert!(!actor.is_moving());
        assert_eq!(map.find_cell(&actor.region()), CellIndex::new(1, 4));
    }
}
