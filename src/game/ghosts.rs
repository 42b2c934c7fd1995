//=========================================================================
// Ghosts AI
//=========================================================================
//
// Four ghosts steered one cell at a time towards a target cell.
//
// State Machine:
// ```text
//   Wait ──release──> LeaveHouse ──at door──> Chase ⇄ Scatter
//                                               │  ▲
//                                    big dot    ▼  │ timer
//                                            Frightened
//   eaten ──> respawn at the door, back to the current mode
// ```
//
// At each cell center a ghost picks, among the walkable neighbours other
// than the one it came from, the cell closest to its target (ties broken
// Up, Left, Down, Right). Discarded turns are skipped outside fright
// mode. Frightened ghosts turn at random at half speed.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

//=== Internal Dependencies ===============================================

use super::actor::{Actor, ActorEvent};
use super::geometry::{select_nearest_cell, CellIndex, MoveDirection, Point, Region};
use super::loader::{ActorSpec, AiInfo};
use super::map::Map;

//=== GhostKind ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn asset_name(self) -> &'static str {
        match self {
            Self::Blinky => "blinky.json",
            Self::Pinky => "pinky.json",
            Self::Inky => "inky.json",
            Self::Clyde => "clyde.json",
        }
    }

    /// Blinky starts outside the house and Pinky leaves at once; Inky and
    /// Clyde wait for a dot count.
    pub fn initial_state(self) -> GhostState {
        match self {
            Self::Blinky => GhostState::Chase,
            Self::Pinky => GhostState::LeaveHouse,
            Self::Inky | Self::Clyde => GhostState::Wait,
        }
    }
}

//=== GhostState ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostState {
    /// Idle inside the house.
    Wait,
    /// Heading for the respawn point above the door.
    LeaveHouse,
    Chase,
    Scatter,
    Frightened,
}

impl GhostState {
    /// Roaming the maze, able to touch Pac-Man.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Chase | Self::Scatter | Self::Frightened)
    }
}

//=== Ghost ===============================================================

#[derive(Debug, Clone)]
pub struct Ghost {
    kind: GhostKind,
    actor: Actor,
    state: GhostState,
    released: bool,
    spec: ActorSpec,
}

impl Ghost {
    fn new(kind: GhostKind, spec: ActorSpec, actor_size: i32, map: &Map) -> Self {
        let state = kind.initial_state();
        Self {
            kind,
            actor: Self::start_actor(&spec, actor_size, map),
            state,
            released: state != GhostState::Wait,
            spec,
        }
    }

    fn start_actor(spec: &ActorSpec, actor_size: i32, map: &Map) -> Actor {
        Actor::new(
            actor_size,
            spec.speed,
            map.start_position(spec.start_cell, actor_size),
            spec.start_direction,
            map.cell_size(),
        )
    }

    pub fn kind(&self) -> GhostKind {
        self.kind
    }

    pub fn state(&self) -> GhostState {
        self.state
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn region(&self) -> Region {
        self.actor.region()
    }

    pub fn direction(&self) -> MoveDirection {
        self.actor.direction()
    }

    fn set_state(&mut self, state: GhostState) {
        if self.state != state {
            debug!(target: "game", "{:?}: {:?} -> {:?}", self.kind, self.state, state);
            self.state = state;
        }
        let speed = if state == GhostState::Frightened {
            (self.spec.speed / 2).max(1)
        } else {
            self.spec.speed
        };
        self.actor.set_speed(speed);
    }
}

//=== PacmanView ==========================================================

/// What the ghosts know about Pac-Man during one update.
#[derive(Debug, Clone)]
pub struct PacmanView {
    /// Cells under Pac-Man (see `Map::find_cells`).
    pub cells: Vec<CellIndex>,
    pub direction: MoveDirection,
}

impl PacmanView {
    pub fn new(region: &Region, direction: MoveDirection, map: &Map) -> Self {
        Self {
            cells: map.find_cells(region),
            direction,
        }
    }

    /// The cell Pac-Man is heading into.
    pub fn cell(&self) -> CellIndex {
        select_nearest_cell(&self.cells, self.direction).unwrap_or_default()
    }
}

//=== AiController ========================================================

pub const PINKY_LOOKAHEAD: usize = 4;
/// Clyde chases only while farther than this many cells.
pub const CLYDE_SHY_DISTANCE: usize = 8;

pub struct AiController {
    ghosts: Vec<Ghost>,
    info: AiInfo,
    respawn: Point,
    mode: GhostState,
    mode_elapsed: u64,
    fright_remaining: u64,
    rng: StdRng,
}

impl AiController {
    /// `specs` are indexed by `GhostKind::index()`.
    pub fn new(specs: [ActorSpec; 4], info: AiInfo, actor_size: i32, map: &Map) -> Self {
        Self::with_rng(specs, info, actor_size, map, StdRng::from_entropy())
    }

    /// Same as [`new`](Self::new) with a fixed seed for fright turns.
    pub fn with_seed(specs: [ActorSpec; 4], info: AiInfo, actor_size: i32, map: &Map, seed: u64) -> Self {
        Self::with_rng(specs, info, actor_size, map, StdRng::seed_from_u64(seed))
    }

    fn with_rng(specs: [ActorSpec; 4], info: AiInfo, actor_size: i32, map: &Map, rng: StdRng) -> Self {
        let ghosts = GhostKind::ALL
            .iter()
            .map(|&kind| Ghost::new(kind, specs[kind.index()], actor_size, map))
            .collect();

        Self {
            ghosts,
            respawn: map.start_position(info.ghost_respawn, actor_size),
            info,
            mode: GhostState::Chase,
            mode_elapsed: 0,
            fright_remaining: 0,
            rng,
        }
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn ghost(&self, kind: GhostKind) -> &Ghost {
        &self.ghosts[kind.index()]
    }

    /// Current global mode: `Chase` or `Scatter`.
    pub fn mode(&self) -> GhostState {
        self.mode
    }

    pub fn is_frightened(&self) -> bool {
        self.fright_remaining > 0
    }

    //--- Commands ---------------------------------------------------------

    /// Lets a waiting ghost leave the house. Later calls are no-ops.
    pub fn release(&mut self, kind: GhostKind) {
        let ghost = &mut self.ghosts[kind.index()];
        if ghost.released {
            return;
        }

        info!(target: "game", "{:?} released", kind);
        ghost.released = true;
        if ghost.state == GhostState::Wait {
            ghost.set_state(GhostState::LeaveHouse);
        }
    }

    /// Starts (or restarts) fright mode for every roaming ghost.
    pub fn frighten(&mut self) {
        if self.info.fright_duration == 0 {
            return;
        }

        self.fright_remaining = self.info.fright_duration;
        for ghost in &mut self.ghosts {
            if ghost.state.is_active() {
                ghost.set_state(GhostState::Frightened);
            }
        }
    }

    /// Sends an eaten ghost back to the door in the current mode.
    pub fn eat(&mut self, kind: GhostKind) {
        let mode = self.mode;
        let respawn = self.respawn;
        let ghost = &mut self.ghosts[kind.index()];

        ghost.actor.place(respawn);
        ghost.set_state(mode);
    }

    /// Ghosts back to their start cells after Pac-Man loses a life.
    /// Released ghosts leave the house again straight away.
    pub fn reset_positions(&mut self, map: &Map) {
        for ghost in &mut self.ghosts {
            ghost.actor = Ghost::start_actor(&ghost.spec, ghost.actor.size(), map);
            let state = match ghost.kind.initial_state() {
                GhostState::Wait if ghost.released => GhostState::LeaveHouse,
                state => state,
            };
            ghost.set_state(state);
        }
        self.mode = GhostState::Chase;
        self.mode_elapsed = 0;
        self.fright_remaining = 0;
    }

    /// Start of a new level: positions reset and house ghosts wait again.
    pub fn reset_level(&mut self, map: &Map) {
        for ghost in &mut self.ghosts {
            ghost.released = ghost.kind.initial_state() != GhostState::Wait;
        }
        self.reset_positions(map);
    }

    //--- Update -----------------------------------------------------------

    pub fn update(&mut self, dt: u64, map: &Map, pacman: &PacmanView) {
        self.update_timers(dt);

        let blinky_cell = map.find_cell(&self.ghosts[GhostKind::Blinky.index()].region());
        for index in 0..self.ghosts.len() {
            self.update_ghost(index, dt, map, pacman, blinky_cell);
        }
    }

    fn update_timers(&mut self, dt: u64) {
        if self.fright_remaining > 0 {
            self.fright_remaining = self.fright_remaining.saturating_sub(dt);
            if self.fright_remaining == 0 {
                debug!(target: "game", "Fright over");
                let mode = self.mode;
                for ghost in &mut self.ghosts {
                    if ghost.state == GhostState::Frightened {
                        ghost.set_state(mode);
                    }
                }
            }
            return;
        }

        self.mode_elapsed += dt;
        let limit = match self.mode {
            GhostState::Scatter => self.info.scatter_duration,
            _ => self.info.scatter_interval,
        };
        if self.mode_elapsed < limit {
            return;
        }

        self.mode_elapsed = 0;
        self.mode = match self.mode {
            GhostState::Scatter => GhostState::Chase,
            _ => GhostState::Scatter,
        };
        debug!(target: "game", "Ghost mode: {:?}", self.mode);

        let mode = self.mode;
        for ghost in &mut self.ghosts {
            if matches!(ghost.state, GhostState::Chase | GhostState::Scatter) {
                ghost.set_state(mode);
            }
        }
    }

    fn update_ghost(&mut self, index: usize, dt: u64, map: &Map, pacman: &PacmanView, blinky: CellIndex) {
        let state = self.ghosts[index].state;
        match state {
            GhostState::Wait => {}
            GhostState::LeaveHouse => {
                let respawn = self.respawn;
                let ghost = &mut self.ghosts[index];
                if !ghost.actor.is_moving() {
                    ghost.actor.move_to(respawn, MoveDirection::Up);
                }
                ghost.actor.update(dt);
                if ghost.actor.position() == respawn {
                    let next = if self.fright_remaining > 0 {
                        GhostState::Frightened
                    } else {
                        self.mode
                    };
                    ghost.set_state(next);
                }
            }
            GhostState::Chase | GhostState::Scatter | GhostState::Frightened => {
                let event = self.ghosts[index].actor.update(dt);
                if event == Some(ActorEvent::TargetAchieved) || !self.ghosts[index].actor.is_moving() {
                    let target = self.target_cell(index, map, pacman, blinky);
                    self.steer(index, map, target);
                }
            }
        }
    }

    fn target_cell(&self, index: usize, map: &Map, pacman: &PacmanView, blinky: CellIndex) -> CellIndex {
        let ghost = &self.ghosts[index];
        let scatter = self.info.scatter_targets[ghost.kind.index()];
        if ghost.state == GhostState::Scatter {
            return scatter;
        }

        let pacman_cell = pacman.cell();
        match ghost.kind {
            GhostKind::Blinky => pacman_cell,
            GhostKind::Pinky => pacman_cell.offset(pacman.direction, PINKY_LOOKAHEAD),
            GhostKind::Inky => {
                // Double the vector from Blinky to two cells ahead of Pac-Man.
                let pivot = pacman_cell.offset(pacman.direction, 2);
                let row = (2 * pivot.row as isize - blinky.row as isize).max(0) as usize;
                let column = (2 * pivot.column as isize - blinky.column as isize).max(0) as usize;
                CellIndex::new(row, column)
            }
            GhostKind::Clyde => {
                let own = map.find_cell(&ghost.region());
                let far = CLYDE_SHY_DISTANCE * CLYDE_SHY_DISTANCE;
                if own.distance_squared(pacman_cell) > far {
                    pacman_cell
                } else {
                    scatter
                }
            }
        }
    }

    /// Picks the next cell and starts moving towards it.
    fn steer(&mut self, index: usize, map: &Map, target: CellIndex) {
        let ghost = &mut self.ghosts[index];
        let mut cell = map.find_cell(&ghost.region());
        let heading = ghost.actor.direction();

        if let Some(exit) = map.tunnel_destination(cell, heading) {
            ghost.actor.translate_to(exit, map);
            cell = exit;
        }

        let frightened = ghost.state == GhostState::Frightened;
        let mut options: Vec<(MoveDirection, CellIndex)> = MoveDirection::TURN_ORDER
            .iter()
            .filter(|&&direction| direction != heading.reverse() || heading == MoveDirection::None)
            .filter(|&&direction| frightened || !self.info.is_discarded(cell, direction))
            .filter_map(|&direction| {
                map.next_cell(cell, direction)
                    .filter(|next| map.is_walkable(*next))
                    .map(|next| (direction, next))
            })
            .collect();

        if options.is_empty() {
            // Dead end: turning back is the only way out.
            if let Some(back) = map.next_cell(cell, heading.reverse()).filter(|c| map.is_walkable(*c)) {
                options.push((heading.reverse(), back));
            }
        }

        let choice = if frightened {
            options.choose(&mut self.rng).copied()
        } else {
            options
                .iter()
                .min_by_key(|(_, next)| next.distance_squared(target))
                .copied()
        };

        if let Some((direction, next)) = choice {
            let position = map.actor_position(next, ghost.actor.size());
            ghost.actor.move_to(position, direction);
        }
    }
}

impl std::fmt::Debug for AiController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiController")
            .field("ghosts", &self.ghosts)
            .field("mode", &self.mode)
            .field("fright_remaining", &self.fright_remaining)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
