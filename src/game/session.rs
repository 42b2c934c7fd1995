//=========================================================================
// Game Session
//=========================================================================
//
// One game: the maze, the dots, Pac-Man, the ghosts and the rules that
// tie them together.
//
// Update Order (per fixed step):
// ```text
//   Pac-Man moves ─> ghosts move ─> scheduler rules ─> collisions
//                                    ├─ eat dot under Pac-Man
//                                    ├─ tunnel exits (left / right)
//                                    └─ release Inky / Clyde
//   no dots left ─> next level
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use super::dots::{DotType, DotsGrid};
use super::geometry::{MoveDirection, Region};
use super::ghosts::{AiController, GhostKind, GhostState, PacmanView};
use super::loader::{GameLoader, PACMAN_ASSET};
use super::map::{Map, BASE_CELL_SIZE};
use super::pacman::PacmanController;
use super::scheduler::{ActionResult, Scheduler};
use crate::core::error::{EngineError, ErrorCode};

//=== Constants ===========================================================

pub const START_LIVES: u32 = 3;
pub const GHOST_SCORE: u32 = 200;
/// Dots Pac-Man must eat before Inky leaves the house.
pub const INKY_DOT_LIMIT: usize = 30;

//=== Session Types =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Playing,
    GameOver,
}

/// Notable things that happened during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    GhostEaten(GhostKind),
    LifeLost { lives: u32 },
    LevelCompleted { level: u32 },
    GameOver { score: u32 },
}

//=== Draw List ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    /// The generated maze texture.
    Map,
    Dot(DotType),
    Pacman { frame: usize },
    Ghost {
        kind: GhostKind,
        direction: MoveDirection,
        frightened: bool,
    },
}

/// One sprite to draw, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawItem {
    pub sprite: Sprite,
    pub region: Region,
    /// Degrees, counter-clockwise.
    pub rotation: u16,
}

//=== World ===============================================================

/// State the scheduler rules operate on.
struct World {
    map: Map,
    dots: DotsGrid,
    pacman: PacmanController,
    ai: AiController,
    score: u32,
    lives: u32,
    level: u32,
    status: SessionStatus,
    events: Vec<SessionEvent>,
}

impl World {
    fn pacman_cell(&self) -> super::geometry::CellIndex {
        self.map.find_cell(&self.pacman.region())
    }

    fn resolve_collisions(&mut self) {
        let pacman_cell = self.pacman_cell();
        let hits: Vec<(GhostKind, GhostState)> = self
            .ai
            .ghosts()
            .iter()
            .filter(|g| g.state().is_active() && self.map.find_cell(&g.region()) == pacman_cell)
            .map(|g| (g.kind(), g.state()))
            .collect();

        for (kind, state) in hits {
            if state == GhostState::Frightened {
                info!(target: "game", "{:?} eaten", kind);
                self.ai.eat(kind);
                self.score += GHOST_SCORE;
                self.events.push(SessionEvent::GhostEaten(kind));
            } else {
                self.lose_life();
                return;
            }
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            info!(target: "game", "Game over, score {}", self.score);
            self.status = SessionStatus::GameOver;
            self.events.push(SessionEvent::GameOver { score: self.score });
            return;
        }

        info!(target: "game", "Life lost, {} left", self.lives);
        self.events.push(SessionEvent::LifeLost { lives: self.lives });
        self.pacman.reset(&self.map);
        self.ai.reset_positions(&self.map);
    }
}

//=== Rules ===============================================================

fn install_rules(scheduler: &mut Scheduler<World>) {
    // Dots under Pac-Man, every step.
    scheduler.register_action(0, true, |world: &mut World| {
        let cell = world.pacman_cell();
        if let Some(dot) = world.dots.hide_dot(cell) {
            world.score += dot.score();
            if dot == DotType::Big {
                world.ai.frighten();
            }
        }
        ActionResult::None
    });

    scheduler.register_trigger(
        |world: &World| {
            world.pacman_cell() == world.map.left_tunnel_exit()
                && world.pacman.direction() == MoveDirection::Left
        },
        |world: &mut World| {
            let exit = world.map.right_tunnel_exit();
            world.pacman.translate_to(exit, &world.map);
            ActionResult::None
        },
    );

    scheduler.register_trigger(
        |world: &World| {
            world.pacman_cell() == world.map.right_tunnel_exit()
                && world.pacman.direction() == MoveDirection::Right
        },
        |world: &mut World| {
            let exit = world.map.left_tunnel_exit();
            world.pacman.translate_to(exit, &world.map);
            ActionResult::None
        },
    );

    scheduler.register_trigger(
        |world: &World| world.dots.eaten() >= INKY_DOT_LIMIT,
        |world: &mut World| {
            world.ai.release(GhostKind::Inky);
            ActionResult::Unregister
        },
    );

    scheduler.register_trigger(
        |world: &World| world.dots.eaten() >= world.dots.total() / 3,
        |world: &mut World| {
            world.ai.release(GhostKind::Clyde);
            ActionResult::Unregister
        },
    );
}

//=== GameSession =========================================================

pub struct GameSession {
    world: World,
    scheduler: Scheduler<World>,
}

impl GameSession {
    /// Loads a new game scaled by `multiplier` into a `viewport` in pixels.
    pub fn load(loader: &GameLoader, multiplier: u32, viewport: (u32, u32)) -> Result<Self, EngineError> {
        if multiplier == 0 {
            return Err(EngineError::new(ErrorCode::BadArgument, "resolution multiplier is zero"));
        }

        let cell_size = BASE_CELL_SIZE * multiplier;
        let actor_size = (cell_size + cell_size / 2) as i32;

        let (layout, dot_layout) = loader.load_map()?;
        let map = Map::new(layout, cell_size, viewport);
        let dots = DotsGrid::new(dot_layout, map.columns());

        let pacman = PacmanController::new(loader.load_actor(PACMAN_ASSET, &map)?, actor_size, &map);

        let load_ghost = |kind: GhostKind| loader.load_actor(kind.asset_name(), &map);
        let specs = [
            load_ghost(GhostKind::Blinky)?,
            load_ghost(GhostKind::Pinky)?,
            load_ghost(GhostKind::Inky)?,
            load_ghost(GhostKind::Clyde)?,
        ];
        let ai = AiController::new(specs, loader.load_ai(&map)?, actor_size, &map);

        info!(
            target: "game",
            "Session loaded: {}x{} cells of {}px, {} dots",
            map.columns(), map.rows(), cell_size, dots.total()
        );
        Ok(Self::from_parts(map, dots, pacman, ai))
    }

    pub fn from_parts(map: Map, dots: DotsGrid, pacman: PacmanController, ai: AiController) -> Self {
        let mut scheduler = Scheduler::new();
        install_rules(&mut scheduler);

        Self {
            world: World {
                map,
                dots,
                pacman,
                ai,
                score: 0,
                lives: START_LIVES,
                level: 1,
                status: SessionStatus::Playing,
                events: Vec::new(),
            },
            scheduler,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn map(&self) -> &Map {
        &self.world.map
    }

    pub fn dots(&self) -> &DotsGrid {
        &self.world.dots
    }

    pub fn pacman(&self) -> &PacmanController {
        &self.world.pacman
    }

    pub fn ai(&self) -> &AiController {
        &self.world.ai
    }

    pub fn score(&self) -> u32 {
        self.world.score
    }

    pub fn lives(&self) -> u32 {
        self.world.lives
    }

    pub fn level(&self) -> u32 {
        self.world.level
    }

    pub fn status(&self) -> SessionStatus {
        self.world.status
    }

    /// Events since the last call.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.world.events)
    }

    //--- Control ----------------------------------------------------------

    /// Player input. Ignored once the game is over.
    pub fn change_direction(&mut self, direction: MoveDirection) -> bool {
        if self.world.status != SessionStatus::Playing {
            return false;
        }
        let world = &mut self.world;
        world.pacman.change_direction(direction, &world.map)
    }

    /// Advances the game by `dt` milliseconds.
    pub fn update(&mut self, dt: u64) {
        if self.world.status != SessionStatus::Playing {
            return;
        }

        let world = &mut self.world;
        world.pacman.update(dt);

        let view = PacmanView::new(&world.pacman.region(), world.pacman.direction(), &world.map);
        world.ai.update(dt, &world.map, &view);

        self.scheduler.update(dt, &mut self.world);
        self.world.resolve_collisions();

        let dots = &self.world.dots;
        if self.world.status == SessionStatus::Playing && dots.total() > 0 && dots.remaining() == 0 {
            self.next_level();
        }
    }

    /// New game from level 1.
    pub fn restart(&mut self) {
        info!(target: "game", "Restarting");
        self.world.score = 0;
        self.world.lives = START_LIVES;
        self.world.level = 1;
        self.world.status = SessionStatus::Playing;
        self.reset_board();
    }

    fn next_level(&mut self) {
        let completed = self.world.level;
        info!(target: "game", "Level {} completed", completed);
        self.world.level += 1;
        self.world.events.push(SessionEvent::LevelCompleted { level: completed });
        self.reset_board();
    }

    fn reset_board(&mut self) {
        let world = &mut self.world;
        world.dots.reset();
        world.pacman.reset(&world.map);
        world.ai.reset_level(&world.map);

        self.scheduler.clear();
        install_rules(&mut self.scheduler);
    }

    //--- Drawing ----------------------------------------------------------

    /// Sprites for the current state, back to front.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let world = &self.world;
        let mut items = Vec::with_capacity(world.dots.remaining() + 6);

        items.push(DrawItem {
            sprite: Sprite::Map,
            region: world.map.rect(),
            rotation: 0,
        });

        items.extend(world.dots.visible_dots().map(|(cell, dot)| DrawItem {
            sprite: Sprite::Dot(dot),
            region: world.map.cell_region(cell),
            rotation: 0,
        }));

        items.push(DrawItem {
            sprite: Sprite::Pacman {
                frame: world.pacman.frame(),
            },
            region: world.pacman.region(),
            rotation: world.pacman.rotation(),
        });

        items.extend(world.ai.ghosts().iter().map(|ghost| DrawItem {
            sprite: Sprite::Ghost {
                kind: ghost.kind(),
                direction: ghost.direction(),
                frightened: ghost.state() == GhostState::Frightened,
            },
            region: ghost.region(),
            rotation: 0,
        }));

        items
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("score", &self.world.score)
            .field("lives", &self.world.lives)
            .field("level", &self.world.level)
            .field("status", &self.world.status)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::geometry::CellIndex;
    use crate::game::loader::{ActorSpec, AiInfo};
    use crate::game::map::tests::layout;

    //  0123456789
    // 0##########
    // 1            tunnel row, exits at both ends
    // 2##########
    // 3#        #  ghost pen, unreachable from row 1
    // 4##########
    fn map() -> Map {
        let mut l = layout(&["##########", "          ", "##########", "#        #", "##########"]);
        l.left_tunnel_exit = CellIndex::new(1, 0);
        l.right_tunnel_exit = CellIndex::new(1, 9);
        Map::new(l, 8, (80, 40))
    }

    fn spec(row: usize, column: usize, direction: MoveDirection) -> ActorSpec {
        ActorSpec {
            start_cell: CellIndex::new(row, column),
            start_direction: direction,
            speed: 10,
        }
    }

    fn info() -> AiInfo {
        AiInfo {
            scatter_targets: [CellIndex::new(0, 0); 4],
            scatter_duration: 100_000,
            scatter_interval: 100_000,
            fright_duration: 6000,
            direction_discard: Vec::new(),
            ghost_respawn: CellIndex::new(3, 5),
        }
    }

    fn dots(cells: &[(usize, usize, DotType)]) -> DotsGrid {
        let mut grid = vec![None; 50];
        for &(row, column, dot) in cells {
            grid[row * 10 + column] = Some(dot);
        }
        DotsGrid::new(grid, 10)
    }

    fn session_with(pacman_dir: MoveDirection, blinky: ActorSpec, dots: DotsGrid) -> GameSession {
        let map = map();
        let pacman = PacmanController::new(spec(1, 5, pacman_dir), 12, &map);
        let ghosts = [
            blinky,
            spec(3, 6, MoveDirection::Left),
            spec(3, 4, MoveDirection::Left),
            spec(3, 2, MoveDirection::Left),
        ];
        let ai = AiController::with_seed(ghosts, info(), 12, &map, 3);
        GameSession::from_parts(map, dots, pacman, ai)
    }

    fn session(dots: DotsGrid) -> GameSession {
        session_with(MoveDirection::Left, spec(3, 8, MoveDirection::Left), dots)
    }

    fn run(session: &mut GameSession, steps: usize) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for _ in 0..steps {
            session.update(40);
            events.extend(session.take_events());
        }
        events
    }

    //=====================================================================
    // Dots
    //=====================================================================

    #[test]
    fn pacman_eats_dots_on_his_way() {
        let mut game = session(dots(&[(1, 4, DotType::Small), (1, 3, DotType::Small), (1, 8, DotType::Small)]));

        run(&mut game, 10);

        assert_eq!(game.score(), 20);
        assert_eq!(game.dots().eaten(), 2);
        assert_eq!(game.dots().dot(CellIndex::new(1, 8)), Some(DotType::Small));
    }

    #[test]
    fn big_dot_frightens_ghosts() {
        let mut game = session(dots(&[(1, 4, DotType::Big), (1, 8, DotType::Small)]));

        run(&mut game, 1);

        assert_eq!(game.score(), 50);
        assert!(game.ai().is_frightened());
        assert_eq!(game.ai().ghost(GhostKind::Blinky).state(), GhostState::Frightened);
    }

    #[test]
    fn last_dot_completes_the_level() {
        let mut game = session(dots(&[(1, 4, DotType::Small)]));

        let events = run(&mut game, 1);

        assert_eq!(events, vec![SessionEvent::LevelCompleted { level: 1 }]);
        assert_eq!(game.level(), 2);
        assert_eq!(game.score(), 10);
        assert_eq!(game.dots().remaining(), 1);
        assert_eq!(game.map().find_cell(&game.pacman().region()), CellIndex::new(1, 5));
    }

    //=====================================================================
    // Tunnel
    //=====================================================================

    #[test]
    fn left_exit_leads_to_right_exit() {
        let mut game = session(dots(&[(3, 1, DotType::Small)]));

        run(&mut game, 11);

        assert_eq!(game.map().find_cell(&game.pacman().region()), CellIndex::new(1, 9));
        assert_eq!(game.pacman().direction(), MoveDirection::Left);
        assert!(game.pacman().actor().is_moving());
    }

    //=====================================================================
    // Ghosts
    //=====================================================================

    #[test]
    fn house_ghosts_released_by_dot_count() {
        let all: Vec<_> = (0..5)
            .flat_map(|row| (0..10).map(move |column| (row, column, DotType::Small)))
            .collect();
        let mut game = session(dots(&all));

        // 15 by hand plus the one under Pac-Man makes a third of 50.
        for column in 0..10 {
            game.world.dots.hide_dot(CellIndex::new(0, column));
        }
        for column in 0..5 {
            game.world.dots.hide_dot(CellIndex::new(2, column));
        }
        run(&mut game, 1);
        assert_eq!(game.ai().ghost(GhostKind::Clyde).state(), GhostState::LeaveHouse);
        assert_eq!(game.ai().ghost(GhostKind::Inky).state(), GhostState::Wait);

        for column in 5..10 {
            game.world.dots.hide_dot(CellIndex::new(2, column));
        }
        for column in 0..10 {
            game.world.dots.hide_dot(CellIndex::new(4, column));
        }
        run(&mut game, 1);
        assert_eq!(game.ai().ghost(GhostKind::Inky).state(), GhostState::LeaveHouse);
        assert_eq!(game.scheduler.len(), 3);
    }

    #[test]
    fn ghost_contact_costs_a_life() {
        let mut game = session_with(
            MoveDirection::Right,
            spec(1, 8, MoveDirection::Left),
            dots(&[(3, 1, DotType::Small)]),
        );

        let events = run(&mut game, 10);

        assert_eq!(events.first(), Some(&SessionEvent::LifeLost { lives: 2 }));
        assert_eq!(game.lives(), 2);
    }

    #[test]
    fn game_over_freezes_the_session() {
        let mut game = session_with(
            MoveDirection::Right,
            spec(1, 8, MoveDirection::Left),
            dots(&[(3, 1, DotType::Small)]),
        );

        let events = run(&mut game, 100);

        assert!(events.contains(&SessionEvent::GameOver { score: 0 }));
        assert_eq!(game.status(), SessionStatus::GameOver);

        let position = game.pacman().actor().position();
        run(&mut game, 5);
        assert_eq!(game.pacman().actor().position(), position);
        assert!(!game.change_direction(MoveDirection::Left));

        game.restart();
        assert_eq!(game.status(), SessionStatus::Playing);
        assert_eq!(game.lives(), START_LIVES);
    }

    #[test]
    fn frightened_ghost_is_eaten() {
        let mut game = session_with(
            MoveDirection::Right,
            spec(1, 8, MoveDirection::Left),
            dots(&[(1, 6, DotType::Big), (3, 1, DotType::Small)]),
        );

        let events = run(&mut game, 10);

        assert!(events.contains(&SessionEvent::GhostEaten(GhostKind::Blinky)));
        assert_eq!(game.score(), 50 + GHOST_SCORE);
        assert_eq!(game.lives(), START_LIVES);
        let blinky = game.ai().ghost(GhostKind::Blinky);
        assert_eq!(game.map().find_cell(&blinky.region()).row, 3);
    }

    //=====================================================================
    // Drawing
    //=====================================================================

    #[test]
    fn draw_list_back_to_front() {
        let game = session(dots(&[(1, 4, DotType::Small), (1, 1, DotType::Big)]));
        let items = game.draw_list();

        assert_eq!(items.len(), 1 + 2 + 1 + 4);
        assert_eq!(items[0].sprite, Sprite::Map);
        assert_eq!(items[0].region, game.map().rect());
        assert_eq!(items[1].sprite, Sprite::Dot(DotType::Big));
        assert_eq!(items[1].region, game.map().cell_region(CellIndex::new(1, 1)));
        assert!(matches!(items[3].sprite, Sprite::Pacman { .. }));
        assert_eq!(items[3].rotation, 180);
        assert!(matches!(
            items[4].sprite,
            Sprite::Ghost { kind: GhostKind::Blinky, frightened: false, .. }
        ));
    }
}
