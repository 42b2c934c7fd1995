//=========================================================================
// Game Loader
//=========================================================================
//
// Reads the JSON game data through the host's `AssetSource` and turns it
// into validated game types.
//
// Assets:
//   config.json   base resolution the sprites are designed for
//   map.json      cell grid, dots and tunnel exits
//   <actor>.json  start cell, direction and speed of one actor
//   ai.json       ghost targets, timers and turn restrictions
//
// A missing asset is `AssetNotFound`; anything malformed is `BadFormat`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use super::dots::DotType;
use super::geometry::{CellIndex, MoveDirection};
use super::map::{Map, MapCellType, MapLayout};
use crate::core::assets::AssetSource;
use crate::core::error::{EngineError, ErrorCode};

//=== Asset Names =========================================================

pub const CONFIG_ASSET: &str = "config.json";
pub const MAP_ASSET: &str = "map.json";
pub const PACMAN_ASSET: &str = "pacman.json";
pub const AI_ASSET: &str = "ai.json";

//=== Descriptors =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Contents of `config.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    pub base_resolution: Resolution,
}

impl EngineConfig {
    /// Integer scale of the base resolution that fits in `width × height`.
    pub fn multiplier(&self, width: u32, height: u32) -> u32 {
        (width / self.base_resolution.width).min(height / self.base_resolution.height)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapDescriptor {
    rows_count: usize,
    cells: Vec<u8>,
    left_tunnel_exit: [usize; 2],
    right_tunnel_exit: [usize; 2],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActorDescriptor {
    start_cell_index: [usize; 2],
    start_direction: u8,
    start_speed: u32,
}

#[derive(Debug, Deserialize)]
struct ScatterTargets {
    blinky: [usize; 2],
    pinky: [usize; 2],
    inky: [usize; 2],
    clyde: [usize; 2],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiDescriptor {
    scatter_target: ScatterTargets,
    scatter_duration: u64,
    scatter_interval: u64,
    fright_duration: u64,
    direction_discard: Vec<([usize; 2], u8)>,
    ghost_respawn: [usize; 2],
}

//=== Loaded Types ========================================================

/// Start state of one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorSpec {
    pub start_cell: CellIndex,
    pub start_direction: MoveDirection,
    /// Cells per second.
    pub speed: u32,
}

/// Ghost AI parameters. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiInfo {
    /// Indexed by `GhostKind::index()`.
    pub scatter_targets: [CellIndex; 4],
    pub scatter_duration: u64,
    /// Chase time between two scatter phases.
    pub scatter_interval: u64,
    pub fright_duration: u64,
    /// Turns ghosts may not take outside fright mode.
    pub direction_discard: Vec<(CellIndex, MoveDirection)>,
    pub ghost_respawn: CellIndex,
}

impl AiInfo {
    pub fn is_discarded(&self, cell: CellIndex, direction: MoveDirection) -> bool {
        self.direction_discard.contains(&(cell, direction))
    }
}

//=== GameLoader ==========================================================

#[derive(Clone)]
pub struct GameLoader {
    assets: Arc<dyn AssetSource>,
}

impl GameLoader {
    pub fn new(assets: Arc<dyn AssetSource>) -> Self {
        Self { assets }
    }

    pub fn load_config(&self) -> Result<EngineConfig, EngineError> {
        let config: EngineConfig = self.load_json(CONFIG_ASSET)?;
        let base = config.base_resolution;
        if base.width == 0 || base.height == 0 {
            return Err(bad_format(CONFIG_ASSET, "base resolution must be positive"));
        }
        Ok(config)
    }

    /// Loads the cell grid and the dot layout laid over it.
    pub fn load_map(&self) -> Result<(MapLayout, Vec<Option<DotType>>), EngineError> {
        let descriptor: MapDescriptor = self.load_json(MAP_ASSET)?;
        parse_map(descriptor)
    }

    pub fn load_actor(&self, name: &str, map: &Map) -> Result<ActorSpec, EngineError> {
        let descriptor: ActorDescriptor = self.load_json(name)?;

        let start_cell = CellIndex::from(descriptor.start_cell_index);
        if !map.contains(start_cell) {
            return Err(bad_format(name, format!("start cell {:?} outside the map", start_cell)));
        }

        let start_direction = MoveDirection::from_code(descriptor.start_direction)
            .ok_or_else(|| bad_format(name, format!("bad direction {}", descriptor.start_direction)))?;

        Ok(ActorSpec {
            start_cell,
            start_direction,
            speed: descriptor.start_speed,
        })
    }

    pub fn load_ai(&self, map: &Map) -> Result<AiInfo, EngineError> {
        let descriptor: AiDescriptor = self.load_json(AI_ASSET)?;

        let ghost_respawn = CellIndex::from(descriptor.ghost_respawn);
        if !map.contains(ghost_respawn) {
            return Err(bad_format(AI_ASSET, "respawn cell outside the map"));
        }

        let direction_discard = descriptor
            .direction_discard
            .into_iter()
            .map(|(cell, code)| {
                let cell = CellIndex::from(cell);
                match MoveDirection::from_code(code) {
                    Some(direction) if map.contains(cell) => Ok((cell, direction)),
                    _ => Err(bad_format(AI_ASSET, format!("bad discard entry {:?}/{}", cell, code))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let targets = descriptor.scatter_target;
        Ok(AiInfo {
            scatter_targets: [
                targets.blinky.into(),
                targets.pinky.into(),
                targets.inky.into(),
                targets.clyde.into(),
            ],
            scatter_duration: descriptor.scatter_duration,
            scatter_interval: descriptor.scatter_interval,
            fright_duration: descriptor.fright_duration,
            direction_discard,
            ghost_respawn,
        })
    }

    /// Loads and deserializes one JSON asset.
    pub fn load_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, EngineError> {
        let text = self
            .assets
            .load_text(name)
            .ok_or_else(|| EngineError::new(ErrorCode::AssetNotFound, name))?;

        debug!(target: "game", "Parsing {} ({} bytes)", name, text.len());
        serde_json::from_str(&text).map_err(|e| bad_format(name, e.to_string()))
    }
}

impl std::fmt::Debug for GameLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLoader").finish_non_exhaustive()
    }
}

//=== Parsing =============================================================

fn parse_map(descriptor: MapDescriptor) -> Result<(MapLayout, Vec<Option<DotType>>), EngineError> {
    let rows = descriptor.rows_count;
    if rows == 0 || descriptor.cells.is_empty() || descriptor.cells.len() % rows != 0 {
        return Err(bad_format(
            MAP_ASSET,
            format!("{} cells do not split into {} rows", descriptor.cells.len(), rows),
        ));
    }
    let columns = descriptor.cells.len() / rows;

    let mut cells = Vec::with_capacity(descriptor.cells.len());
    let mut dots = Vec::with_capacity(descriptor.cells.len());
    for code in descriptor.cells {
        if let Some(dot) = DotType::from_code(code) {
            cells.push(MapCellType::Empty);
            dots.push(Some(dot));
        } else {
            let cell = MapCellType::from_code(code)
                .ok_or_else(|| bad_format(MAP_ASSET, format!("bad cell value {}", code)))?;
            cells.push(cell);
            dots.push(None);
        }
    }

    let left_tunnel_exit = CellIndex::from(descriptor.left_tunnel_exit);
    let right_tunnel_exit = CellIndex::from(descriptor.right_tunnel_exit);
    let inside = |c: CellIndex| c.row < rows && c.column < columns;
    if !inside(left_tunnel_exit) || !inside(right_tunnel_exit) {
        return Err(bad_format(MAP_ASSET, "tunnel exit outside the map"));
    }

    let layout = MapLayout {
        rows,
        columns,
        cells,
        left_tunnel_exit,
        right_tunnel_exit,
    };
    Ok((layout, dots))
}

fn bad_format(asset: &str, detail: impl std::fmt::Display) -> EngineError {
    EngineError::new(ErrorCode::BadFormat, format!("{}: {}", asset, detail))
}

//=========================================================================
// Unit Tests
//=========================================================================
