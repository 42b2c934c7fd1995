//=========================================================================
// Map
//=========================================================================
//
// The maze: a rows × columns grid of cells, centered in the viewport.
//
// Pixel layout:
// ```text
//   viewport
//   ┌────────────────────────────┐
//   │  padding                   │
//   │   ┌────────────────────┐   │
//   │   │ rect (cells × size)│   │
//   │   └────────────────────┘   │
//   └────────────────────────────┘
// ```
//
// Reads outside the grid return `Space`. Only `Empty` cells are walkable.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::geometry::{CellIndex, MoveDirection, Point, Region};

//=== Constants ===========================================================

/// Cell edge in pixels at multiplier 1.
pub const BASE_CELL_SIZE: u32 = 8;

const COLOR_COMPONENTS: usize = 3;

const EMPTY_COLOR: [u8; 3] = [0, 0, 0];
const WALL_COLOR: [u8; 3] = [0, 0, 255];
const DOOR_COLOR: [u8; 3] = [255, 255, 255];

//=== MapCellType =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapCellType {
    /// Walkable corridor.
    Empty = 0,
    Wall = 1,
    /// Ghost house door.
    Door = 2,
    /// Non-walkable filler outside the corridors.
    Space = 3,
}

impl MapCellType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Wall),
            2 => Some(Self::Door),
            3 => Some(Self::Space),
            _ => None,
        }
    }

    /// Open cells do not get a wall border.
    fn is_open(self) -> bool {
        matches!(self, Self::Empty | Self::Space)
    }

    fn color(self) -> [u8; 3] {
        match self {
            Self::Empty | Self::Space => EMPTY_COLOR,
            Self::Wall => WALL_COLOR,
            Self::Door => DOOR_COLOR,
        }
    }
}

//=== Neighbours ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub left: MapCellType,
    pub right: MapCellType,
    pub top: MapCellType,
    pub bottom: MapCellType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullNeighbors {
    pub direct: Neighbors,
    pub left_top: MapCellType,
    pub right_top: MapCellType,
    pub left_bottom: MapCellType,
    pub right_bottom: MapCellType,
}

//=== MapLayout ===========================================================

/// Validated cell grid as read from the map data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLayout {
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<MapCellType>,
    pub left_tunnel_exit: CellIndex,
    pub right_tunnel_exit: CellIndex,
}

//=== Map =================================================================

#[derive(Debug, Clone)]
pub struct Map {
    layout: MapLayout,
    cell_size: i32,
    rect: Region,
}

impl Map {
    /// Places the grid in a `viewport` (pixels) with `cell_size` pixel cells.
    pub fn new(layout: MapLayout, cell_size: u32, viewport: (u32, u32)) -> Self {
        let cell_size = cell_size as i32;
        let width = layout.columns as i32 * cell_size;
        let height = layout.rows as i32 * cell_size;

        let pad_x = (viewport.0 as i32 - width) / 2;
        let pad_y = (viewport.1 as i32 - height) / 2;
        if pad_x < 0 || pad_y < 0 {
            warn!(
                target: "game",
                "Map {}x{} does not fit viewport {}x{}",
                width, height, viewport.0, viewport.1
            );
        }

        let rect = Region::new(pad_x.max(0), pad_y.max(0), width, height);
        debug!(target: "game", "Map placed at {:?}, cell {}px", rect, cell_size);

        Self {
            layout,
            cell_size,
            rect,
        }
    }

    pub fn rows(&self) -> usize {
        self.layout.rows
    }

    pub fn columns(&self) -> usize {
        self.layout.columns
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Pixel rectangle covered by the grid.
    pub fn rect(&self) -> Region {
        self.rect
    }

    pub fn left_tunnel_exit(&self) -> CellIndex {
        self.layout.left_tunnel_exit
    }

    pub fn right_tunnel_exit(&self) -> CellIndex {
        self.layout.right_tunnel_exit
    }

    pub fn contains(&self, index: CellIndex) -> bool {
        index.row < self.layout.rows && index.column < self.layout.columns
    }

    pub fn cell(&self, index: CellIndex) -> MapCellType {
        if self.contains(index) {
            self.layout.cells[index.row * self.layout.columns + index.column]
        } else {
            MapCellType::Space
        }
    }

    pub fn is_walkable(&self, index: CellIndex) -> bool {
        self.cell(index) == MapCellType::Empty
    }

    //--- Pixel mapping ----------------------------------------------------

    pub fn cell_center(&self, index: CellIndex) -> Point {
        let half = self.cell_size / 2;
        Point::new(
            self.rect.x + index.column as i32 * self.cell_size + half,
            self.rect.y + index.row as i32 * self.cell_size + half,
        )
    }

    pub fn cell_region(&self, index: CellIndex) -> Region {
        Region::new(
            self.rect.x + index.column as i32 * self.cell_size,
            self.rect.y + index.row as i32 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    /// Top-left position centering an actor of `actor_size` on `index`.
    pub fn actor_position(&self, index: CellIndex, actor_size: i32) -> Point {
        let half = actor_size / 2;
        self.cell_center(index) - Point::new(half, half)
    }

    /// Start position on `index`: shifted half a cell left, so the actor
    /// straddles `index` and its left neighbour.
    pub fn start_position(&self, index: CellIndex, actor_size: i32) -> Point {
        self.actor_position(index, actor_size) - Point::new(self.cell_size / 2, 0)
    }

    /// Cell holding the center of `region`, clamped to the grid.
    pub fn find_cell(&self, region: &Region) -> CellIndex {
        self.cell_at(region.center())
    }

    /// Cells overlapped by a cell-sized box centered on `region`.
    ///
    /// One cell when the actor sits on a cell center, two while it moves
    /// between cells, up to four while cutting a corner.
    pub fn find_cells(&self, region: &Region) -> Vec<CellIndex> {
        let center = region.center();
        let half = self.cell_size / 2;

        let first = self.cell_at(center - Point::new(half, half));
        let last = self.cell_at(center + Point::new(half - 1, half - 1));

        let mut cells = Vec::with_capacity(4);
        for row in first.row..=last.row {
            for column in first.column..=last.column {
                cells.push(CellIndex::new(row, column));
            }
        }
        cells
    }

    fn cell_at(&self, point: Point) -> CellIndex {
        let local = point - self.rect.position();
        let clamp = |value: i32, count: usize| -> usize {
            let index = value.div_euclid(self.cell_size).max(0) as usize;
            index.min(count.saturating_sub(1))
        };
        CellIndex::new(clamp(local.y, self.layout.rows), clamp(local.x, self.layout.columns))
    }

    //--- Neighbourhood ----------------------------------------------------

    /// Adjacent cell in `direction`, if it lies on the grid.
    pub fn next_cell(&self, index: CellIndex, direction: MoveDirection) -> Option<CellIndex> {
        let next = match direction {
            MoveDirection::Left => CellIndex::new(index.row, index.column.checked_sub(1)?),
            MoveDirection::Right => CellIndex::new(index.row, index.column + 1),
            MoveDirection::Up => CellIndex::new(index.row.checked_sub(1)?, index.column),
            MoveDirection::Down => CellIndex::new(index.row + 1, index.column),
            MoveDirection::None => return None,
        };
        self.contains(next).then_some(next)
    }

    pub fn direct_neighbors(&self, index: CellIndex) -> Neighbors {
        Neighbors {
            left: self.relative(index, 0, -1),
            right: self.relative(index, 0, 1),
            top: self.relative(index, -1, 0),
            bottom: self.relative(index, 1, 0),
        }
    }

    pub fn full_neighbors(&self, index: CellIndex) -> FullNeighbors {
        FullNeighbors {
            direct: self.direct_neighbors(index),
            left_top: self.relative(index, -1, -1),
            right_top: self.relative(index, -1, 1),
            left_bottom: self.relative(index, 1, -1),
            right_bottom: self.relative(index, 1, 1),
        }
    }

    fn relative(&self, index: CellIndex, d_row: isize, d_column: isize) -> MapCellType {
        match (
            index.row.checked_add_signed(d_row),
            index.column.checked_add_signed(d_column),
        ) {
            (Some(row), Some(column)) => self.cell(CellIndex::new(row, column)),
            _ => MapCellType::Space,
        }
    }

    /// Furthest cell reachable from `index` walking straight in `direction`.
    pub fn find_max_available_cell(&self, index: CellIndex, direction: MoveDirection) -> CellIndex {
        let mut current = index;
        while let Some(next) = self.next_cell(current, direction) {
            if !self.is_walkable(next) {
                break;
            }
            current = next;
        }
        current
    }

    /// Where an actor leaving through a tunnel exit reappears.
    pub fn tunnel_destination(&self, index: CellIndex, direction: MoveDirection) -> Option<CellIndex> {
        if index == self.layout.left_tunnel_exit && direction == MoveDirection::Left {
            Some(self.layout.right_tunnel_exit)
        } else if index == self.layout.right_tunnel_exit && direction == MoveDirection::Right {
            Some(self.layout.left_tunnel_exit)
        } else {
            None
        }
    }

    //--- Texture ----------------------------------------------------------

    /// Renders the maze into an RGB888 power-of-two texture.
    ///
    /// Walls lose a quarter cell on each open side and the door a quarter
    /// cell at top and bottom, which leaves thin outlined walls. Inner
    /// corners of thick walls are then cleared.
    pub fn generate_texture(&self) -> MapTexture {
        let mut texture = MapTexture::new(self.rect.width as usize, self.rect.height as usize);
        let quarter = self.cell_size / 4;

        for row in 0..self.rows() {
            for column in 0..self.columns() {
                let index = CellIndex::new(row, column);
                let cell = self.cell(index);
                let mut region = self.local_cell_region(index);

                match cell {
                    MapCellType::Door => {
                        region.y += quarter;
                        region.height -= 2 * quarter;
                    }
                    MapCellType::Wall => {
                        let n = self.direct_neighbors(index);
                        if n.left.is_open() {
                            region.x += quarter;
                            region.width -= quarter;
                        }
                        if n.right.is_open() {
                            region.width -= quarter;
                        }
                        if n.top.is_open() {
                            region.y += quarter;
                            region.height -= quarter;
                        }
                        if n.bottom.is_open() {
                            region.height -= quarter;
                        }
                    }
                    MapCellType::Empty | MapCellType::Space => {}
                }

                texture.fill(region, cell.color());
            }
        }

        self.clean_artifacts(&mut texture, quarter);
        texture
    }

    fn clean_artifacts(&self, texture: &mut MapTexture, quarter: i32) {
        for row in 0..self.rows() {
            for column in 0..self.columns() {
                let index = CellIndex::new(row, column);
                if self.cell(index) != MapCellType::Wall {
                    continue;
                }

                let n = self.full_neighbors(index);
                let cell = self.local_cell_region(index);
                let right = cell.x + cell.width - quarter;
                let bottom = cell.y + cell.height - quarter;

                let corners = [
                    (n.left_top, n.direct.left, n.direct.top, cell.x, cell.y),
                    (n.right_top, n.direct.right, n.direct.top, right, cell.y),
                    (n.left_bottom, n.direct.left, n.direct.bottom, cell.x, bottom),
                    (n.right_bottom, n.direct.right, n.direct.bottom, right, bottom),
                ];

                for (diagonal, side_a, side_b, x, y) in corners {
                    if diagonal.is_open()
                        && side_a == MapCellType::Wall
                        && side_b == MapCellType::Wall
                    {
                        texture.fill(Region::new(x, y, quarter, quarter), diagonal.color());
                    }
                }
            }
        }
    }

    fn local_cell_region(&self, index: CellIndex) -> Region {
        Region::new(
            index.column as i32 * self.cell_size,
            index.row as i32 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }
}

//=== MapTexture ==========================================================

/// RGB888 pixels, rows top to bottom. Only the top-left
/// `content_width × content_height` area holds the maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTexture {
    pub width: usize,
    pub height: usize,
    pub content_width: usize,
    pub content_height: usize,
    pub pixels: Vec<u8>,
}

impl MapTexture {
    fn new(content_width: usize, content_height: usize) -> Self {
        let width = content_width.next_power_of_two();
        let height = content_height.next_power_of_two();
        Self {
            width,
            height,
            content_width,
            content_height,
            pixels: vec![0; width * height * COLOR_COMPONENTS],
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * COLOR_COMPONENTS;
        Some([
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ])
    }

    fn fill(&mut self, region: Region, color: [u8; 3]) {
        let x0 = region.x.max(0) as usize;
        let y0 = region.y.max(0) as usize;
        let x1 = ((region.x + region.width).max(0) as usize).min(self.width);
        let y1 = ((region.y + region.height).max(0) as usize).min(self.height);

        for y in y0..y1 {
            let row = y * self.width;
            for x in x0..x1 {
                let offset = (row + x) * COLOR_COMPONENTS;
                self.pixels[offset..offset + COLOR_COMPONENTS].copy_from_slice(&color);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
