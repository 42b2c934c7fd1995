//=========================================================================
// Geometry
//=========================================================================
//
// Cell indices, pixel positions and movement directions shared by the
// map, the actors and the ghost AI.
//
// Pixel space: origin at the top-left of the viewport, y grows downwards.
// Cell space: (row, column), row 0 at the top.
//
//=========================================================================

//=== CellIndex ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellIndex {
    pub row: usize,
    pub column: usize,
}

impl CellIndex {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Squared euclidean distance in cells.
    pub fn distance_squared(self, other: CellIndex) -> usize {
        let dr = self.row.abs_diff(other.row);
        let dc = self.column.abs_diff(other.column);
        dr * dr + dc * dc
    }

    /// The cell `offset` steps away along `direction`.
    ///
    /// Moving left or up stops at the first row/column; right and down are
    /// unbounded here and checked against the map by the caller.
    pub fn offset(self, direction: MoveDirection, offset: usize) -> CellIndex {
        match direction {
            MoveDirection::Left => CellIndex::new(self.row, self.column.saturating_sub(offset)),
            MoveDirection::Right => CellIndex::new(self.row, self.column + offset),
            MoveDirection::Up => CellIndex::new(self.row.saturating_sub(offset), self.column),
            MoveDirection::Down => CellIndex::new(self.row + offset, self.column),
            MoveDirection::None => self,
        }
    }
}

impl From<[usize; 2]> for CellIndex {
    fn from(value: [usize; 2]) -> Self {
        CellIndex::new(value[0], value[1])
    }
}

/// Picks the cell lying furthest along `direction`.
///
/// An actor spanning two cells is "in" the one it is heading into. Returns
/// `None` for an empty slice.
pub fn select_nearest_cell(cells: &[CellIndex], direction: MoveDirection) -> Option<CellIndex> {
    let (first, rest) = cells.split_first()?;

    let nearest = rest.iter().fold(*first, |best, &cell| {
        let better = match direction {
            MoveDirection::Left => cell.column < best.column,
            MoveDirection::Right => cell.column > best.column,
            MoveDirection::Up => cell.row < best.row,
            MoveDirection::Down => cell.row > best.row,
            MoveDirection::None => false,
        };
        if better {
            cell
        } else {
            best
        }
    });

    Some(nearest)
}

//=== Point ===============================================================

/// Pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

//=== Region ==============================================================

/// Axis-aligned pixel rectangle, positioned by its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn square(position: Point, size: i32) -> Self {
        Self::new(position.x, position.y, size, size)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

//=== MoveDirection =======================================================

/// Actor heading. Numeric codes are the ones used by the data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoveDirection {
    #[default]
    None = 0,
    Left = 1,
    Right = 2,
    Up = 3,
    Down = 4,
}

impl MoveDirection {
    /// Order in which ghosts break distance ties.
    pub const TURN_ORDER: [MoveDirection; 4] = [
        MoveDirection::Up,
        MoveDirection::Left,
        MoveDirection::Down,
        MoveDirection::Right,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            3 => Some(Self::Up),
            4 => Some(Self::Down),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::None => Self::None,
        }
    }

    /// Sprite rotation in degrees, counter-clockwise from facing right.
    pub fn rotation(self) -> u16 {
        match self {
            Self::Left => 180,
            Self::Right | Self::None => 0,
            Self::Up => 90,
            Self::Down => 270,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_codes() {
        for code in 0..=4 {
            let direction = MoveDirection::from_code(code).unwrap();
            assert_eq!(direction.code(), code);
        }
        assert_eq!(MoveDirection::from_code(5), None);
    }

    #[test]
    fn reverse_is_an_involution() {
        for direction in MoveDirection::TURN_ORDER {
            assert_ne!(direction.reverse(), direction);
            assert_eq!(direction.reverse().reverse(), direction);
        }
        assert_eq!(MoveDirection::None.reverse(), MoveDirection::None);
    }

    #[test]
    fn rotations() {
        assert_eq!(MoveDirection::Left.rotation(), 180);
        assert_eq!(MoveDirection::Right.rotation(), 0);
        assert_eq!(MoveDirection::Up.rotation(), 90);
        assert_eq!(MoveDirection::Down.rotation(), 270);
    }

    #[test]
    fn offset_clamps_towards_origin() {
        let cell = CellIndex::new(2, 3);
        assert_eq!(cell.offset(MoveDirection::Left, 4), CellIndex::new(2, 0));
        assert_eq!(cell.offset(MoveDirection::Up, 4), CellIndex::new(0, 3));
        assert_eq!(cell.offset(MoveDirection::Right, 4), CellIndex::new(2, 7));
        assert_eq!(cell.offset(MoveDirection::Down, 4), CellIndex::new(6, 3));
        assert_eq!(cell.offset(MoveDirection::None, 4), cell);
    }

    #[test]
    fn nearest_cell_follows_direction() {
        let cells = [CellIndex::new(5, 4), CellIndex::new(5, 5)];
        assert_eq!(select_nearest_cell(&cells, MoveDirection::Left), Some(CellIndex::new(5, 4)));
        assert_eq!(select_nearest_cell(&cells, MoveDirection::Right), Some(CellIndex::new(5, 5)));
        assert_eq!(select_nearest_cell(&cells, MoveDirection::None), Some(CellIndex::new(5, 4)));
        assert_eq!(select_nearest_cell(&[], MoveDirection::Left), None);
    }

    #[test]
    fn region_center() {
        let region = Region::new(10, 20, 12, 12);
        assert_eq!(region.center(), Point::new(16, 26));
    }
}
