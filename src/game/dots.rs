//=========================================================================
// Dots Grid
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::geometry::CellIndex;

//=== DotType =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DotType {
    Small = 4,
    /// Energizer: frightens the ghosts.
    Big = 5,
}

impl DotType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            4 => Some(Self::Small),
            5 => Some(Self::Big),
            _ => None,
        }
    }

    pub fn score(self) -> u32 {
        match self {
            Self::Small => 10,
            Self::Big => 50,
        }
    }
}

//=== DotsGrid ============================================================

/// Dots laid over the map grid, one slot per cell.
#[derive(Debug, Clone)]
pub struct DotsGrid {
    columns: usize,
    layout: Vec<Option<DotType>>,
    visible: Vec<bool>,
    total: usize,
    eaten: usize,
}

impl DotsGrid {
    /// `layout` is row-major with `columns` cells per row.
    pub fn new(layout: Vec<Option<DotType>>, columns: usize) -> Self {
        let visible: Vec<bool> = layout.iter().map(Option::is_some).collect();
        let total = visible.iter().filter(|v| **v).count();
        debug!(target: "game", "Dots grid: {} dots", total);

        Self {
            columns,
            layout,
            visible,
            total,
            eaten: 0,
        }
    }

    /// Hides the dot on `cell`, returning what was eaten.
    pub fn hide_dot(&mut self, cell: CellIndex) -> Option<DotType> {
        let slot = self.slot(cell)?;
        if !self.visible[slot] {
            return None;
        }

        self.visible[slot] = false;
        self.eaten += 1;
        self.layout[slot]
    }

    pub fn dot(&self, cell: CellIndex) -> Option<DotType> {
        let slot = self.slot(cell)?;
        if self.visible[slot] {
            self.layout[slot]
        } else {
            None
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn eaten(&self) -> usize {
        self.eaten
    }

    pub fn remaining(&self) -> usize {
        self.total - self.eaten
    }

    /// Shows every dot again.
    pub fn reset(&mut self) {
        for (visible, dot) in self.visible.iter_mut().zip(&self.layout) {
            *visible = dot.is_some();
        }
        self.eaten = 0;
    }

    /// Visible dots in row-major order.
    pub fn visible_dots(&self) -> impl Iterator<Item = (CellIndex, DotType)> + '_ {
        self.layout
            .iter()
            .zip(&self.visible)
            .enumerate()
            .filter_map(move |(slot, (dot, visible))| {
                let dot = (*dot).filter(|_| *visible)?;
                Some((CellIndex::new(slot / self.columns, slot % self.columns), dot))
            })
    }

    fn slot(&self, cell: CellIndex) -> Option<usize> {
        if cell.column >= self.columns {
            return None;
        }
        let slot = cell.row * self.columns + cell.column;
        (slot < self.layout.len()).then_some(slot)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> DotsGrid {
        // . o
        // _ .
        DotsGrid::new(
            vec![Some(DotType::Small), Some(DotType::Big), None, Some(DotType::Small)],
            2,
        )
    }

    #[test]
    fn hide_dot_counts_once() {
        let mut dots = grid();
        assert_eq!(dots.total(), 3);

        assert_eq!(dots.hide_dot(CellIndex::new(0, 1)), Some(DotType::Big));
        assert_eq!(dots.hide_dot(CellIndex::new(0, 1)), None);
        assert_eq!(dots.hide_dot(CellIndex::new(1, 0)), None);
        assert_eq!(dots.eaten(), 1);
        assert_eq!(dots.remaining(), 2);
    }

    #[test]
    fn out_of_grid_cells_hold_nothing() {
        let mut dots = grid();
        assert_eq!(dots.hide_dot(CellIndex::new(0, 2)), None);
        assert_eq!(dots.hide_dot(CellIndex::new(5, 0)), None);
        assert_eq!(dots.dot(CellIndex::new(5, 0)), None);
    }

    #[test]
    fn visible_dots_and_reset() {
        let mut dots = grid();
        dots.hide_dot(CellIndex::new(0, 0));

        let visible: Vec<_> = dots.visible_dots().collect();
        assert_eq!(
            visible,
            vec![
                (CellIndex::new(0, 1), DotType::Big),
                (CellIndex::new(1, 1), DotType::Small)
            ]
        );

        dots.reset();
        assert_eq!(dots.visible_dots().count(), 3);
        assert_eq!(dots.eaten(), 0);
    }

    #[test]
    fn scores() {
        assert_eq!(DotType::Small.score(), 10);
        assert_eq!(DotType::Big.score(), 50);
        assert_eq!(DotType::from_code(4), Some(DotType::Small));
        assert_eq!(DotType::from_code(1), None);
    }
}
