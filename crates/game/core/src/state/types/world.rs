//! Grid state: terrain, height, and single-occupancy tracking.

use super::common::{Position, UnitId};

/// Canonical terrain classes for battle cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Open,
    Rough,
    Road,
    Wall,
}

impl TerrainKind {
    /// Movement cost of entering a cell of this terrain; `None` when
    /// impassable.
    pub fn move_cost(self) -> Option<u32> {
        match self {
            TerrainKind::Open | TerrainKind::Road => Some(1),
            TerrainKind::Rough => Some(2),
            TerrainKind::Wall => None,
        }
    }

    pub fn is_passable(self) -> bool {
        self.move_cost().is_some()
    }
}

/// One cell of the battle grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub terrain: TerrainKind,
    pub height: i8,
    occupant: Option<UnitId>,
}

impl Cell {
    pub fn new(terrain: TerrainKind, height: i8) -> Self {
        Self {
            terrain,
            height,
            occupant: None,
        }
    }

    #[inline]
    pub fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Row-major battle grid holding terrain, height, and occupancy together.
///
/// Invariant: at most one unit per cell. The command pipeline is the only
/// writer; [`verify`](crate::invariant) cross-checks occupancy against the
/// unit table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridState {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl GridState {
    /// Creates a grid from row-major cells.
    ///
    /// # Panics
    ///
    /// Panics if `cells.len() != width * height`; scenario ingestion
    /// validates dimensions before construction.
    pub fn new(width: u32, height: u32, cells: Vec<Cell>) -> Self {
        assert_eq!(
            cells.len(),
            (width * height) as usize,
            "grid cells must match dimensions"
        );
        Self {
            width,
            height,
            cells,
        }
    }

    /// Creates a uniform grid of the given terrain at height zero.
    pub fn filled(width: u32, height: u32, terrain: TerrainKind) -> Self {
        Self::new(
            width,
            height,
            vec![Cell::new(terrain, 0); (width * height) as usize],
        )
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        Some((position.y as u32 * self.width + position.x as u32) as usize)
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index(position).map(|i| &self.cells[i])
    }

    pub fn occupant(&self, position: Position) -> Option<UnitId> {
        self.cell(position).and_then(Cell::occupant)
    }

    pub fn height_at(&self, position: Position) -> i8 {
        self.cell(position).map(|c| c.height).unwrap_or(0)
    }

    /// Terrain movement cost of entering `position`; `None` when out of
    /// bounds or impassable.
    pub fn move_cost(&self, position: Position) -> Option<u32> {
        self.cell(position).and_then(|c| c.terrain.move_cost())
    }

    /// Whether a unit could stand on `position`: in bounds, passable, vacant.
    pub fn can_enter(&self, position: Position) -> bool {
        self.cell(position)
            .map(|c| c.terrain.is_passable() && !c.is_occupied())
            .unwrap_or(false)
    }

    /// Places `unit` on `position`.
    ///
    /// Returns `false` if the cell is missing, impassable, or already
    /// occupied by a different unit.
    pub fn place(&mut self, position: Position, unit: UnitId) -> bool {
        let Some(index) = self.index(position) else {
            return false;
        };
        let cell = &mut self.cells[index];
        if !cell.terrain.is_passable() {
            return false;
        }
        match cell.occupant {
            Some(existing) => existing == unit,
            None => {
                cell.occupant = Some(unit);
                true
            }
        }
    }

    /// Removes `unit` from `position`. Returns `false` if it was not there.
    pub fn vacate(&mut self, position: Position, unit: UnitId) -> bool {
        let Some(index) = self.index(position) else {
            return false;
        };
        let cell = &mut self.cells[index];
        if cell.occupant == Some(unit) {
            cell.occupant = None;
            true
        } else {
            false
        }
    }

    /// Iterates `(position, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.cells.iter().enumerate().map(|(i, cell)| {
            let x = (i as u32 % self.width) as i32;
            let y = (i as u32 / self.width) as i32;
            (Position::new(x, y), cell)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_occupancy_enforced() {
        let mut grid = GridState::filled(4, 4, TerrainKind::Open);
        let a = UnitId(1);
        let b = UnitId(2);
        let cell = Position::new(1, 1);

        assert!(grid.place(cell, a));
        assert!(!grid.place(cell, b));
        assert_eq!(grid.occupant(cell), Some(a));

        assert!(grid.vacate(cell, a));
        assert!(grid.place(cell, b));
    }

    #[test]
    fn walls_are_impassable() {
        let mut cells = vec![Cell::new(TerrainKind::Open, 0); 4];
        cells[3] = Cell::new(TerrainKind::Wall, 0);
        let mut grid = GridState::new(2, 2, cells);

        let wall = Position::new(1, 1);
        assert!(!grid.can_enter(wall));
        assert!(!grid.place(wall, UnitId(1)));
    }

    #[test]
    fn out_of_bounds_queries() {
        let grid = GridState::filled(3, 3, TerrainKind::Open);
        assert!(!grid.contains(Position::new(-1, 0)));
        assert!(!grid.contains(Position::new(3, 0)));
        assert!(grid.cell(Position::new(5, 5)).is_none());
        assert!(!grid.can_enter(Position::new(0, -1)));
    }

    #[test]
    fn terrain_costs() {
        assert_eq!(TerrainKind::Open.move_cost(), Some(1));
        assert_eq!(TerrainKind::Road.move_cost(), Some(1));
        assert_eq!(TerrainKind::Rough.move_cost(), Some(2));
        assert_eq!(TerrainKind::Wall.move_cost(), None);
    }
}
