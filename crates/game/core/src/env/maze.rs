use crate::state::Position;

use super::OracleError;

/// Read-only maze geometry queried by enemy movement, projectiles and sight
/// checks.
pub trait MazeOracle: Send + Sync {
    fn dimensions(&self) -> MazeDimensions;

    /// Whether an actor may stand on `position`. Out-of-bounds cells are not.
    fn is_passable(&self, position: Position) -> bool;

    /// Whether `position` stops sight lines and projectiles.
    fn blocks_sight(&self, position: Position) -> bool {
        !self.is_passable(position)
    }

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MazeDimensions {
    pub width: u32,
    pub height: u32,
}

impl MazeDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Whether `from` sees `to` through `maze`.
///
/// Sight runs only along a shared row or column; every cell strictly between
/// the two ends must be see-through. Without a maze, aligned cells always see
/// each other.
pub fn line_of_sight(maze: Option<&dyn MazeOracle>, from: Position, to: Position) -> bool {
    if from.x != to.x && from.y != to.y {
        return false;
    }
    let Some(maze) = maze else {
        return true;
    };

    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();
    let mut cursor = from.offset(dx, dy);
    while cursor != to {
        if maze.blocks_sight(cursor) {
            return false;
        }
        cursor = cursor.offset(dx, dy);
    }
    true
}

/// Wall/floor grid built from text rows.
///
/// `#` is a wall and `.` is floor. Row `y` of the layout is tile row `y`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMaze {
    dimensions: MazeDimensions,
    walls: Vec<bool>,
}

impl GridMaze {
    pub const WALL: char = '#';
    pub const FLOOR: char = '.';

    /// Open floor with no walls.
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            dimensions: MazeDimensions::new(width, height),
            walls: vec![false; (width * height) as usize],
        }
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, OracleError> {
        let first = rows.first().ok_or(OracleError::EmptyLayout)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(OracleError::EmptyLayout);
        }

        let mut walls = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(OracleError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                match glyph {
                    Self::WALL => walls.push(true),
                    Self::FLOOR => walls.push(false),
                    _ => return Err(OracleError::UnknownCell { glyph, x, y }),
                }
            }
        }

        Ok(Self {
            dimensions: MazeDimensions::new(width as u32, rows.len() as u32),
            walls,
        })
    }

    pub fn set_wall(&mut self, position: Position, wall: bool) {
        if let Some(index) = self.index(position) {
            self.walls[index] = wall;
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions
            .contains(position)
            .then(|| position.y as usize * self.dimensions.width as usize + position.x as usize)
    }
}

impl MazeOracle for GridMaze {
    fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    fn is_passable(&self, position: Position) -> bool {
        self.index(position).is_some_and(|index| !self.walls[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maze() -> GridMaze {
        GridMaze::from_rows(&["#####", "#...#", "#.#.#", "#...#", "#####"]).unwrap()
    }

    #[test]
    fn parses_walls_and_bounds() {
        let maze = maze();
        assert_eq!(maze.dimensions(), MazeDimensions::new(5, 5));
        assert!(maze.is_passable(Position::new(1, 1)));
        assert!(!maze.is_passable(Position::new(2, 2)));
        assert!(!maze.is_passable(Position::new(-1, 1)));
        assert!(!maze.is_passable(Position::new(5, 1)));
    }

    #[test]
    fn rejects_ragged_and_unknown_rows() {
        assert_eq!(
            GridMaze::from_rows(&["###", "##"]),
            Err(OracleError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert!(matches!(
            GridMaze::from_rows(&["#x#"]),
            Err(OracleError::UnknownCell { glyph: 'x', x: 1, y: 0 })
        ));
        assert_eq!(
            GridMaze::from_rows::<&str>(&[]),
            Err(OracleError::EmptyLayout)
        );
    }

    #[test]
    fn sight_needs_a_shared_axis_and_clear_cells() {
        let maze = maze();
        let oracle: &dyn MazeOracle = &maze;
        assert!(line_of_sight(Some(oracle), Position::new(1, 1), Position::new(3, 1)));
        assert!(!line_of_sight(Some(oracle), Position::new(2, 1), Position::new(2, 3)));
        assert!(!line_of_sight(Some(oracle), Position::new(1, 1), Position::new(3, 3)));
        assert!(line_of_sight(None, Position::new(0, 0), Position::new(0, 9)));
        assert!(line_of_sight(Some(oracle), Position::new(1, 1), Position::new(1, 1)));
    }
}
