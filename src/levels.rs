//! Levels shipped with the robot lessons.

use crate::geometry::{Direction, GridSize, Level, Position, RobotState, Wall};

/// A 3x3 level with no walls: bottom-left to top-right.
pub fn level1() -> Level {
    Level::new(
        GridSize::new(3, 3),
        RobotState::new(Position::new(0, 2), Direction::North),
        Position::new(2, 0),
        [],
    )
}

/// A 4x4 level with a barrier across row 2 and a wall guarding the goal.
pub fn level2() -> Level {
    Level::new(
        GridSize::new(4, 4),
        RobotState::new(Position::new(0, 3), Direction::East),
        Position::new(3, 0),
        walls([
            (Position::new(1, 2), Direction::North),
            (Position::new(2, 2), Direction::North),
            (Position::new(2, 0), Direction::East),
        ]),
    )
}

/// A 5x5 maze.
pub fn level3() -> Level {
    Level::new(
        GridSize::new(5, 5),
        RobotState::new(Position::new(0, 4), Direction::North),
        Position::new(4, 0),
        walls([
            (Position::new(1, 3), Direction::North),
            (Position::new(2, 3), Direction::North),
            (Position::new(2, 1), Direction::North),
            (Position::new(3, 2), Direction::North),
            (Position::new(3, 4), Direction::East),
        ]),
    )
}

// Walls given as (cell, side) pairs.
fn walls<const N: usize>(sides: [(Position, Direction); N]) -> impl Iterator<Item = Wall> {
    sides
        .into_iter()
        .filter_map(|(cell, direction)| Wall::beside(cell, direction))
}

/// All built-in levels in lesson order.
pub fn all() -> Vec<Level> {
    vec![level1(), level2(), level3()]
}
