//! Immutable grid types for the robot game: cells, headings, walls and levels.

use crate::wire::{Value, WireMessage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Dimensions of a level grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub columns: i64,
    pub rows: i64,
}

impl GridSize {
    pub const fn new(columns: i64, rows: i64) -> Self {
        Self { columns, rows }
    }
}

/// A cell on the grid. Row 0 is the top row; rows grow southwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub column: i64,
    pub row: i64,
}

impl Position {
    pub const fn new(column: i64, row: i64) -> Self {
        Self { column, row }
    }

    /// The neighbouring cell one step in `direction`, or `None` past the
    /// edge of the `i64` coordinate space.
    pub fn moved(self, direction: Direction) -> Option<Position> {
        let Position { column, row } = self;
        match direction {
            Direction::North => Some(Position::new(column, row.checked_sub(1)?)),
            Direction::East => Some(Position::new(column.checked_add(1)?, row)),
            Direction::South => Some(Position::new(column, row.checked_add(1)?)),
            Direction::West => Some(Position::new(column.checked_sub(1)?, row)),
        }
    }

    /// True if the two cells share an edge.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.column
            .abs_diff(other.column)
            .checked_add(self.row.abs_diff(other.row))
            == Some(1)
    }

    // Ordering used to canonicalize walls: row first, then column.
    fn wall_key(self) -> (i64, i64) {
        (self.row, self.column)
    }
}

/// Compass heading of the robot, encoded on the wire as degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Clockwise angle from north: 0, 90, 180 or 270.
    pub fn degrees(self) -> i64 {
        match self {
            Direction::North => 0,
            Direction::East => 90,
            Direction::South => 180,
            Direction::West => 270,
        }
    }

    /// Inverse of [`degrees`](Self::degrees). Any other value is rejected.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        match degrees {
            0 => Some(Direction::North),
            90 => Some(Direction::East),
            180 => Some(Direction::South),
            270 => Some(Direction::West),
            _ => None,
        }
    }

    /// Quarter turn clockwise: `(v + 90) mod 360`.
    pub fn turned_right(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Quarter turn counter-clockwise: `(v + 270) mod 360`.
    pub fn turned_left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }
}

/// An impassable edge between two adjacent cells.
///
/// Endpoints are stored in canonical order, so `Wall::new(a, b) == Wall::new(b, a)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Wall {
    from: Position,
    to: Position,
}

// Positions order row-major, which fixes the canonical endpoint order of walls.
impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.wall_key().cmp(&other.wall_key())
    }
}

impl Wall {
    /// Creates a wall between two cells, or `None` if they are not adjacent.
    pub fn new(a: Position, b: Position) -> Option<Self> {
        if !a.is_adjacent(b) {
            return None;
        }
        Some(Self::canonical(a, b))
    }

    /// The wall on the `direction` side of `cell`.
    ///
    /// `None` only when `cell` has no neighbour that way, at the extremes of
    /// the coordinate space.
    pub fn beside(cell: Position, direction: Direction) -> Option<Self> {
        Some(Self::canonical(cell, cell.moved(direction)?))
    }

    fn canonical(a: Position, b: Position) -> Self {
        if a <= b {
            Self { from: a, to: b }
        } else {
            Self { from: b, to: a }
        }
    }

    /// The endpoint that sorts first (smaller row, then smaller column).
    pub fn from(&self) -> Position {
        self.from
    }

    /// The endpoint that sorts last.
    pub fn to(&self) -> Position {
        self.to
    }

    /// True if this wall blocks a step from `position` towards `direction`.
    pub fn blocks(&self, position: Position, direction: Direction) -> bool {
        Wall::beside(position, direction) == Some(*self)
    }
}

/// Pose of the robot: the cell it stands on and the way it faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RobotState {
    pub position: Position,
    pub direction: Direction,
}

impl RobotState {
    pub const fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }
}

/// A playable grid: size, start pose, goal cell and walls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub grid_size: GridSize,
    pub start: RobotState,
    pub goal: Position,
    pub walls: BTreeSet<Wall>,
}

impl Level {
    pub fn new(
        grid_size: GridSize,
        start: RobotState,
        goal: Position,
        walls: impl IntoIterator<Item = Wall>,
    ) -> Self {
        Self {
            grid_size,
            start,
            goal,
            walls: walls.into_iter().collect(),
        }
    }

    /// True if `position` lies inside `[0, columns) x [0, rows)`.
    pub fn contains(&self, position: Position) -> bool {
        (0..self.grid_size.columns).contains(&position.column)
            && (0..self.grid_size.rows).contains(&position.row)
    }

    /// True if a wall sits on the `direction` side of `position`.
    pub fn is_blocked(&self, position: Position, direction: Direction) -> bool {
        Wall::beside(position, direction).is_some_and(|wall| self.walls.contains(&wall))
    }
}

/// Progress of the current game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    Won,
    Lost(LossReason),
}

impl GameState {
    /// `Won` and `Lost` only leave through a level (re)load.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameState::Playing)
    }
}

/// Why a forward step ended the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossReason {
    HitWall,
    OutOfBounds,
}

impl LossReason {
    pub fn as_str(self) -> &'static str {
        match self {
            LossReason::HitWall => "Hit a wall",
            LossReason::OutOfBounds => "Went out of bounds",
        }
    }
}

// --- Wire encoding ---

impl WireMessage for GridSize {
    fn to_value(&self) -> Value {
        Value::dictionary([
            ("columns", Value::Integer(self.columns)),
            ("rows", Value::Integer(self.rows)),
        ])
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            columns: value.get("columns")?.as_integer()?,
            rows: value.get("rows")?.as_integer()?,
        })
    }
}

impl WireMessage for Position {
    fn to_value(&self) -> Value {
        Value::dictionary([
            ("column", Value::Integer(self.column)),
            ("row", Value::Integer(self.row)),
        ])
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            column: value.get("column")?.as_integer()?,
            row: value.get("row")?.as_integer()?,
        })
    }
}

impl WireMessage for Direction {
    fn to_value(&self) -> Value {
        Value::Integer(self.degrees())
    }

    fn from_value(value: &Value) -> Option<Self> {
        Direction::from_degrees(value.as_integer()?)
    }
}

impl WireMessage for Wall {
    fn to_value(&self) -> Value {
        Value::dictionary([("from", self.from.to_value()), ("to", self.to.to_value())])
    }

    fn from_value(value: &Value) -> Option<Self> {
        let from = Position::from_value(value.get("from")?)?;
        let to = Position::from_value(value.get("to")?)?;
        Wall::new(from, to)
    }
}

impl WireMessage for Level {
    fn to_value(&self) -> Value {
        Value::dictionary([
            ("gridSize", self.grid_size.to_value()),
            ("robotStart", self.start.position.to_value()),
            ("robotDirection", self.start.direction.to_value()),
            ("goalPosition", self.goal.to_value()),
            (
                "walls",
                Value::Array(self.walls.iter().map(WireMessage::to_value).collect()),
            ),
        ])
    }

    /// Undecodable walls are skipped; everything else must be present.
    fn from_value(value: &Value) -> Option<Self> {
        let grid_size = GridSize::from_value(value.get("gridSize")?)?;
        let position = Position::from_value(value.get("robotStart")?)?;
        let direction = Direction::from_value(value.get("robotDirection")?)?;
        let goal = Position::from_value(value.get("goalPosition")?)?;
        let walls = value
            .get("walls")?
            .as_array()?
            .iter()
            .filter_map(Wall::from_value);
        Some(Level::new(
            grid_size,
            RobotState::new(position, direction),
            goal,
            walls,
        ))
    }
}

impl WireMessage for LossReason {
    fn to_value(&self) -> Value {
        Value::string(self.as_str())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "Hit a wall" => Some(LossReason::HitWall),
            "Went out of bounds" => Some(LossReason::OutOfBounds),
            _ => None,
        }
    }
}
