use serde::{Deserialize, Serialize};

pub mod cond;
pub mod level;

pub use cond::{Condition, ConditionRegistry, Lookup};
pub use level::{
    CustomGoal, Element, ElementKind, Goal, LevelConfig, LevelError, Pos, DEFAULT_ENERGY,
    DEFAULT_GRID_SIZE,
};

/// The way the robot is facing.
///
/// `y` grows to the south, so north is "up" on the rendered grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    #[default]
    East,
    South,
    West,
}

impl Direction {
    /// The heading after a quarter turn to the left.
    pub fn left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// The heading after a quarter turn to the right.
    pub fn right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// The change in `(x, y)` of a single step forward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    fn arrow(self) -> char {
        match self {
            Direction::North => '^',
            Direction::East => '>',
            Direction::South => 'v',
            Direction::West => '<',
        }
    }
}

/// A single grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub has_gem: bool,
    pub has_flag: bool,
    pub is_wall: bool,
    pub is_safe: bool,
    pub is_danger: bool,
}

impl Default for Tile {
    // Tiles that the level doesn't mark are safe.
    fn default() -> Tile {
        Tile {
            has_gem: false,
            has_flag: false,
            is_wall: false,
            is_safe: true,
            is_danger: false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variables {
    pub energy: i32,
    pub gems_collected: u32,
}

/// Why the robot refused to move. The world is unchanged whenever one of these is returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("No energy left!")]
    NoEnergy,
    #[error("Robot hit the edge of the grid!")]
    OutOfBounds,
    #[error("Robot hit a wall!")]
    Blocked,
}

/// A read-only copy of everything a renderer needs to draw the world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Indexed as `grid[y][x]`.
    pub grid: Vec<Vec<Tile>>,
    pub robot: Robot,
    pub variables: Variables,
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.grid.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                let ch = if self.robot.x == x as i32 && self.robot.y == y as i32 {
                    self.robot.direction.arrow()
                } else if tile.is_wall {
                    '#'
                } else if tile.has_gem {
                    '*'
                } else if tile.has_flag {
                    'F'
                } else if tile.is_danger {
                    '!'
                } else {
                    '.'
                };
                f.write_fmt(format_args!("{ch}"))?;
            }
            f.write_str("\n")?;
        }
        f.write_fmt(format_args!(
            "energy: {}  gems: {}",
            self.variables.energy, self.variables.gems_collected
        ))
    }
}

/// The simulated world: a square grid, one robot, and the level it was built from.
#[derive(Clone, Debug)]
pub struct GridWorld {
    // Invariant: `grid` is `config.size` rows of `config.size` tiles.
    grid: Vec<Vec<Tile>>,
    // Invariant: the robot is inside the grid. It never steps onto a wall, but a level
    // may not put it on one either (see `LevelConfig::validate`).
    robot: Robot,
    variables: Variables,
    config: LevelConfig,
}

impl GridWorld {
    pub fn new(config: LevelConfig) -> Result<GridWorld, LevelError> {
        config.validate()?;
        let mut world = GridWorld {
            grid: Vec::new(),
            robot: Robot {
                x: 0,
                y: 0,
                direction: Direction::default(),
            },
            variables: Variables::default(),
            config,
        };
        world.apply_config();
        Ok(world)
    }

    /// Throw away the current state and rebuild the world from `config`.
    ///
    /// If `config` is malformed, an error is returned and nothing changes.
    pub fn initialize(&mut self, config: LevelConfig) -> Result<(), LevelError> {
        config.validate()?;
        self.config = config;
        self.apply_config();
        Ok(())
    }

    /// Rebuild the world from the level it was last initialized with.
    pub fn reset(&mut self) {
        self.apply_config();
    }

    fn apply_config(&mut self) {
        let n = self.config.size;
        self.grid = vec![vec![Tile::default(); n]; n];
        for elem in &self.config.elements {
            let tile = &mut self.grid[elem.y as usize][elem.x as usize];
            match elem.kind {
                ElementKind::Gem => tile.has_gem = true,
                ElementKind::Flag => tile.has_flag = true,
                ElementKind::Wall => tile.is_wall = true,
                ElementKind::Safe => {
                    tile.is_safe = true;
                    tile.is_danger = false;
                }
                ElementKind::Danger => {
                    tile.is_danger = true;
                    tile.is_safe = false;
                }
            }
        }
        self.robot = Robot {
            x: self.config.start_pos.x,
            y: self.config.start_pos.y,
            direction: self.config.start_direction,
        };
        self.variables = Variables {
            energy: self.config.start_energy,
            gems_collected: 0,
        };
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn size(&self) -> usize {
        self.grid.len()
    }

    pub fn robot(&self) -> Robot {
        self.robot
    }

    pub fn variables(&self) -> Variables {
        self.variables
    }

    /// The tile at `(x, y)`, or `None` if that's off the grid.
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.cell(x, y).map(|(x, y)| &self.grid[y][x])
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            robot: self.robot,
            variables: self.variables,
        }
    }

    fn cell(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let n = self.size() as i32;
        if (0..n).contains(&x) && (0..n).contains(&y) {
            Some((x as usize, y as usize))
        } else {
            None
        }
    }

    fn ahead(&self) -> Option<(usize, usize)> {
        let (dx, dy) = self.robot.direction.delta();
        self.cell(self.robot.x + dx, self.robot.y + dy)
    }

    fn here(&self) -> &Tile {
        &self.grid[self.robot.y as usize][self.robot.x as usize]
    }

    /// Step one tile forward, spending one unit of energy.
    ///
    /// The checks happen in a fixed order: energy first, then the edge of the grid, then walls.
    /// So a robot with no energy reports [`MoveError::NoEnergy`] even if it is also facing the edge.
    /// A gem on the destination tile is picked up automatically.
    pub fn move_forward(&mut self) -> Result<(), MoveError> {
        if self.variables.energy <= 0 {
            return Err(MoveError::NoEnergy);
        }
        let (x, y) = self.ahead().ok_or(MoveError::OutOfBounds)?;
        if self.grid[y][x].is_wall {
            return Err(MoveError::Blocked);
        }

        self.robot.x = x as i32;
        self.robot.y = y as i32;
        self.variables.energy -= 1;
        if self.grid[y][x].has_gem {
            self.pick_up();
        }
        Ok(())
    }

    pub fn turn_left(&mut self) {
        self.robot.direction = self.robot.direction.left();
    }

    pub fn turn_right(&mut self) {
        self.robot.direction = self.robot.direction.right();
    }

    /// Point the robot in an absolute direction, without moving or spending energy.
    pub fn face(&mut self, direction: Direction) {
        self.robot.direction = direction;
    }

    /// Pick up the gem on the current tile. Returns `false` if there isn't one.
    pub fn pick_up(&mut self) -> bool {
        let (x, y) = (self.robot.x as usize, self.robot.y as usize);
        let tile = &mut self.grid[y][x];
        if tile.has_gem {
            tile.has_gem = false;
            self.variables.gems_collected += 1;
            true
        } else {
            false
        }
    }

    pub fn gem_ahead(&self) -> bool {
        self.ahead().map_or(false, |(x, y)| self.grid[y][x].has_gem)
    }

    /// Is the tile in front of the robot on the grid and not a wall?
    pub fn path_clear(&self) -> bool {
        self.ahead().map_or(false, |(x, y)| !self.grid[y][x].is_wall)
    }

    pub fn tile_is_safe(&self) -> bool {
        self.here().is_safe
    }

    /// Has the level's goal been met? A level without a goal is never finished.
    pub fn evaluate_goal(&self) -> bool {
        let Some(goal) = &self.config.goal else {
            return false;
        };
        let here = self.here();
        match goal {
            Goal::ReachFlag => here.has_flag,
            Goal::CollectGems { count } => self.variables.gems_collected >= *count,
            // Standing on a danger tile loses, even if the flag is there too.
            Goal::ReachFlagSafely => {
                !here.is_danger && here.has_flag && self.variables.energy > 0
            }
            Goal::Custom(check) => check.check(self),
        }
    }
}

impl std::fmt::Display for GridWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.snapshot().fmt(f)
    }
}
