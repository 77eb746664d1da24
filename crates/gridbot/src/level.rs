//! Level descriptions, as authored alongside the puzzles.
//!
//! The JSON format uses the same field names as the puzzle catalog, for example:
//!
//! ```json
//! {
//!   "startPos": { "x": 0, "y": 2 },
//!   "startDirection": "east",
//!   "startEnergy": 10,
//!   "elements": [{ "type": "flag", "x": 3, "y": 2 }],
//!   "goal": { "type": "reachFlag" }
//! }
//! ```

use std::{path::Path, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{Direction, GridWorld};

pub const DEFAULT_GRID_SIZE: usize = 5;
pub const DEFAULT_ENERGY: i32 = 10;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Gem,
    Flag,
    Wall,
    Safe,
    Danger,
}

/// Something placed on a tile by the level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x: i32,
    pub y: i32,
}

impl Element {
    pub fn new(kind: ElementKind, x: i32, y: i32) -> Element {
        Element { kind, x, y }
    }
}

/// A goal that is checked by arbitrary code. These can't be written in a level file.
#[derive(Clone)]
pub struct CustomGoal {
    inner: Rc<dyn Fn(&GridWorld) -> bool>,
}

impl CustomGoal {
    pub fn new(check: impl Fn(&GridWorld) -> bool + 'static) -> CustomGoal {
        CustomGoal {
            inner: Rc::new(check),
        }
    }

    pub fn check(&self, world: &GridWorld) -> bool {
        (self.inner)(world)
    }
}

impl std::fmt::Debug for CustomGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("custom goal")
    }
}

impl PartialEq for CustomGoal {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Goal {
    /// Finish on a flag.
    ReachFlag,
    /// Hold at least `count` gems.
    CollectGems { count: u32 },
    /// Finish on a flag that isn't a danger tile, with some energy to spare.
    ReachFlagSafely,
    #[serde(skip)]
    Custom(CustomGoal),
}

/// The immutable template that a [`GridWorld`] is built from, and rebuilt from on reset.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    /// The grid is `size` by `size` tiles.
    #[serde(default = "default_size")]
    pub size: usize,
    #[serde(default)]
    pub start_pos: Pos,
    #[serde(default)]
    pub start_direction: Direction,
    #[serde(default = "default_energy")]
    pub start_energy: i32,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub goal: Option<Goal>,
}

fn default_size() -> usize {
    DEFAULT_GRID_SIZE
}

fn default_energy() -> i32 {
    DEFAULT_ENERGY
}

impl Default for LevelConfig {
    fn default() -> LevelConfig {
        LevelConfig {
            size: DEFAULT_GRID_SIZE,
            start_pos: Pos::default(),
            start_direction: Direction::default(),
            start_energy: DEFAULT_ENERGY,
            elements: Vec::new(),
            goal: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("the grid must be at least one tile wide")]
    EmptyGrid,
    #[error("the robot starts at ({x}, {y}), which is off the grid")]
    StartOutOfBounds { x: i32, y: i32 },
    #[error("the robot starts at ({x}, {y}), which is a wall")]
    StartOnWall { x: i32, y: i32 },
    #[error("{kind:?} at ({x}, {y}) is off the grid")]
    ElementOutOfBounds { kind: ElementKind, x: i32, y: i32 },
    #[error("invalid level: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read level: {0}")]
    Io(#[from] std::io::Error),
}

impl LevelConfig {
    pub fn from_json(s: &str) -> Result<LevelConfig, LevelError> {
        let config: LevelConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<LevelConfig, LevelError> {
        let text = std::fs::read_to_string(path)?;
        LevelConfig::from_json(&text)
    }

    /// Check that a world can be built from this level.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.size == 0 {
            return Err(LevelError::EmptyGrid);
        }
        let n = self.size as i32;
        let on_grid = |x: i32, y: i32| (0..n).contains(&x) && (0..n).contains(&y);

        if let Some(elem) = self.elements.iter().find(|e| !on_grid(e.x, e.y)) {
            return Err(LevelError::ElementOutOfBounds {
                kind: elem.kind,
                x: elem.x,
                y: elem.y,
            });
        }

        let Pos { x, y } = self.start_pos;
        if !on_grid(x, y) {
            return Err(LevelError::StartOutOfBounds { x, y });
        }
        if self
            .elements
            .iter()
            .any(|e| e.kind == ElementKind::Wall && e.x == x && e.y == y)
        {
            return Err(LevelError::StartOnWall { x, y });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level() {
        let config = LevelConfig::from_json(
            r#"{
                "startPos": { "x": 0, "y": 2 },
                "startDirection": "east",
                "startEnergy": 10,
                "elements": [{ "type": "flag", "x": 3, "y": 2 }],
                "goal": { "type": "reachFlag" }
            }"#,
        )
        .unwrap();
        assert_eq!(
            config,
            LevelConfig {
                start_pos: Pos { x: 0, y: 2 },
                elements: vec![Element::new(ElementKind::Flag, 3, 2)],
                goal: Some(Goal::ReachFlag),
                ..LevelConfig::default()
            }
        );
    }

    #[test]
    fn defaults() {
        let config = LevelConfig::from_json(r#"{ "startPos": { "x": 1, "y": 1 } }"#).unwrap();
        assert_eq!(config.size, DEFAULT_GRID_SIZE);
        assert_eq!(config.start_direction, Direction::East);
        assert_eq!(config.start_energy, DEFAULT_ENERGY);
        assert_eq!(config.goal, None);

        // An explicit zero is kept.
        let config = LevelConfig::from_json(r#"{ "startEnergy": 0 }"#).unwrap();
        assert_eq!(config.start_energy, 0);
    }

    #[test]
    fn goals() {
        let goal: Goal = serde_json::from_str(r#"{ "type": "collectGems", "count": 5 }"#).unwrap();
        assert_eq!(goal, Goal::CollectGems { count: 5 });
        let goal: Goal = serde_json::from_str(r#"{ "type": "reachFlagSafely" }"#).unwrap();
        assert_eq!(goal, Goal::ReachFlagSafely);
        assert!(serde_json::from_str::<Goal>(r#"{ "type": "custom" }"#).is_err());
    }

    #[test]
    fn invalid_levels() {
        let err = LevelConfig::from_json(r#"{ "elements": [{ "type": "gem", "x": 5, "y": 0 }] }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            LevelError::ElementOutOfBounds {
                kind: ElementKind::Gem,
                x: 5,
                y: 0
            }
        ));

        let err = LevelConfig::from_json(r#"{ "elements": [{ "type": "wall", "x": 0, "y": 0 }] }"#)
            .unwrap_err();
        assert!(matches!(err, LevelError::StartOnWall { x: 0, y: 0 }));

        let err = LevelConfig::from_json(r#"{ "size": 0 }"#).unwrap_err();
        assert!(matches!(err, LevelError::EmptyGrid));

        let err = LevelConfig::from_json(r#"{ "startDirection": "up" }"#).unwrap_err();
        assert!(matches!(err, LevelError::Json(_)));
    }

    #[test]
    fn custom_goals_compare_by_identity() {
        let a = CustomGoal::new(|_: &GridWorld| true);
        let b = CustomGoal::new(|_: &GridWorld| true);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
