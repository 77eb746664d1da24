use std::collections::HashMap;

use crate::GridWorld;

/// The questions a script can ask about the world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    GemAhead,
    PathClear,
    TileIsSafe,
    EnergyPositive,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::GemAhead,
        Condition::PathClear,
        Condition::TileIsSafe,
        Condition::EnergyPositive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Condition::GemAhead => "gemAhead",
            Condition::PathClear => "pathClear",
            Condition::TileIsSafe => "tileIsSafe",
            Condition::EnergyPositive => "energy>0",
        }
    }

    pub fn eval(&self, world: &GridWorld) -> bool {
        match self {
            Condition::GemAhead => world.gem_ahead(),
            Condition::PathClear => world.path_clear(),
            Condition::TileIsSafe => world.tile_is_safe(),
            Condition::EnergyPositive => world.variables().energy > 0,
        }
    }
}

/// The result of looking up a condition by name.
///
/// Scripts are allowed to mention conditions that don't exist; those are a [`Lookup::Miss`], and
/// they are always false.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    Known(Condition),
    Miss(String),
}

impl Lookup {
    pub fn eval(&self, world: &GridWorld) -> bool {
        match self {
            Lookup::Known(cond) => cond.eval(world),
            Lookup::Miss(name) => {
                log::debug!("unknown condition {name:?} is false");
                false
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct ConditionRegistry {
    table: HashMap<&'static str, Condition>,
}

impl Default for ConditionRegistry {
    fn default() -> ConditionRegistry {
        ConditionRegistry {
            table: Condition::ALL.iter().map(|c| (c.name(), *c)).collect(),
        }
    }
}

impl ConditionRegistry {
    /// Find a condition by name. Whitespace is ignored, so `energy > 0` finds `energy>0`.
    pub fn lookup(&self, name: &str) -> Lookup {
        let key: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        match self.table.get(key.as_str()) {
            Some(cond) => Lookup::Known(*cond),
            None => Lookup::Miss(name.to_owned()),
        }
    }

    pub fn evaluate(&self, world: &GridWorld, name: &str) -> bool {
        self.lookup(name).eval(world)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Element, ElementKind, LevelConfig, Pos};

    #[test]
    fn lookups() {
        let reg = ConditionRegistry::default();
        for cond in Condition::ALL {
            assert_eq!(reg.lookup(cond.name()), Lookup::Known(cond));
        }
        assert_eq!(
            reg.lookup(" energy >  0"),
            Lookup::Known(Condition::EnergyPositive)
        );
        assert_eq!(
            reg.lookup("wallAhead"),
            Lookup::Miss("wallAhead".to_owned())
        );
        assert_eq!(reg.names().count(), 4);
    }

    #[test]
    fn evaluate() {
        let world = GridWorld::new(LevelConfig {
            start_pos: Pos { x: 0, y: 2 },
            start_energy: 1,
            elements: vec![
                Element::new(ElementKind::Gem, 1, 2),
                Element::new(ElementKind::Danger, 0, 2),
            ],
            ..LevelConfig::default()
        })
        .unwrap();
        let reg = ConditionRegistry::default();
        assert!(reg.evaluate(&world, "gemAhead"));
        assert!(reg.evaluate(&world, "pathClear"));
        assert!(!reg.evaluate(&world, "tileIsSafe"));
        assert!(reg.evaluate(&world, "energy>0"));
        assert!(!reg.evaluate(&world, "gemahead"));
        assert!(!reg.evaluate(&world, ""));
    }
}
