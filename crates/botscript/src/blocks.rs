//! Programs built by clicking rather than typing.

use gridbot::Direction;

use crate::{Action, Statement};

/// An arrow button in the sequence builder. Arrows are absolute: `Up` always means north.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

impl Arrow {
    pub fn heading(self) -> Direction {
        match self {
            Arrow::Up => Direction::North,
            Arrow::Down => Direction::South,
            Arrow::Left => Direction::West,
            Arrow::Right => Direction::East,
        }
    }
}

impl TryFrom<char> for Arrow {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Ok(match value {
            '^' | 'u' | 'U' => Arrow::Up,
            'v' | 'd' | 'D' => Arrow::Down,
            '<' | 'l' | 'L' => Arrow::Left,
            '>' | 'r' | 'R' => Arrow::Right,
            _ => Err(())?,
        })
    }
}

/// The fewest turns that take the robot from facing `from` to facing `to`.
pub fn turns_between(from: Direction, to: Direction) -> Vec<Action> {
    if from == to {
        vec![]
    } else if from.left() == to {
        vec![Action::TurnLeft]
    } else if from.right() == to {
        vec![Action::TurnRight]
    } else {
        vec![Action::TurnRight, Action::TurnRight]
    }
}

/// Turn a sequence of arrows into a script: for each arrow, face that way and take a step.
///
/// `start` is the way the robot is facing when the script begins.
pub fn translate_arrows(start: Direction, arrows: &[Arrow]) -> Vec<Statement> {
    let mut heading = start;
    let mut ret = Vec::new();
    for arrow in arrows {
        let target = arrow.heading();
        ret.extend(
            turns_between(heading, target)
                .into_iter()
                .map(Statement::Action),
        );
        ret.push(Statement::Action(Action::Move));
        heading = target;
    }
    ret
}

/// The "how many times?" loop puzzle: pick up whatever is here, then step forward.
pub fn repeat_program(count: u32) -> Vec<Statement> {
    vec![Statement::Repeat(
        count,
        vec![
            Statement::Action(Action::PickUp),
            Statement::Action(Action::Move),
        ],
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Delay, ExecConfig, Executor, Outcome, Quiet};
    use gridbot::{Element, ElementKind, Goal, GridWorld, LevelConfig, Pos};

    fn quick(config: LevelConfig) -> Executor {
        Executor::with_config(
            GridWorld::new(config).unwrap(),
            ExecConfig {
                delay: Delay::ZERO,
                ..ExecConfig::default()
            },
        )
    }

    #[test]
    fn turns() {
        use Direction::*;
        assert_eq!(turns_between(East, East), vec![]);
        assert_eq!(turns_between(East, North), vec![Action::TurnLeft]);
        assert_eq!(turns_between(East, South), vec![Action::TurnRight]);
        assert_eq!(
            turns_between(East, West),
            vec![Action::TurnRight, Action::TurnRight]
        );
        for from in [North, East, South, West] {
            for to in [North, East, South, West] {
                let mut dir = from;
                for turn in turns_between(from, to) {
                    dir = match turn {
                        Action::TurnLeft => dir.left(),
                        _ => dir.right(),
                    };
                }
                assert_eq!(dir, to);
            }
        }
    }

    #[test]
    fn arrows_match_setting_the_heading() {
        let arrows: Vec<Arrow> = ">>vv<^"
            .chars()
            .map(|c| Arrow::try_from(c).unwrap())
            .collect();
        let config = LevelConfig {
            start_pos: Pos { x: 1, y: 1 },
            ..LevelConfig::default()
        };

        let exec = quick(config.clone());
        let script = translate_arrows(Direction::East, &arrows);
        exec.submit(&script, &mut Quiet).unwrap();

        let mut direct = GridWorld::new(config).unwrap();
        for arrow in &arrows {
            direct.face(arrow.heading());
            direct.move_forward().unwrap();
        }
        assert_eq!(exec.snapshot(), direct.snapshot());
        assert_eq!(
            (direct.robot().x, direct.robot().y, direct.robot().direction),
            (2, 2, Direction::North)
        );
    }

    #[test]
    fn bad_arrow() {
        assert_eq!(Arrow::try_from('x'), Err(()));
    }

    #[test]
    fn collect_a_row() {
        let exec = quick(LevelConfig {
            start_pos: Pos { x: 0, y: 2 },
            start_energy: 20,
            elements: (0..5).map(|x| Element::new(ElementKind::Gem, x, 2)).collect(),
            goal: Some(Goal::CollectGems { count: 5 }),
            ..LevelConfig::default()
        });
        // The fifth step would walk off the grid, but by then every gem is collected.
        let outcome = exec.submit(&repeat_program(4), &mut Quiet).unwrap();
        assert_eq!(outcome, Outcome::Succeeded);
        assert_eq!(exec.world().variables().gems_collected, 5);

        exec.reset().unwrap();
        let outcome = exec.submit(&repeat_program(5), &mut Quiet).unwrap();
        assert!(matches!(outcome, Outcome::Failed(crate::Failure::OutOfBounds)));
    }
}
