use std::path::Path;

use botscript::{
    parse::parse_script, reader::read_flat, Delay, ExecConfig, Executor, Failure, Outcome,
    ParseMode, Quiet, ScriptError,
};
use gridbot::{Direction, GridWorld, LevelConfig};

#[derive(Default, Clone)]
pub struct TestCase {
    input: String,
    expected: String,
}

fn outcome_name(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Succeeded => "succeeded",
        Outcome::StillRunning => "still running",
        Outcome::Failed(Failure::NoEnergy) => "no energy",
        Outcome::Failed(Failure::OutOfBounds) => "out of bounds",
        Outcome::Failed(Failure::Blocked) => "blocked",
        Outcome::Failed(Failure::ScriptError(_)) => "script error",
    }
}

fn direction(s: &str) -> Direction {
    serde_json::from_value(serde_json::Value::String(s.to_owned())).unwrap()
}

impl TestCase {
    fn expectations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.expected
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let (key, value) = line.split_once(':').unwrap();
                (key.trim(), value.trim())
            })
    }

    fn run(&self) {
        let mut level = None;
        let mut mode = ParseMode::Strict;
        for (key, value) in self.expectations() {
            match key {
                "level" => level = Some(Path::new("tests/levels").join(value)),
                "mode" if value == "flat" => mode = ParseMode::Flat,
                _ => {}
            }
        }
        let config = LevelConfig::load(level.unwrap()).unwrap();
        let exec = Executor::with_config(
            GridWorld::new(config).unwrap(),
            ExecConfig {
                delay: Delay::ZERO,
                ..ExecConfig::default()
            },
        );
        let outcome = exec
            .submit_text(dbg!(&self.input), mode, &mut Quiet)
            .unwrap();
        let world = exec.world();

        for (key, value) in self.expectations() {
            match key {
                "at" => {
                    let mut split = value.split_whitespace();
                    let x: i32 = split.next().unwrap().parse().unwrap();
                    let y: i32 = split.next().unwrap().parse().unwrap();
                    let dir = direction(split.next().unwrap());
                    let robot = world.robot();
                    assert_eq!((robot.x, robot.y, robot.direction), (x, y, dir));
                }
                "energy" => assert_eq!(world.variables().energy, value.parse::<i32>().unwrap()),
                "gems" => assert_eq!(
                    world.variables().gems_collected,
                    value.parse::<u32>().unwrap()
                ),
                "outcome" => assert_eq!(outcome_name(&outcome), value),
                "level" | "mode" => {}
                _ => panic!("unknown expectation {key:?}"),
            }
        }
    }

    fn read_flat(&self) {
        let a = read_flat(dbg!(&self.input)).unwrap();
        let b = parse_script(&self.expected).unwrap();
        assert_eq!(a, b);
    }

    fn parse_failure(&self) {
        let mut split = self.expected.trim().splitn(3, ' ');
        let line: u32 = split.next().unwrap().parse().unwrap();
        let column: usize = split.next().unwrap().parse().unwrap();
        let near = split.next().unwrap_or("").to_owned();
        assert_eq!(
            parse_script(dbg!(&self.input)).unwrap_err(),
            ScriptError::Syntax { line, column, near }
        );
    }
}

pub fn read_tests(path: impl AsRef<Path>) -> Vec<TestCase> {
    let text = std::fs::read_to_string(path).unwrap();
    let mut ret = Vec::new();
    let mut in_input = true;
    let mut cur = TestCase::default();

    fn separator_line(line: &str, ch: u8) -> bool {
        line.trim().len() >= 2 && line.trim().bytes().all(|c| c == ch)
    }

    for line in text.split_inclusive('\n') {
        if in_input {
            if separator_line(line, b'-') {
                in_input = false;
            } else {
                cur.input += line;
            }
        } else if separator_line(line, b'=') {
            in_input = true;
            ret.push(std::mem::take(&mut cur));
        } else {
            cur.expected += line;
        }
    }
    ret
}

#[test]
fn scripts() {
    let tests = read_tests("tests/scripts.txt");
    assert!(!tests.is_empty());
    for test in tests {
        test.run();
    }
}

#[test]
fn flat_reader() {
    for test in read_tests("tests/flat.txt") {
        test.read_flat();
    }
}

#[test]
fn parse_failures() {
    for test in read_tests("tests/parse-failures.txt") {
        test.parse_failure();
    }
}
