use botscript::{Delay, ExecConfig, Executor, ParseMode};
use gridbot::{GridWorld, LevelConfig, Snapshot};

fn main() {
    let level = LevelConfig::from_json(
        r#"{
            "startPos": { "x": 0, "y": 2 },
            "elements": [
                { "type": "gem", "x": 2, "y": 2 },
                { "type": "flag", "x": 4, "y": 2 }
            ],
            "goal": { "type": "reachFlag" }
        }"#,
    )
    .unwrap();
    let exec = Executor::with_config(
        GridWorld::new(level).unwrap(),
        ExecConfig {
            delay: Delay::from_millis(100),
            ..ExecConfig::default()
        },
    );
    let outcome = exec
        .submit_text(
            "while(pathClear()) { if(gemAhead()) { move() pickUp() } move() }",
            ParseMode::Strict,
            &mut |s: &Snapshot| println!("{s}\n"),
        )
        .unwrap();
    dbg!(outcome);
}
