use anyhow::{anyhow, bail, Context};
use botscript::{
    repeat_program, translate_arrows, Arrow, Delay, ExecConfig, Executor, Outcome, ParseMode,
};
use clap::{ArgGroup, Parser};
use gridbot::{GridWorld, LevelConfig, Snapshot};
use std::{path::PathBuf, process::exit};

#[derive(Parser)]
#[command(group(ArgGroup::new("program").required(true).args(["script", "arrows", "repeat"])))]
struct Args {
    /// The level to play, as JSON.
    level: PathBuf,

    /// A script file to run.
    script: Option<PathBuf>,

    /// Run a sequence of arrows instead of a script, like ">>v^<".
    #[arg(long)]
    arrows: Option<String>,

    /// Run the "pick up, then move" loop this many times instead of a script.
    #[arg(long)]
    repeat: Option<u32>,

    /// Read the script with the old forgiving reader.
    #[arg(long)]
    flat: bool,

    /// Milliseconds to pause after each action.
    #[arg(long, default_value_t = 0)]
    delay: u16,

    /// Draw the grid after every action.
    #[arg(long)]
    steps: bool,

    /// Print the final state as JSON.
    #[arg(long)]
    json: bool,
}

fn run(args: Args) -> anyhow::Result<Outcome> {
    let level = LevelConfig::load(&args.level)
        .with_context(|| format!("failed to load level {}", args.level.display()))?;
    let exec = Executor::with_config(
        GridWorld::new(level)?,
        ExecConfig {
            delay: Delay::from_millis(args.delay),
            ..ExecConfig::default()
        },
    );

    let steps = args.steps;
    let mut observer = |snapshot: &Snapshot| {
        if steps {
            println!("{snapshot}\n");
        }
    };

    let outcome = if let Some(path) = &args.script {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to open script {}", path.display()))?;
        let mode = if args.flat {
            ParseMode::Flat
        } else {
            ParseMode::Strict
        };
        exec.submit_text(&text, mode, &mut observer)?
    } else if let Some(arrows) = &args.arrows {
        let arrows = arrows
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| Arrow::try_from(c).map_err(|_| anyhow!("{c:?} isn't an arrow")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let heading = exec.world().robot().direction;
        exec.submit(&translate_arrows(heading, &arrows), &mut observer)?
    } else if let Some(count) = args.repeat {
        exec.submit(&repeat_program(count), &mut observer)?
    } else {
        bail!("nothing to run");
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&exec.snapshot())?);
    } else {
        println!("{}", exec.snapshot());
    }
    Ok(outcome)
}

pub fn main() {
    pretty_env_logger::init();

    match run(Args::parse()) {
        Ok(Outcome::Succeeded) => println!("Success! Goal achieved!"),
        Ok(Outcome::StillRunning) => println!("Not there yet."),
        Ok(Outcome::Failed(e)) => {
            println!("Error: {e}");
            exit(2);
        }
        Err(e) => {
            println!("{e:#}");
            exit(1);
        }
    }
}
