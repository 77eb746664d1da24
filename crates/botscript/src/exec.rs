use std::{
    cell::{Cell, Ref, RefCell},
    time::Duration,
};

use gridbot::{ConditionRegistry, GridWorld, MoveError, Snapshot};

use crate::{blocks::translate_arrows, Action, ParseMode, Session, Statement};

/// The most times a single `while` loop will run its body.
pub const WHILE_CAP: u32 = 20;

/// Where the executor is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Done,
}

/// Why a run stopped early.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    #[error("No energy left!")]
    NoEnergy,
    #[error("Robot hit the edge of the grid!")]
    OutOfBounds,
    #[error("Robot hit a wall!")]
    Blocked,
    #[error("{0}")]
    ScriptError(String),
}

impl From<MoveError> for Failure {
    fn from(e: MoveError) -> Self {
        match e {
            MoveError::NoEnergy => Failure::NoEnergy,
            MoveError::OutOfBounds => Failure::OutOfBounds,
            MoveError::Blocked => Failure::Blocked,
        }
    }
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The script finished and the level's goal is met.
    Succeeded,
    /// An action failed (or the script couldn't be read), so the rest of the script was skipped.
    Failed(Failure),
    /// The script finished, but the goal isn't met yet.
    StillRunning,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    #[error("a script is already running")]
    Busy,
    #[error("no function called {0:?} has been saved")]
    UnknownFunction(String),
}

/// How long to pause after each action, in milliseconds between 0 and 1000.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Delay(u16);

impl Delay {
    pub const ZERO: Delay = Delay(0);

    pub fn from_millis(ms: u16) -> Delay {
        Delay(ms.clamp(0, 1000))
    }

    pub fn to_millis(&self) -> u16 {
        self.0
    }

    fn pause(&self) {
        if self.0 > 0 {
            std::thread::sleep(Duration::from_millis(self.0.into()));
        }
    }
}

impl Default for Delay {
    fn default() -> Self {
        Delay(300)
    }
}

impl From<Duration> for Delay {
    fn from(dur: Duration) -> Self {
        Delay(dur.as_millis().clamp(0, 1000) as u16)
    }
}

#[derive(Clone, Debug)]
pub struct ExecConfig {
    pub delay: Delay,
    pub while_cap: u32,
}

impl Default for ExecConfig {
    fn default() -> Self {
        ExecConfig {
            delay: Delay::default(),
            while_cap: WHILE_CAP,
        }
    }
}

/// Gets told about every action that completes, so that it can redraw.
pub trait Observer {
    fn step(&mut self, snapshot: &Snapshot);
}

impl<F: FnMut(&Snapshot)> Observer for F {
    fn step(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// An observer that ignores everything.
pub struct Quiet;

impl Observer for Quiet {
    fn step(&mut self, _snapshot: &Snapshot) {}
}

/// Runs scripts against a world, one at a time.
pub struct Executor {
    world: RefCell<GridWorld>,
    state: Cell<RunState>,
    registry: ConditionRegistry,
    config: ExecConfig,
}

impl Executor {
    pub fn new(world: GridWorld) -> Executor {
        Executor::with_config(world, ExecConfig::default())
    }

    pub fn with_config(world: GridWorld, config: ExecConfig) -> Executor {
        Executor {
            world: RefCell::new(world),
            state: Cell::new(RunState::Idle),
            registry: ConditionRegistry::default(),
            config,
        }
    }

    pub fn state(&self) -> RunState {
        self.state.get()
    }

    pub fn world(&self) -> Ref<'_, GridWorld> {
        self.world.borrow()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.world.borrow().snapshot()
    }

    pub fn into_world(self) -> GridWorld {
        self.world.into_inner()
    }

    /// Put the world back the way the level started it.
    pub fn reset(&self) -> Result<(), ExecError> {
        if self.state.get() == RunState::Running {
            return Err(ExecError::Busy);
        }
        self.world.borrow_mut().reset();
        self.state.set(RunState::Idle);
        Ok(())
    }

    /// Run a script to completion.
    ///
    /// Only one script can run at a time: if this is called while another script is running
    /// (for example, from an observer), it returns [`ExecError::Busy`] and does nothing.
    pub fn submit(
        &self,
        script: &[Statement],
        observer: &mut dyn Observer,
    ) -> Result<Outcome, ExecError> {
        if self.state.get() == RunState::Running {
            return Err(ExecError::Busy);
        }
        self.state.set(RunState::Running);

        let outcome = match self.exec_block(script, observer) {
            Ok(()) => {
                if self.world.borrow().evaluate_goal() {
                    Outcome::Succeeded
                } else {
                    Outcome::StillRunning
                }
            }
            Err(failure) => Outcome::Failed(failure),
        };
        log::info!("run finished: {outcome:?}");
        self.state.set(RunState::Done);
        Ok(outcome)
    }

    /// Read a script from text, then run it.
    ///
    /// A script that can't be read counts as a failed run, and doesn't touch the world.
    pub fn submit_text(
        &self,
        text: &str,
        mode: ParseMode,
        observer: &mut dyn Observer,
    ) -> Result<Outcome, ExecError> {
        if self.state.get() == RunState::Running {
            return Err(ExecError::Busy);
        }
        match mode.parse(text) {
            Ok(script) => self.submit(&script, observer),
            Err(e) => {
                log::debug!("script error: {e}");
                self.state.set(RunState::Done);
                Ok(Outcome::Failed(Failure::ScriptError(e.to_string())))
            }
        }
    }

    /// Reset the world and run one of the session's saved arrow sequences.
    pub fn run_function(
        &self,
        session: &Session,
        name: &str,
        observer: &mut dyn Observer,
    ) -> Result<Outcome, ExecError> {
        let arrows = session
            .function(name)
            .ok_or_else(|| ExecError::UnknownFunction(name.to_owned()))?;
        self.reset()?;
        let heading = self.world.borrow().robot().direction;
        self.submit(&translate_arrows(heading, arrows), observer)
    }

    fn check(&self, cond: &str) -> bool {
        self.registry.evaluate(&self.world.borrow(), cond)
    }

    fn exec_block(&self, block: &[Statement], observer: &mut dyn Observer) -> Result<(), Failure> {
        for statement in block {
            match statement {
                Statement::Action(action) => self.exec_action(*action, observer)?,
                Statement::If(cond, body) => {
                    if self.check(cond) {
                        self.exec_block(body, observer)?;
                    }
                }
                Statement::Repeat(count, body) => {
                    for _ in 0..*count {
                        self.exec_block(body, observer)?;
                    }
                }
                Statement::While(cond, body) => {
                    let mut iterations = 0;
                    while self.check(cond) {
                        if iterations == self.config.while_cap {
                            log::warn!(
                                "while({cond}) is still true after {iterations} times round; stopping it"
                            );
                            break;
                        }
                        self.exec_block(body, observer)?;
                        iterations += 1;
                    }
                }
            }
        }
        Ok(())
    }

    fn exec_action(&self, action: Action, observer: &mut dyn Observer) -> Result<(), Failure> {
        log::debug!("{}", action.name());
        {
            let mut world = self.world.borrow_mut();
            match action {
                Action::Move => world.move_forward().map_err(|e| {
                    log::debug!("move failed: {e}");
                    Failure::from(e)
                })?,
                Action::PickUp => {
                    world.pick_up();
                }
                Action::TurnLeft => world.turn_left(),
                Action::TurnRight => world.turn_right(),
            }
        }
        observer.step(&self.snapshot());
        self.config.delay.pause();
        Ok(())
    }
}
