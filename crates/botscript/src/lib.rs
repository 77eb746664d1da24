//! Scripts for the grid robot.
//!
//! A script is a list of [`Statement`]s. There are two ways to get one from text: the strict
//! parser in [`parse`], which understands nested blocks and reports errors with a position, and
//! the flat reader in [`reader`], which reads the puzzles' scripts the forgiving way they have
//! always been read. Either way, an [`Executor`] runs the result against a [`gridbot::GridWorld`].

pub mod ast;
pub mod blocks;
pub mod exec;
pub mod parse;
pub mod reader;
pub mod session;

pub use ast::{Action, Statement};
pub use blocks::{repeat_program, translate_arrows, Arrow};
pub use exec::{
    Delay, ExecConfig, ExecError, Executor, Failure, Observer, Outcome, Quiet, RunState, WHILE_CAP,
};
pub use session::{Session, SessionError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}, column {column}: I don't understand {near:?}")]
    Syntax {
        line: u32,
        column: usize,
        near: String,
    },
    #[error("I don't know how to {0}")]
    UnknownAction(String),
    #[error("{0} is too many times to repeat")]
    BadCount(String),
}

/// Which reader to use for script text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Recursive descent; blocks nest and mistakes are errors.
    #[default]
    Strict,
    /// The old forgiving reader; see [`reader`].
    Flat,
}

impl ParseMode {
    pub fn parse(self, text: &str) -> Result<Vec<Statement>, ScriptError> {
        match self {
            ParseMode::Strict => parse::parse_script(text),
            ParseMode::Flat => reader::read_flat(text),
        }
    }
}
