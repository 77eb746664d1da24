//! The flat, forgiving reader.
//!
//! This reads scripts the way the puzzles have always been run: it looks for the next thing it
//! recognizes, skipping one character at a time over anything it doesn't, and a block's body is
//! everything up to the *first* closing brace. That means a block nested inside another block is
//! not read back reliably. Use [`crate::parse`] for scripts that nest.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, opt, verify},
    sequence::{delimited, pair, terminated, tuple},
    IResult,
};

use crate::{Action, ScriptError, Statement};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RawKind {
    Repeat,
    If,
    While,
    Action,
}

/// The shape of one statement, before anything inside it has been read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawStatement {
    pub kind: RawKind,
    /// The repeat count, the condition name, or the action name.
    pub params: Vec<String>,
    /// The unread text of the block, for everything but actions.
    pub body_raw: Option<String>,
    /// How many bytes of input this statement used up, including anything skipped before it.
    pub consumed: usize,
}

type Parts<'a> = (RawKind, &'a str, Option<&'a str>);

fn ws<'a, F: 'a, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn body(input: &str) -> IResult<&str, &str> {
    delimited(char('{'), take_till(|c: char| c == '}'), char('}'))(input)
}

fn repeat(input: &str) -> IResult<&str, Parts> {
    map(
        tuple((tag("repeat"), ws(char('(')), digit1, ws(char(')')), body)),
        |(_, _, count, _, body)| (RawKind::Repeat, count, Some(body)),
    )(input)
}

fn guarded<'a>(
    keyword: &'static str,
    kind: RawKind,
) -> impl FnMut(&'a str) -> IResult<&'a str, Parts<'a>> {
    map(
        tuple((
            tag(keyword),
            ws(char('(')),
            word,
            ws(char('(')),
            char(')'),
            ws(char(')')),
            body,
        )),
        move |(_, _, cond, _, _, _, body)| (kind, cond, Some(body)),
    )
}

fn action(input: &str) -> IResult<&str, Parts> {
    map(
        terminated(
            verify(word, |w: &str| Action::try_from(w).is_ok()),
            pair(
                opt(pair(ws(char('(')), char(')'))),
                opt(ws(char(';'))),
            ),
        ),
        |name| (RawKind::Action, name, None),
    )(input)
}

fn raw_statement(input: &str) -> IResult<&str, Parts> {
    alt((
        repeat,
        guarded("if", RawKind::If),
        guarded("while", RawKind::While),
        action,
    ))(input)
}

/// Find the next statement in `input`.
///
/// Anything unrecognized is skipped, one character at a time. Returns `None` once there is
/// nothing left to recognize.
pub fn read_next(input: &str) -> Option<RawStatement> {
    let mut rest = input;
    loop {
        rest = rest.trim_start();
        let ch = rest.chars().next()?;
        if let Ok((after, (kind, param, body))) = raw_statement(rest) {
            return Some(RawStatement {
                kind,
                params: vec![param.to_owned()],
                body_raw: body.map(|b| b.trim().to_owned()),
                consumed: input.len() - after.len(),
            });
        }
        log::trace!("skipping {ch:?}");
        rest = &rest[ch.len_utf8()..];
    }
}

impl RawStatement {
    /// Read the rest of this statement, including its body.
    pub fn to_statement(&self) -> Result<Statement, ScriptError> {
        let param = self.params.first().map(String::as_str).unwrap_or_default();
        let body = || read_flat(self.body_raw.as_deref().unwrap_or_default());
        Ok(match self.kind {
            RawKind::Repeat => {
                let count = param
                    .parse()
                    .map_err(|_| ScriptError::BadCount(param.to_owned()))?;
                Statement::Repeat(count, body()?)
            }
            RawKind::If => Statement::If(param.to_owned(), body()?),
            RawKind::While => Statement::While(param.to_owned(), body()?),
            RawKind::Action => Statement::Action(
                Action::try_from(param).map_err(|_| ScriptError::UnknownAction(param.to_owned()))?,
            ),
        })
    }
}

/// Read a whole script with the flat reader.
pub fn read_flat(input: &str) -> Result<Vec<Statement>, ScriptError> {
    let mut ret = Vec::new();
    let mut rest = input;
    while let Some(raw) = read_next(rest) {
        rest = &rest[raw.consumed..];
        ret.push(raw.to_statement()?);
    }
    Ok(ret)
}
