use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{alpha1, char, digit1, multispace0},
    combinator::{all_consuming, cut, map, map_opt, map_res, opt, recognize, verify},
    error::ErrorKind,
    multi::many0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::{Action, ScriptError, Statement};

pub type Span<'a> = nom_locate::LocatedSpan<&'a str>;
pub type ParseError<'a> = nom::error::Error<Span<'a>>;

fn ws<'a, F: 'a, O>(inner: F) -> impl FnMut(Span<'a>) -> IResult<Span<'a>, O>
where
    F: FnMut(Span<'a>) -> IResult<Span<'a>, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn parenthesized<'a, F: 'a, O>(inner: F) -> impl FnMut(Span<'a>) -> IResult<Span<'a>, O>
where
    F: FnMut(Span<'a>) -> IResult<Span<'a>, O>,
{
    delimited(ws(char('(')), inner, ws(char(')')))
}

fn ident(input: Span) -> IResult<Span, Span> {
    recognize(pair(
        alpha1,
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

fn keyword<'a>(kw: &'static str) -> impl FnMut(Span<'a>) -> IResult<Span<'a>, Span<'a>> {
    verify(ident, move |s: &Span| *s.fragment() == kw)
}

fn count(input: Span) -> IResult<Span, u32> {
    map_res(digit1, |digits: Span| digits.fragment().parse::<u32>())(input)
}

/// Either a sensor call like `gemAhead()`, or the one comparison we understand, `energy > 0`.
fn condition(input: Span) -> IResult<Span, String> {
    alt((
        map(
            tuple((keyword("energy"), ws(char('>')), char('0'))),
            |_| "energy>0".to_owned(),
        ),
        map(
            terminated(ident, pair(ws(char('(')), char(')'))),
            |name: Span| name.fragment().to_string(),
        ),
    ))(input)
}

pub fn block(input: Span) -> IResult<Span, Vec<Statement>> {
    delimited(
        char('{'),
        preceded(multispace0, many0(statement)),
        preceded(multispace0, char('}')),
    )(input)
}

// Once we've seen the keyword, there's no point trying anything else: errors after this are
// reported where they happen.
fn repeat(input: Span) -> IResult<Span, Statement> {
    map(
        preceded(keyword("repeat"), cut(pair(parenthesized(count), block))),
        |(n, body)| Statement::Repeat(n, body),
    )(input)
}

fn guarded<'a>(
    kw: &'static str,
) -> impl FnMut(Span<'a>) -> IResult<Span<'a>, (String, Vec<Statement>)> {
    preceded(keyword(kw), cut(pair(parenthesized(condition), block)))
}

fn action(input: Span) -> IResult<Span, Statement> {
    map(
        terminated(
            map_opt(ident, |name: Span| Action::try_from(*name.fragment()).ok()),
            pair(
                opt(pair(ws(char('(')), char(')'))),
                opt(ws(char(';'))),
            ),
        ),
        Statement::Action,
    )(input)
}

pub fn statement(input: Span) -> IResult<Span, Statement> {
    ws(alt((
        repeat,
        map(guarded("if"), |(cond, body)| Statement::If(cond, body)),
        map(guarded("while"), |(cond, body)| Statement::While(cond, body)),
        action,
    )))(input)
}

pub fn program(input: Span) -> IResult<Span, Vec<Statement>> {
    all_consuming(delimited(multispace0, many0(statement), multispace0))(input)
}

impl From<ParseError<'_>> for ScriptError {
    fn from(e: ParseError<'_>) -> Self {
        let rest = *e.input.fragment();
        if e.code == ErrorKind::MapRes {
            return ScriptError::BadCount(rest.chars().take_while(char::is_ascii_digit).collect());
        }
        ScriptError::Syntax {
            line: e.input.location_line(),
            column: e.input.get_utf8_column(),
            near: rest.split_whitespace().next().unwrap_or("").chars().take(20).collect(),
        }
    }
}

/// Parse a script, allowing blocks to nest.
pub fn parse_script(input: &str) -> Result<Vec<Statement>, ScriptError> {
    match program(Span::new(input)) {
        Ok((_, script)) => Ok(script),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(e.into()),
        Err(nom::Err::Incomplete(_)) => {
            Err(ParseError::new(Span::new(input), ErrorKind::Complete).into())
        }
    }
}
