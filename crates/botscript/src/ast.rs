use std::fmt;

/// The things a robot can do.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Move,
    PickUp,
    TurnLeft,
    TurnRight,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Move,
        Action::PickUp,
        Action::TurnLeft,
        Action::TurnRight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::Move => "move",
            Action::PickUp => "pickUp",
            Action::TurnLeft => "turnLeft",
            Action::TurnRight => "turnRight",
        }
    }
}

impl TryFrom<&str> for Action {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Action::ALL
            .into_iter()
            .find(|a| a.name() == value)
            .ok_or(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    Action(Action),
    Repeat(u32, Vec<Statement>),
    /// A condition name and the body to run if it holds.
    If(String, Vec<Statement>),
    While(String, Vec<Statement>),
}

fn fmt_condition(cond: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if cond == "energy>0" {
        f.write_str("energy > 0")
    } else {
        f.write_fmt(format_args!("{cond}()"))
    }
}

fn fmt_body(body: &[Statement], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(" {")?;
    for s in body {
        f.write_fmt(format_args!(" {s}"))?;
    }
    f.write_str(" }")
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Action(a) => f.write_fmt(format_args!("{}()", a.name())),
            Statement::Repeat(n, body) => {
                f.write_fmt(format_args!("repeat({n})"))?;
                fmt_body(body, f)
            }
            Statement::If(cond, body) => {
                f.write_str("if(")?;
                fmt_condition(cond, f)?;
                f.write_str(")")?;
                fmt_body(body, f)
            }
            Statement::While(cond, body) => {
                f.write_str("while(")?;
                fmt_condition(cond, f)?;
                f.write_str(")")?;
                fmt_body(body, f)
            }
        }
    }
}

/// Render a script as text that the strict parser reads back as the same statements.
pub fn to_text(script: &[Statement]) -> String {
    script
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
