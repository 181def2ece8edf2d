//! Line-oriented trace files: one statement per line, `#` comments.
//!
//! ```text
//! # warm-up
//! 0x1000
//! 0x2000..0x2100 step 4
//! repeat(10) {
//!     0x1000
//! }
//! ```

use winnow::ascii::{line_ending, space0};
use winnow::combinator::{
    alt, delimited, dispatch, eof, fail, opt, preceded, repeat, repeat_till, separated_pair,
    terminated,
};
use winnow::error::{ContextError, ParseError, StrContext, StrContextValue};
use winnow::token::{take, take_till, take_while};
use winnow::{ModalResult, Parser};

use crate::geometry::Address;

#[derive(Debug)]
pub enum TraceParseError<'a> {
    ParseError(ParseError<&'a str, ContextError>),
    SyntaxError(String),
}

impl std::fmt::Display for TraceParseError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceParseError::ParseError(parse_error) => f.write_fmt(format_args!("{parse_error}")),
            TraceParseError::SyntaxError(e) => f.write_fmt(format_args!("{e}")),
        }
    }
}

impl std::error::Error for TraceParseError<'_> {}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Address {
        addr: Address,
    },
    Range {
        start: Address,
        end: Address,
        step: Address,
    },
    Repeat {
        count: u64,
        block: Vec<Op>,
    },
}

/// A parsed trace. Expand to the ordered address sequence with
/// [`IntoIterator`].
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    ops: Vec<Op>,
}

impl<'a> TryFrom<&'a str> for Trace {
    type Error = TraceParseError<'a>;

    fn try_from(input: &'a str) -> Result<Self, Self::Error> {
        let ops: Vec<Op> = terminated(repeat(0.., statement), trivia)
            .parse(input)
            .map_err(TraceParseError::ParseError)?;

        let mut queue = Vec::<&Op>::from_iter(ops.iter());
        while let Some(op) = queue.pop() {
            match op {
                Op::Range { start, end, step } => {
                    if *step == 0 {
                        return Err(TraceParseError::SyntaxError(format!(
                            "range {start:#x}..{end:#x} has a zero step"
                        )));
                    }
                    if start > end {
                        return Err(TraceParseError::SyntaxError(format!(
                            "descending range {start:#x}..{end:#x}"
                        )));
                    }
                }
                Op::Repeat { count: _, block } => queue.extend(block.iter()),
                Op::Address { .. } => {}
            }
        }

        Ok(Self { ops })
    }
}

impl IntoIterator for Trace {
    type Item = Address;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        let mut addresses = Vec::new();

        let mut queue = Vec::<&Op>::from_iter(self.ops.iter().rev());
        while let Some(op) = queue.pop() {
            match op {
                Op::Address { addr } => addresses.push(*addr),
                Op::Range { start, end, step } => {
                    addresses.extend((*start..*end).step_by(*step as usize));
                }
                Op::Repeat { count, block } => {
                    for _ in 0..*count {
                        queue.extend(block.iter().rev());
                    }
                }
            }
        }

        addresses.into_iter()
    }
}

fn trivia(input: &mut &str) -> ModalResult<()> {
    repeat(
        0..,
        alt((take_while(1.., (' ', '\t', '\r', '\n')).void(), comment)),
    )
    .parse_next(input)
}

fn comment(input: &mut &str) -> ModalResult<()> {
    ('#', take_till(0.., ('\r', '\n'))).void().parse_next(input)
}

fn statement(input: &mut &str) -> ModalResult<Op> {
    // important: try 'range' before 'address' because of ambiguity
    preceded(trivia, alt((range, address, repeat_block)))
        .context(StrContext::Label("statement"))
        .context(StrContext::Expected(StrContextValue::Description(
            "an address ( 0x40 ), a range ( 0x40..0x80 step 4 ) or a repeat block ( repeat(3) { ... } )",
        )))
        .parse_next(input)
}

fn address(input: &mut &str) -> ModalResult<Op> {
    terminated(integer, end)
        .context(StrContext::Label("address"))
        .parse_next(input)
        .map(|addr| Op::Address { addr })
}

fn range(input: &mut &str) -> ModalResult<Op> {
    terminated(
        (
            separated_pair(integer, "..", integer),
            opt(preceded((space0, "step", space0), integer)),
        ),
        end,
    )
    .context(StrContext::Label("range"))
    .parse_next(input)
    .map(|((start, end), step)| Op::Range {
        start,
        end,
        step: step.unwrap_or(1),
    })
}

fn repeat_block(input: &mut &str) -> ModalResult<Op> {
    _ = "repeat".parse_next(input)?;

    (
        delimited((space0, '(', space0), integer, (space0, ')'))
            .context(StrContext::Label("repeat count")),
        block,
    )
        .context(StrContext::Label("repeat"))
        .parse_next(input)
        .map(|(count, block)| Op::Repeat { count, block })
        .map_err(|e| e.cut())
}

fn block(input: &mut &str) -> ModalResult<Vec<Op>> {
    preceded(
        (trivia, '{').context(StrContext::Label("block start")),
        repeat_till(
            0..,
            statement,
            (trivia, '}').context(StrContext::Label("block end")),
        ),
    )
    .parse_next(input)
    .map(|(ops, _)| ops)
    .map_err(|e| e.cut())
}

fn integer(input: &mut &str) -> ModalResult<Address> {
    alt((
        dispatch! {
            take(2usize);
            "0b" => take_while(1.., '0'..='1').try_map(|s| Address::from_str_radix(s, 2)),
            "0o" => take_while(1.., '0'..='7').try_map(|s| Address::from_str_radix(s, 8)),
            "0x" => take_while(1.., ('0'..='9', 'a'..='f', 'A'..='F')).try_map(|s| Address::from_str_radix(s, 16)),
            _ => fail::<_, Address, _>,
        },
        decimal_integer,
    ))
    .parse_next(input)
}

fn decimal_integer(input: &mut &str) -> ModalResult<Address> {
    take_while(1.., '0'..='9')
        .try_map(str::parse::<Address>)
        .parse_next(input)
}

fn end(input: &mut &str) -> ModalResult<()> {
    (space0, opt(comment), alt((line_ending.void(), eof.void())))
        .void()
        .parse_next(input)
}
