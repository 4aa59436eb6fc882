//! The lookup-key mini-language.
//!
//! Keys are either attribute lookups (`@name`) or path expressions over the
//! ElementTree-compatible subset the wrapper exposes: `tag`, `./tag`,
//! `.//tag`, compound `a/b`, wildcard `*`, and a trailing `[]` that forces
//! list semantics on the result. This is deliberately not XPath; there are
//! no axes beyond child/descendant, no predicates and no functions.

use crate::error::Error;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    combinator::{map, recognize},
    multi::many0,
    sequence::{pair, preceded},
};

/// A parsed lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// `@name`: attribute value lookup, terminates in a plain string.
    Attribute(String),
    /// Anything else: a path expression resolved to element nodes.
    Path(PathExpr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    pub steps: Vec<Step>,
    /// Set by a trailing `[]`; zero matches become an empty list instead of
    /// an error, and a single match stays a list.
    pub forced_list: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub test: NameTest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Direct children (`tag`, `./tag`, `a/b`).
    Child,
    /// Descendants at any depth, document order (`.//tag`, `a//b`).
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameTest {
    Name(String),
    /// `*`: every element regardless of tag.
    Wildcard,
}

/// Parses a raw lookup key. Fails with [`Error::InvalidKey`] on empty or
/// malformed input.
pub fn parse_key(key: &str) -> Result<Key, Error> {
    if key.is_empty() {
        return Err(invalid(key, "empty key"));
    }
    if let Some(name) = key.strip_prefix('@') {
        if name.is_empty() {
            return Err(invalid(key, "missing attribute name"));
        }
        return Ok(Key::Attribute(name.to_string()));
    }

    let (expr, forced_list) = match key.strip_suffix("[]") {
        Some(stripped) => (stripped, true),
        None => (key, false),
    };
    match path(expr) {
        Ok(("", steps)) => Ok(Key::Path(PathExpr { steps, forced_list })),
        Ok((rest, _)) => Err(invalid(key, &format!("unexpected trailing input '{}'", rest))),
        Err(e) => Err(invalid(key, &e.to_string())),
    }
}

fn invalid(key: &str, reason: &str) -> Error {
    Error::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

// --- nom combinators ---

/// An XML name: letters/underscore first, then name characters. Prefixed
/// names (`ns:tag`) parse as one opaque name; namespaces are not resolved.
fn xml_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| {
            c.is_alphanumeric() || c == '_' || c == '-' || c == '.' || c == ':'
        }),
    ))
    .parse(input)
}

fn name_test(input: &str) -> IResult<&str, NameTest> {
    alt((
        map(tag("*"), |_| NameTest::Wildcard),
        map(xml_name, |name: &str| NameTest::Name(name.to_string())),
    ))
    .parse(input)
}

fn separator(input: &str) -> IResult<&str, Axis> {
    alt((
        map(tag("//"), |_| Axis::Descendant),
        map(tag("/"), |_| Axis::Child),
    ))
    .parse(input)
}

/// The first step may carry an explicit self prefix: `./tag` or `.//tag`.
fn first_step(input: &str) -> IResult<&str, Step> {
    alt((
        map(preceded(tag(".//"), name_test), |test| Step {
            axis: Axis::Descendant,
            test,
        }),
        map(preceded(tag("./"), name_test), |test| Step {
            axis: Axis::Child,
            test,
        }),
        map(name_test, |test| Step {
            axis: Axis::Child,
            test,
        }),
    ))
    .parse(input)
}

fn path(input: &str) -> IResult<&str, Vec<Step>> {
    let (input, first) = first_step(input)?;
    let (input, rest) = many0(map(pair(separator, name_test), |(axis, test)| Step {
        axis,
        test,
    }))
    .parse(input)?;

    let mut steps = vec![first];
    steps.extend(rest);
    Ok((input, steps))
}
