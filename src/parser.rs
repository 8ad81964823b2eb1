//! Block scanner: splits pigsty source into bracketed blocks of raw `key = value` pairs using PEST.
//!
//! Values are returned as raw tokens; decoding and key lookup happen in the [loader](crate::loader).

use crate::error::{LoadError, Location};
use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct PigstyParser;

/// One `key = value` pair as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPair<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub key_location: Location,
    pub value_location: Location,
}

/// One `< ... >` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock<'a> {
    pub location: Location,
    pub pairs: Vec<RawPair<'a>>,
}

/// Top-level item, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<'a> {
    Block(RawBlock<'a>),
    /// A non-whitespace character outside any block.
    Stray(Location),
}

/// Scan the whole source. Any grammar failure is a [`LoadError::MalformedBlock`].
pub fn scan(source: &str) -> Result<Vec<Item<'_>>, LoadError> {
    let mut pairs = PigstyParser::parse(Rule::file, source).map_err(malformed)?;
    let file = pairs.next().ok_or_else(|| LoadError::MalformedBlock {
        location: Location::new(1, 1),
        message: "empty parse".to_string(),
    })?;

    let mut items = Vec::new();
    for inner in file.into_inner() {
        match inner.as_rule() {
            Rule::block => items.push(Item::Block(build_block(inner)?)),
            Rule::stray => items.push(Item::Stray(location_of(&inner))),
            _ => {}
        }
    }
    Ok(items)
}

fn build_block(pair: Pair<'_, Rule>) -> Result<RawBlock<'_>, LoadError> {
    let location = location_of(&pair);
    let mut pairs = Vec::new();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::pair {
            pairs.push(build_pair(inner, location)?);
        }
    }
    Ok(RawBlock { location, pairs })
}

fn build_pair(pair: Pair<'_, Rule>, block: Location) -> Result<RawPair<'_>, LoadError> {
    let missing = |what: &str| LoadError::MalformedBlock {
        location: block,
        message: format!("pair without {}", what),
    };
    let mut it = pair.into_inner();
    let key = it.next().ok_or_else(|| missing("key"))?;
    let value = it.next().ok_or_else(|| missing("value"))?;
    Ok(RawPair {
        key: key.as_str(),
        value: value.as_str(),
        key_location: location_of(&key),
        value_location: location_of(&value),
    })
}

fn location_of(pair: &Pair<'_, Rule>) -> Location {
    let (line, column) = pair.as_span().start_pos().line_col();
    Location::new(line, column)
}

fn malformed(e: pest::error::Error<Rule>) -> LoadError {
    let e = e.renamed_rules(|rule| {
        let name = match rule {
            Rule::block => "`<`",
            Rule::pair => "`key = value`",
            Rule::key => "field name",
            Rule::quoted | Rule::bare => "value",
            Rule::stray | Rule::file => "block",
            Rule::EOI => "end of input",
            _ => "token",
        };
        name.to_string()
    });
    let (line, column) = match e.line_col {
        LineColLocation::Pos(p) => p,
        LineColLocation::Span(start, _) => start,
    };
    LoadError::MalformedBlock {
        location: Location::new(line, column),
        message: e.variant.message().into_owned(),
    }
}
