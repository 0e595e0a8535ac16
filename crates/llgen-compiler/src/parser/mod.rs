//! Recursive-descent parsing with backtracking.
//!
//! Structured as generic combinators (`combinators`) plus one parse
//! function per grammar row (`grammar`). Every parse function has the
//! shape `fn(Cursor) -> Result<(T, Cursor), ParseError>`: on success it
//! returns the value alongside the cursor advanced past it; on failure the
//! caller's own cursor is untouched because `Cursor` is `Copy` and a
//! failing call never mutates the copy it was handed.

mod combinators;
mod grammar;

#[cfg(test)]
mod grammar_tests;

pub use combinators::{Cursor, ParseError};
pub use grammar::parse;
