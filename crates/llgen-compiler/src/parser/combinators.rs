//! Cursor and the three generic backtracking combinators.

use llgen_core::{Token, TokenKind};

/// Every parsing function that fails must leave the cursor exactly where it
/// was at entry — this is the single invariant the whole grammar parser
/// relies on. Because `Cursor` is `Copy` and every parse function takes it
/// by value, that invariant holds for free: a failing call can only ever
/// return `Err`, never a mutated cursor, so the caller's own copy is
/// untouched.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'t, 'src> {
    tokens: &'t [Token<'src>],
    index: usize,
}

impl<'t, 'src> Cursor<'t, 'src> {
    pub fn new(tokens: &'t [Token<'src>]) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn empty(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn remaining(&self) -> &'t [Token<'src>] {
        &self.tokens[self.index.min(self.tokens.len())..]
    }

    fn end_offset(&self) -> u32 {
        self.tokens.last().map(|t| t.offset + t.lexeme.len() as u32).unwrap_or(0)
    }

    pub fn peek(&self) -> Result<Token<'src>, ParseError> {
        self.tokens.get(self.index).copied().ok_or(ParseError::UnexpectedEof {
            offset: self.end_offset(),
        })
    }

    pub fn peek_kind(&self, kind: TokenKind) -> bool {
        matches!(self.peek(), Ok(t) if t.kind == kind)
    }

    pub fn next(mut self) -> Result<(Token<'src>, Self), ParseError> {
        let token = self.peek()?;
        self.index += 1;
        Ok((token, self))
    }

    pub fn need(self, kind: TokenKind) -> Result<(Token<'src>, Self), ParseError> {
        let token = self.peek()?;
        if token.kind != kind {
            return Err(ParseError::UnexpectedToken {
                got: token.kind,
                want: kind,
                offset: token.offset,
            });
        }
        self.next()
    }
}

/// Errors raised inside the grammar parser. All are recoverable via
/// backtracking except a `need` failure at a position the caller chose not
/// to retry, or `first_of`'s/`list_of`'s exhaustion once every alternative
/// has been tried.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEof { offset: u32 },

    #[error("unexpected {got:?}; needed {want:?}")]
    UnexpectedToken {
        got: TokenKind,
        want: TokenKind,
        offset: u32,
    },

    #[error("too few items: needed at least {min}, got {got}")]
    ListTooShort { min: usize, got: usize },

    #[error("a variable reference can't be immediately followed by `::` — that begins a definition")]
    VarFollowedByDefinition { offset: u32 },

    #[error("remaining tokens after parsing the file")]
    TrailingTokens { offset: u32 },
}

impl ParseError {
    pub fn offset(&self) -> u32 {
        match self {
            ParseError::UnexpectedEof { offset }
            | ParseError::UnexpectedToken { offset, .. }
            | ParseError::VarFollowedByDefinition { offset }
            | ParseError::TrailingTokens { offset } => *offset,
            ParseError::ListTooShort { .. } => 0,
        }
    }
}

impl From<&ParseError> for llgen_core::Diagnostic {
    fn from(err: &ParseError) -> Self {
        llgen_core::Diagnostic::error(err.to_string(), err.offset())
    }
}

/// Repeatedly apply `item`, backing off on failure, requiring at least
/// `min` successes. When `sep` is given, absence of a separator after an
/// item terminates the list (the item after a missing separator is never
/// attempted).
pub fn list_of<'t, 'src, T>(
    mut cursor: Cursor<'t, 'src>,
    min: usize,
    item: impl Fn(Cursor<'t, 'src>) -> Result<(T, Cursor<'t, 'src>), ParseError>,
    sep: Option<impl Fn(Cursor<'t, 'src>) -> Result<((), Cursor<'t, 'src>), ParseError>>,
) -> Result<(Vec<T>, Cursor<'t, 'src>), ParseError> {
    let mut items = Vec::new();
    let mut last_err = None;

    loop {
        match item(cursor) {
            Ok((value, next)) => {
                items.push(value);
                cursor = next;
            }
            Err(e) => {
                last_err = Some(e);
                break;
            }
        }

        if let Some(sep) = &sep {
            match sep(cursor) {
                Ok((_, next)) => cursor = next,
                Err(_) => break,
            }
        }
    }

    if items.len() < min {
        return Err(last_err.unwrap_or(ParseError::ListTooShort {
            min,
            got: items.len(),
        }));
    }

    Ok((items, cursor))
}

/// Try each alternative in order, restoring on failure. The error
/// surfaced on total failure is the *last* attempt's error, not the first
/// — later alternatives are assumed to have gotten further into a more
/// specific parse before failing.
pub fn first_of<'t, 'src, T>(
    cursor: Cursor<'t, 'src>,
    parsers: &[fn(Cursor<'t, 'src>) -> Result<(T, Cursor<'t, 'src>), ParseError>],
) -> Result<(T, Cursor<'t, 'src>), ParseError> {
    let mut last_err = None;
    for parser in parsers {
        match parser(cursor) {
            Ok(result) => return Ok(result),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or(ParseError::UnexpectedEof {
        offset: cursor.end_offset(),
    }))
}

/// Success-or-none, restoring on failure.
pub fn optional<'t, 'src, T>(
    cursor: Cursor<'t, 'src>,
    parser: impl Fn(Cursor<'t, 'src>) -> Result<(T, Cursor<'t, 'src>), ParseError>,
) -> (Option<T>, Cursor<'t, 'src>) {
    match parser(cursor) {
        Ok((value, next)) => (Some(value), next),
        Err(_) => (None, cursor),
    }
}
