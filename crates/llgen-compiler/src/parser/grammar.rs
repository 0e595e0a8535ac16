//! One parse function per row of the grammar's precedence table.
//!
//! Every function has the shape `fn(Cursor) -> Result<(T, Cursor), ParseError>`
//! so it composes directly with `list_of`/`first_of`/`optional`.

use indexmap::IndexMap;

use llgen_core::{
    As, Def, DebugExpr, ErrorAnnotation, Expr, LitStr, LiteralParser, Named, Peek, PeekCase,
    Program, RegexParser, Sequence, Struct, Token, TokenKind, Var,
};

use super::combinators::{first_of, list_of, optional, Cursor, ParseError};

/// Strip the delimiters off a back-tick-quoted lexeme and un-escape `` \` ``.
fn unescape_backtick(raw: &str) -> String {
    raw.replace("\\`", "`")
}

fn parse_literal_parser<'t, 'src>(
    cursor: Cursor<'t, 'src>,
) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    let (token, cursor) = cursor.need(TokenKind::LitParser)?;
    let inner = &token.lexeme[1..token.lexeme.len() - 1];
    Ok((
        Expr::LiteralParser(LiteralParser {
            lexeme: unescape_backtick(inner),
        }),
        cursor,
    ))
}

fn parse_regex_parser<'t, 'src>(
    cursor: Cursor<'t, 'src>,
) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    let (token, cursor) = cursor.need(TokenKind::LitRegex)?;
    let inner = &token.lexeme[2..token.lexeme.len() - 1];
    Ok((
        Expr::RegexParser(RegexParser {
            pattern: unescape_backtick(inner),
            offset: token.offset,
        }),
        cursor,
    ))
}

/// Used in both parser position (`atom`) and value position (`value`) — the
/// grammar defines only one `var` production either way.
fn parse_var<'t, 'src>(cursor: Cursor<'t, 'src>) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    let (token, next) = cursor.need(TokenKind::Ident)?;
    if next.peek_kind(TokenKind::DoubleColon) {
        return Err(ParseError::VarFollowedByDefinition { offset: token.offset });
    }
    Ok((
        Expr::Var(Var {
            name: token.lexeme.to_string(),
            offset: token.offset,
        }),
        next,
    ))
}

fn parse_named_parser<'t, 'src>(
    cursor: Cursor<'t, 'src>,
) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    let (_, cursor) = cursor.need(TokenKind::OBracket)?;
    let (expr, cursor) = parse_suffix(cursor)?;
    let (_, cursor) = cursor.need(TokenKind::Colon)?;
    let (name_token, cursor) = cursor.need(TokenKind::Ident)?;
    let (_, cursor) = cursor.need(TokenKind::CBracket)?;
    Ok((
        Expr::Named(Named {
            expr: Box::new(expr),
            name: name_token.lexeme.to_string(),
            offset: name_token.offset,
        }),
        cursor,
    ))
}

fn parse_debug<'t, 'src>(cursor: Cursor<'t, 'src>) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    let (_, cursor) = cursor.need(TokenKind::KwDebug)?;
    let (_, cursor) = cursor.need(TokenKind::OParen)?;
    let (expr, cursor) = parse_suffix(cursor)?;
    let (_, cursor) = cursor.need(TokenKind::CParen)?;
    Ok((Expr::Debug(DebugExpr { expr: Box::new(expr) }), cursor))
}

fn parse_case<'t, 'src>(
    cursor: Cursor<'t, 'src>,
) -> Result<(PeekCase, Cursor<'t, 'src>), ParseError> {
    let (_, cursor) = cursor.need(TokenKind::KwCase)?;
    let (test, cursor) = if cursor.peek_kind(TokenKind::Under) {
        let (_, cursor) = cursor.need(TokenKind::Under)?;
        (None, cursor)
    } else {
        let (expr, cursor) = parse_suffix(cursor)?;
        (Some(Box::new(expr)), cursor)
    };
    let (_, cursor) = cursor.need(TokenKind::Arrow)?;
    let (body, cursor) = parse_suffix(cursor)?;
    Ok((
        PeekCase {
            test,
            body: Box::new(body),
        },
        cursor,
    ))
}

fn parse_peek<'t, 'src>(cursor: Cursor<'t, 'src>) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    let (kw, cursor) = cursor.need(TokenKind::KwPeek)?;
    let (_, cursor) = cursor.need(TokenKind::OBrace)?;
    let (cases, cursor) = list_of(
        cursor,
        1,
        parse_case,
        None::<fn(Cursor<'_, '_>) -> Result<((), Cursor<'_, '_>), ParseError>>,
    )?;
    let (_, cursor) = cursor.need(TokenKind::CBrace)?;
    Ok((
        Expr::Peek(Peek {
            cases,
            offset: kw.offset,
        }),
        cursor,
    ))
}

fn parse_atom<'t, 'src>(cursor: Cursor<'t, 'src>) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    first_of(
        cursor,
        &[
            parse_literal_parser,
            parse_regex_parser,
            parse_var,
            parse_named_parser,
            parse_debug,
            parse_peek,
        ],
    )
}

/// An `atom` optionally followed by its own `! STRING` error annotation.
/// This binds tighter than `sequence` so that a flat run of atoms can carry
/// independent error messages (`` `foo` ! "a" `bar` ! "b" ``) rather than a
/// single message applying to the whole run — see `DESIGN.md`.
fn parse_atom_with_error<'t, 'src>(
    cursor: Cursor<'t, 'src>,
) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    let (atom, cursor) = parse_atom(cursor)?;
    let (message, cursor) = optional(cursor, parse_error_message);
    Ok(match message {
        Some(message) => (
            Expr::Error(ErrorAnnotation {
                parser: Box::new(atom),
                message,
            }),
            cursor,
        ),
        None => (atom, cursor),
    })
}

fn parse_sequence<'t, 'src>(
    cursor: Cursor<'t, 'src>,
) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    let (first, cursor) = parse_atom_with_error(cursor)?;
    let (second, cursor) = optional(cursor, parse_sequence);
    Ok(match second {
        Some(second) => (
            Expr::Sequence(Sequence {
                first: Box::new(first),
                second: Box::new(second),
            }),
            cursor,
        ),
        None => (first, cursor),
    })
}

fn parse_as_value<'t, 'src>(
    cursor: Cursor<'t, 'src>,
) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    let (_, cursor) = cursor.need(TokenKind::KwAs)?;
    parse_value(cursor)
}

fn parse_error_message<'t, 'src>(
    cursor: Cursor<'t, 'src>,
) -> Result<(String, Cursor<'t, 'src>), ParseError> {
    let (_, cursor) = cursor.need(TokenKind::Bang)?;
    parse_string(cursor)
}

/// `sequence` optionally followed by a single `as VALUE`, replacing the
/// whole sequence's result with a constructed value. `! STRING` binds at
/// the atom level (`parse_atom_with_error`), not here — see `DESIGN.md`.
fn parse_suffix<'t, 'src>(cursor: Cursor<'t, 'src>) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    let (expr, cursor) = parse_sequence(cursor)?;
    let (result, cursor) = optional(cursor, parse_as_value);
    Ok(match result {
        Some(result) => (
            Expr::As(As {
                parser: Box::new(expr),
                result: Box::new(result),
            }),
            cursor,
        ),
        None => (expr, cursor),
    })
}

fn parse_string<'t, 'src>(
    cursor: Cursor<'t, 'src>,
) -> Result<(String, Cursor<'t, 'src>), ParseError> {
    let (token, cursor) = cursor.need(TokenKind::LitString)?;
    let inner = &token.lexeme[1..token.lexeme.len() - 1];
    Ok((inner.replace("\\\"", "\""), cursor))
}

fn parse_string_value<'t, 'src>(
    cursor: Cursor<'t, 'src>,
) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    let (value, cursor) = parse_string(cursor)?;
    Ok((Expr::LitStr(LitStr { value }), cursor))
}

fn parse_struct_entry<'t, 'src>(
    cursor: Cursor<'t, 'src>,
) -> Result<((String, String), Cursor<'t, 'src>), ParseError> {
    let (key, cursor) = cursor.need(TokenKind::Ident)?;
    let (_, cursor) = cursor.need(TokenKind::Colon)?;
    let (value, cursor) = cursor.need(TokenKind::Ident)?;
    Ok(((key.lexeme.to_string(), value.lexeme.to_string()), cursor))
}

fn parse_struct<'t, 'src>(cursor: Cursor<'t, 'src>) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    let (kw, cursor) = cursor.need(TokenKind::KwStruct)?;
    let (name_token, cursor) = optional(cursor, |c: Cursor<'t, 'src>| c.need(TokenKind::Ident));
    let name = name_token.map(|t| t.lexeme.to_string());
    let (_, cursor) = cursor.need(TokenKind::OBrace)?;
    let (entries, cursor) = list_of(
        cursor,
        0,
        parse_struct_entry,
        Some(|c: Cursor<'t, 'src>| c.need(TokenKind::Comma).map(|(_, c)| ((), c))),
    )?;
    let (_, cursor) = cursor.need(TokenKind::CBrace)?;

    let mut fields = IndexMap::new();
    for (key, value) in entries {
        fields.insert(key, value);
    }
    Ok((
        Expr::Struct(Struct {
            name,
            fields,
            offset: kw.offset,
        }),
        cursor,
    ))
}

fn parse_value<'t, 'src>(cursor: Cursor<'t, 'src>) -> Result<(Expr, Cursor<'t, 'src>), ParseError> {
    first_of(cursor, &[parse_var, parse_struct, parse_string_value])
}

fn parse_def<'t, 'src>(cursor: Cursor<'t, 'src>) -> Result<(Def, Cursor<'t, 'src>), ParseError> {
    let (export_token, cursor) =
        optional(cursor, |c: Cursor<'t, 'src>| c.need(TokenKind::KwExport));
    let (name, cursor) = cursor.need(TokenKind::Ident)?;
    let (_, cursor) = cursor.need(TokenKind::DoubleColon)?;
    let (expr, cursor) = parse_suffix(cursor)?;
    Ok((
        Def {
            name: name.lexeme.to_string(),
            expr,
            exported: export_token.is_some(),
            offset: name.offset,
        },
        cursor,
    ))
}

fn parse_file<'t, 'src>(
    cursor: Cursor<'t, 'src>,
) -> Result<(Program, Cursor<'t, 'src>), ParseError> {
    let (defs, cursor) = list_of(
        cursor,
        0,
        parse_def,
        None::<fn(Cursor<'_, '_>) -> Result<((), Cursor<'_, '_>), ParseError>>,
    )?;
    Ok((Program { defs }, cursor))
}

/// Entry point: parse a complete token stream into a [`Program`].
///
/// If tokens remain after `file` gives up, `statement` (here, `def` — see
/// `DESIGN.md`'s note on the vestigial top-level `debug` row) is retried at
/// that position purely so its failure, rather than a generic "tokens left
/// over" message, becomes the reported error.
pub fn parse(tokens: &[Token<'_>]) -> Result<Program, ParseError> {
    let cursor = Cursor::new(tokens);
    let (program, cursor) = parse_file(cursor)?;
    if cursor.empty() {
        return Ok(program);
    }
    Err(match parse_def(cursor) {
        Err(e) => e,
        Ok(_) => ParseError::TrailingTokens {
            offset: cursor.peek().map(|t| t.offset).unwrap_or(0),
        },
    })
}
