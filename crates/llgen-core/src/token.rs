//! Token kinds and the lexer.
//!
//! `TokenKind` is derived with `logos`. Keywords and the `_` symbol are
//! given an explicit `priority` higher than the bare `Ident` pattern so the
//! "keywords (and `_`) are matched before identifiers" discipline from the
//! grammar description holds even though every keyword is itself a valid
//! `\w+` match.
use logos::Logos;

use crate::error::LexError;
use crate::source_map::LineIndex;

/// The closed set of token categories the lexer produces. Whitespace is
/// skipped and never appears in the output stream.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    #[token("peek", priority = 10)]
    KwPeek,
    #[token("case", priority = 10)]
    KwCase,
    #[token("export", priority = 10)]
    KwExport,
    #[token("debug", priority = 10)]
    KwDebug,
    #[token("as", priority = 10)]
    KwAs,
    #[token("struct", priority = 10)]
    KwStruct,

    #[token("(")]
    OParen,
    #[token(")")]
    CParen,
    #[token("{")]
    OBrace,
    #[token("}")]
    CBrace,
    #[token("[")]
    OBracket,
    #[token("]")]
    CBracket,
    #[token("=>")]
    Arrow,
    #[token(",")]
    Comma,
    #[token("::")]
    DoubleColon,
    #[token(":")]
    Colon,
    #[token("!")]
    Bang,
    #[token("_", priority = 10)]
    Under,

    #[regex(r"`(?:\\`|[^`])*`")]
    LitParser,
    #[regex(r"r`(?:\\`|[^`])*`")]
    LitRegex,
    #[regex(r#""(?:\\"|[^"])*""#)]
    LitString,

    #[regex(r"\w+", priority = 1)]
    Ident,
}

/// A single lexed token: its kind, the exact matched substring, and the
/// byte offset it started at (used to report errors and to recover literal
/// payloads during parsing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub offset: u32,
}

/// Tokenize `source`, discarding whitespace, in declaration order.
///
/// Fails on the first character that matches none of the token categories.
pub fn lex(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(kind) => tokens.push(Token {
                kind,
                lexeme: &source[span.clone()],
                offset: span.start as u32,
            }),
            Err(()) => {
                let offset = span.start as u32;
                let character = source[span.start..].chars().next().unwrap_or('\u{FFFD}');
                let (line, column) = LineIndex::new(source).line_col(offset);
                return Err(LexError {
                    line,
                    column,
                    character,
                    offset,
                });
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod token_tests {
    use super::*;

    #[test]
    fn keywords_are_never_idents() {
        let tokens = lex("peek case export debug as struct").unwrap();
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Ident));
        assert_eq!(tokens[0].kind, TokenKind::KwPeek);
        assert_eq!(tokens[5].kind, TokenKind::KwStruct);
    }

    #[test]
    fn underscore_is_its_own_kind() {
        let tokens = lex("_ _foo").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Under);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].lexeme, "_foo");
    }

    #[test]
    fn whitespace_is_discarded_and_lexemes_concatenate_to_source_minus_whitespace() {
        let src = "export  test ::\n`foo`";
        let tokens = lex(src).unwrap();
        let joined: String = tokens.iter().map(|t| t.lexeme).collect();
        let without_ws: String = src.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(joined, without_ws);
    }

    #[test]
    fn backtick_literal_and_regex_literal_are_distinct() {
        let tokens = lex("`foo` r`fo+`").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::LitParser);
        assert_eq!(tokens[0].lexeme, "`foo`");
        assert_eq!(tokens[1].kind, TokenKind::LitRegex);
        assert_eq!(tokens[1].lexeme, "r`fo+`");
    }

    #[test]
    fn unknown_character_is_a_lex_error() {
        let err = lex("test :: @").unwrap_err();
        assert_eq!(err.character, '@');
    }
}
