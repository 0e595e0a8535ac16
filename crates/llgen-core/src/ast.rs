//! The closed set of AST node variants the grammar parser builds.
//!
//! Parsers consume input and produce a result; values produce a result
//! without consuming input. `spec.md` §3 is the authority for this shape.

use indexmap::IndexMap;

/// Matches a fixed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralParser {
    pub lexeme: String,
}

/// Matches a regular expression anchored at the current position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexParser {
    pub pattern: String,
    pub offset: u32,
}

/// A reference to a previously (or later) defined name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    pub name: String,
    pub offset: u32,
}

/// Right-leaning binary tree of two parser expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub first: Box<Expr>,
    pub second: Box<Expr>,
}

/// One arm of a [`Peek`]: an optional speculative test and a body.
/// `test: None` means the default/any arm.
#[derive(Debug, Clone, PartialEq)]
pub struct PeekCase {
    pub test: Option<Box<Expr>>,
    pub body: Box<Expr>,
}

/// Prioritized choice via one-token lookahead. Order is significant; the
/// first matching case wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Peek {
    pub cases: Vec<PeekCase>,
    pub offset: u32,
}

/// Parse `expr` and bind its result to `name` in the enclosing scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Named {
    pub expr: Box<Expr>,
    pub name: String,
    pub offset: u32,
}

/// Run `parser` for its side effect, then evaluate `result` as the overall
/// result.
#[derive(Debug, Clone, PartialEq)]
pub struct As {
    pub parser: Box<Expr>,
    pub result: Box<Expr>,
}

/// Run `parser`; if it fails, raise a user-visible error with `message`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorAnnotation {
    pub parser: Box<Expr>,
    pub message: String,
}

/// Print the JSON serialization of `expr`'s result, then forward it.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugExpr {
    pub expr: Box<Expr>,
}

/// A literal string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LitStr {
    pub value: String,
}

/// Constructs a structured value. If `name` is present, a reserved
/// `_type` field carries it. `fields` preserves declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Struct {
    pub name: Option<String>,
    pub fields: IndexMap<String, String>,
    pub offset: u32,
}

/// The closed set of expression node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    LiteralParser(LiteralParser),
    RegexParser(RegexParser),
    Var(Var),
    Sequence(Sequence),
    Peek(Peek),
    Named(Named),
    As(As),
    Error(ErrorAnnotation),
    Debug(DebugExpr),
    LitStr(LitStr),
    Struct(Struct),
}

/// A rule definition: `name :: expr`, optionally `export`ed.
#[derive(Debug, Clone, PartialEq)]
pub struct Def {
    pub name: String,
    pub expr: Expr,
    pub exported: bool,
    pub offset: u32,
}

/// The whole program: an ordered list of definitions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub defs: Vec<Def>,
}
