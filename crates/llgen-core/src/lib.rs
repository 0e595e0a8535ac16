//! Shared vocabulary for the llgen compiler pipeline.
//!
//! This crate provides the pieces every pipeline stage agrees on:
//! - `token` - token kinds and the lexer
//! - `source_map` - byte offset to line/column resolution
//! - `ast` - the closed AST node enum the grammar parser builds
//! - `types` - the small type algebra assigned during semantic analysis
//! - `storage` - the storage-method decoration assigned during semantic analysis
//! - `error` - the shared diagnostic type and lexer error enum

pub mod ast;
pub mod error;
pub mod source_map;
pub mod storage;
pub mod token;
pub mod types;

pub use ast::{
    As, Def, DebugExpr, ErrorAnnotation, Expr, LitStr, LiteralParser, Named, Peek, PeekCase,
    Program, RegexParser, Sequence, Struct, Var,
};
pub use error::{Diagnostic, DiagnosticsPrinter, LexError, Severity};
pub use source_map::LineIndex;
pub use storage::StorageMethod;
pub use token::{lex, Token, TokenKind};
pub use types::LLType;
