//! Semantic analysis: scope resolution plus type/storage decoration.
//!
//! A single pre-order walk per `Def` body (`decorate`), parameterized by an
//! inherited storage method and threaded through a scope that only grows
//! (via `Named`). Top-level forward references are handled as two passes
//! over the program's definitions rather than the mutable placeholder patch
//! the reference implementation uses: first every name is pre-bound so no
//! legitimate reference is ever `UnresolvedName`, then each body is
//! decorated in turn and the real return type replaces the placeholder.

mod decorate;


pub use decorate::{decorate, Decorated, DecoratedCase, DecoratedKind};
use decorate::effective_return;

use indexmap::IndexMap;

use llgen_core::{Def, LLType, Program, StorageMethod};

/// `name -> type`, in declaration order; an `IndexMap` rather than a hash
/// map so error messages and emitted diagnostics are reproducible.
pub type Scope = IndexMap<String, LLType>;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("undefined name `{name}`")]
    UnresolvedName { name: String, offset: u32 },

    #[error("peek cases disagree on result type")]
    PeekTypeMismatch { offset: u32 },

    #[error("`{name}` is defined more than once")]
    DuplicateDefinition { name: String, offset: u32 },
}

impl AnalyzeError {
    pub fn offset(&self) -> u32 {
        match self {
            AnalyzeError::UnresolvedName { offset, .. }
            | AnalyzeError::PeekTypeMismatch { offset }
            | AnalyzeError::DuplicateDefinition { offset, .. } => *offset,
        }
    }
}

impl From<&AnalyzeError> for llgen_core::Diagnostic {
    fn from(err: &AnalyzeError) -> Self {
        llgen_core::Diagnostic::error(err.to_string(), err.offset())
    }
}

/// A fully decorated top-level definition.
pub struct DecoratedDef<'a> {
    pub def: &'a Def,
    pub body: Decorated<'a>,
}

/// The decorated program: every definition's body, in source order.
pub struct DecoratedProgram<'a> {
    pub defs: Vec<DecoratedDef<'a>>,
}

/// Decorate every definition in `program`.
///
/// Pass 1 pre-binds each `Def`'s name to `Parser(Null)` — standing in for
/// the bottom type `spec.md` calls `Parser(⊥)` — so recursive and
/// forward references resolve instead of raising `UnresolvedName`. Pass 2
/// decorates each body in source order against the top-level scope as it
/// stands *at that point*: a name already processed carries its real
/// return type, a name not yet reached still carries the pass-1 stand-in.
/// This mirrors `spec.md` §4.4's `Def` rule read literally (it updates
/// "the outer scope" after each definition) rather than attempting a fixed
/// point up front; see `DESIGN.md` for the tradeoff.
///
/// A `Def`'s own return type (what a later `Var` referencing it resolves
/// to) is unwrapped exactly the way `Named` unwraps a parser's produced
/// value — otherwise referencing a rule by name would carry one more
/// `Parser` layer than referencing a literal or regex does, and a `Named`
/// wrapping that reference would bind one layer too deep.
pub fn decorate_program(program: &Program) -> Result<DecoratedProgram<'_>, AnalyzeError> {
    let mut top_scope = Scope::new();

    for def in &program.defs {
        if top_scope.contains_key(&def.name) {
            return Err(AnalyzeError::DuplicateDefinition {
                name: def.name.clone(),
                offset: def.offset,
            });
        }
        top_scope.insert(def.name.clone(), LLType::parser(LLType::Null));
    }

    let mut defs = Vec::with_capacity(program.defs.len());
    for def in &program.defs {
        let inner_scope = top_scope.clone();
        let (body, _) = decorate(&def.expr, StorageMethod::Return, &inner_scope)?;
        top_scope.insert(def.name.clone(), LLType::parser(effective_return(&body.ty)));
        defs.push(DecoratedDef { def, body });
    }

    Ok(DecoratedProgram { defs })
}
