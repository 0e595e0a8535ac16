//! Walks a decorated tree and emits JS source, a token table, and the
//! export list, per `spec.md` §4.5.

mod emitter;
mod token_table;

#[cfg(test)]
mod emitter_tests;

pub use emitter::emit_program;
pub use emitter::EmitOutput;
pub use token_table::TokenTable;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EmitError {
    #[error("regex pattern `{pattern}` is not a valid regular expression: {message}")]
    InvalidRegexPattern {
        pattern: String,
        message: String,
        offset: u32,
    },

    #[error("struct field `{field}` references `{name}`, which is not bound in scope")]
    UnresolvedFieldReference {
        field: String,
        name: String,
        offset: u32,
    },

    /// Raised from the `entrypoint` name a caller passed in, not from
    /// anything in the source text — there is no better offset than 0,
    /// the same sentinel `ParseError::ListTooShort` uses for the same
    /// reason.
    #[error("`{name}` is used as a standalone entry point but is not exported")]
    EntryPointNotExported { name: String },
}

impl EmitError {
    pub fn offset(&self) -> u32 {
        match self {
            EmitError::InvalidRegexPattern { offset, .. }
            | EmitError::UnresolvedFieldReference { offset, .. } => *offset,
            EmitError::EntryPointNotExported { .. } => 0,
        }
    }
}

impl From<&EmitError> for llgen_core::Diagnostic {
    fn from(err: &EmitError) -> Self {
        llgen_core::Diagnostic::error(err.to_string(), err.offset())
    }
}
