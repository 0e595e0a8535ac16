//! Glues the pipeline stages together and renders the runtime template.
//!
//! Modeled as a typestate chain — `Source -> Tokenized -> Parsed ->
//! Analyzed -> Emitted` — so a caller can't skip a stage or render before
//! analysis has run. `Analyzed` borrows its `Parsed` rather than consuming
//! it: a `DecoratedProgram` holds references into the `Program` it
//! decorates, and a typestate struct can't own a value and a borrow of that
//! same value at once. Borrowing `&Parsed` for the last two stages keeps the
//! chain a plain, non-`unsafe` struct sequence at the cost of the caller
//! holding the `Parsed` alive a little longer than a fully-consuming chain
//! would demand.

use llgen_core::lex;

use crate::analyze::{decorate_program, AnalyzeError, DecoratedProgram};
use crate::emit::{emit_program, EmitError};
use crate::parser::{parse, ParseError};

#[cfg(test)]
mod driver_tests;

const RUNTIME_TEMPLATE: &str = include_str!("runtime_template.js");

#[derive(Debug, Clone, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Lex(#[from] llgen_core::LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Analyze(#[from] AnalyzeError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

impl DriverError {
    /// A [`llgen_core::Diagnostic`] for whichever stage failed, ready to
    /// print plain or, given the original source, pointed at its offset via
    /// [`llgen_core::Diagnostic::printer`].
    pub fn diagnostic(&self) -> llgen_core::Diagnostic {
        match self {
            DriverError::Lex(e) => e.into(),
            DriverError::Parse(e) => e.into(),
            DriverError::Analyze(e) => e.into(),
            DriverError::Emit(e) => e.into(),
        }
    }
}

/// Raw grammar source, not yet tokenized.
pub struct Source<'src> {
    text: &'src str,
}

impl<'src> Source<'src> {
    pub fn new(text: &'src str) -> Self {
        Self { text }
    }

    pub fn tokenize(self) -> Result<Tokenized<'src>, DriverError> {
        let tokens = lex(self.text)?;
        Ok(Tokenized { tokens })
    }
}

/// The token stream, borrowed from the original source text.
pub struct Tokenized<'src> {
    tokens: Vec<llgen_core::Token<'src>>,
}

impl Tokenized<'_> {
    pub fn parse(self) -> Result<Parsed, DriverError> {
        let program = parse(&self.tokens)?;
        Ok(Parsed { program })
    }
}

/// The parsed AST, owned and independent of the source text it came from.
pub struct Parsed {
    program: llgen_core::Program,
}

impl Parsed {
    pub fn analyze(&self) -> Result<Analyzed<'_>, DriverError> {
        let decorated = decorate_program(&self.program)?;
        Ok(Analyzed { decorated })
    }
}

/// The decorated tree: every node's type and storage method settled,
/// borrowed from the `Parsed` that produced it.
pub struct Analyzed<'p> {
    decorated: DecoratedProgram<'p>,
}

impl Analyzed<'_> {
    pub fn emit(&self) -> Result<Emitted, DriverError> {
        let output = emit_program(&self.decorated)?;

        let source = RUNTIME_TEMPLATE
            .replacen("/*__TOKENS__*/", &output.tokens.render(), 1)
            .replacen("/*__PARSERS__*/", &output.parsers, 1)
            .replacen("/*__EXPORTS__*/", &render_exports(&output.exports), 1);

        Ok(Emitted {
            source,
            exports: output.exports,
        })
    }
}

/// A complete, standalone JS parser file plus the names it exports.
pub struct Emitted {
    pub source: String,
    pub exports: Vec<String>,
}

impl Emitted {
    /// Append a thin shim that reads all of stdin, invokes `entrypoint` on
    /// it, and prints the result as JSON — the emitted-file counterpart of
    /// a CLI's `--stdin ENTRYPOINT` flag. Fails if `entrypoint` wasn't
    /// exported — there would be nothing on `module.exports` to call.
    pub fn with_standalone_entrypoint(mut self, entrypoint: &str) -> Result<Self, DriverError> {
        if !self.exports.iter().any(|name| name == entrypoint) {
            return Err(DriverError::Emit(EmitError::EntryPointNotExported {
                name: entrypoint.to_string(),
            }));
        }
        self.source.push_str(&format!(
            "\nif (require.main === module) {{\n    \
             const __input = require(\"fs\").readFileSync(0, \"utf-8\");\n    \
             console.log(JSON.stringify(exports.{entrypoint}(__input)));\n}}\n"
        ));
        Ok(self)
    }

    pub fn into_source(self) -> String {
        self.source
    }
}

fn render_exports(exports: &[String]) -> String {
    exports
        .iter()
        .map(|name| format!("exports.{name} = (input) => new Parser(input).__consume_all(\"{name}\");"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run the whole pipeline over `source` in one call.
pub fn compile(source: &str) -> Result<Emitted, DriverError> {
    Source::new(source).tokenize()?.parse()?.analyze()?.emit()
}
