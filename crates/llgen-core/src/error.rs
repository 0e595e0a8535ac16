//! Shared diagnostic shape used by every error enum in the pipeline.

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

/// Severity of a [`Diagnostic`]. The pipeline only ever produces `Error`
/// today; `Warning` exists so a future relaxation of an Open Question
/// (e.g. treating `Peek` type mismatches as a warning) has somewhere to go
/// without changing the shape of the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic: a message anchored to a byte offset in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub offset: u32,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, offset: u32) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            offset,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Builder for rendering a [`Diagnostic`] with or without a source snippet.
///
/// Without a `source`, renders the diagnostic's plain `Display` text. With
/// one, points into it using `annotate-snippets` — a single-point span at
/// `offset` since a [`Diagnostic`] carries no end offset.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostic: &'d Diagnostic,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostic: &'d Diagnostic) -> Self {
        Self {
            diagnostic,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let Some(source) = self.source else {
            return self.diagnostic.to_string();
        };

        let start = (self.diagnostic.offset as usize).min(source.len());
        let end = (start + 1).min(source.len().max(start + 1));
        let range = start..end;

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(range)
                .label(&self.diagnostic.message),
        );
        if let Some(p) = self.path {
            snippet = snippet.path(p);
        }

        let level = severity_to_level(self.diagnostic.severity);
        let report = [level.primary_title(&self.diagnostic.message).element(snippet)];
        renderer.render(&report).to_string()
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

impl Diagnostic {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}

/// Failure to tokenize the source text.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown token at line {line}, column {column}: {character:?}")]
pub struct LexError {
    pub line: u32,
    pub column: u32,
    pub character: char,
    pub offset: u32,
}

impl From<&LexError> for Diagnostic {
    fn from(err: &LexError) -> Self {
        Diagnostic::error(err.to_string(), err.offset)
    }
}
