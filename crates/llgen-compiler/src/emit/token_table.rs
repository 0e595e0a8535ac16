//! The emitter's token table: a deduplicating map from a stable token name
//! to the anchored JS regex literal the runtime matches it with.

use indexmap::IndexMap;

use super::EmitError;

/// Characters a literal's lexeme must be escaped for before it can be
/// embedded inside a JS regex literal, plus any whitespace character.
fn escape_literal_as_regex(lexeme: &str) -> String {
    let mut escaped = String::with_capacity(lexeme.len());
    for c in lexeme.chars() {
        if matches!(
            c,
            '-' | '/' | '[' | ']' | '{' | '}' | '(' | ')' | '*' | '+' | '?' | '.' | ',' | '\\'
                | '^' | '$' | '|' | '#'
        ) || c.is_whitespace()
        {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Accumulates `token_name -> /pattern/` entries as the emitter walks the
/// decorated tree, deduplicating repeated literals/patterns into a single
/// entry (first-seen order is preserved, which is what makes emitted output
/// deterministic run to run).
#[derive(Debug, Default)]
pub struct TokenTable {
    entries: IndexMap<String, String>,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a `LiteralParser`'s lexeme, returning its stable token name.
    pub fn insert_literal(&mut self, lexeme: &str) -> String {
        let token_name = format!("lit_{lexeme}");
        let pattern = format!("/^{}/", escape_literal_as_regex(lexeme));
        self.entries.insert(token_name.clone(), pattern);
        token_name
    }

    /// Register a `RegexParser`'s pattern, returning its stable token name.
    /// Rejects patterns that aren't syntactically valid regular expressions
    /// before they're baked into the table — the runtime's `__require`
    /// would otherwise fail far from the grammar source that caused it.
    pub fn insert_regex(&mut self, pattern: &str, offset: u32) -> Result<String, EmitError> {
        regex_syntax::Parser::new()
            .parse(pattern)
            .map_err(|e| EmitError::InvalidRegexPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
                offset,
            })?;

        let token_name = pattern.replace('"', "\\\"");
        let as_regex = format!("/^{}/", pattern.replace('/', "\\/"));
        self.entries.insert(token_name.clone(), as_regex);
        Ok(token_name)
    }

    /// Render the table as the object-literal body the runtime template
    /// slots in (one `"name": /pattern/,` line per entry, in first-seen
    /// order).
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(name, pattern)| format!("        \"{name}\": {pattern},"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
