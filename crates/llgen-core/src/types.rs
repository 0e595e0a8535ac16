//! The small type algebra assigned to every node during semantic analysis.

use indexmap::IndexMap;

/// A static type, drawn from the closed algebra: `spec.md` §3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LLType {
    /// No value (used for statement-level nodes such as `Def`/`Program`).
    Null,
    /// A plain string result, produced by every primitive parser.
    String,
    /// A parser whose successful result has type `ret`.
    Parser(Box<LLType>),
    /// A structured value, one type per field, in declaration order.
    Struct(IndexMap<String, LLType>),
}

impl LLType {
    pub fn parser(ret: LLType) -> Self {
        LLType::Parser(Box::new(ret))
    }
}

impl std::fmt::Display for LLType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLType::Null => write!(f, "Null"),
            LLType::String => write!(f, "String"),
            LLType::Parser(ret) => write!(f, "Parser<{ret}>"),
            LLType::Struct(fields) => {
                write!(f, "Struct{{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
