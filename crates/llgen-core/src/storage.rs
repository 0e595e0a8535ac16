//! Storage-method decoration: how the emitter disposes of a node's result.

/// Describes what the emitter does with a decorated node's produced value.
/// Inherited top-down during semantic analysis (`spec.md` §3, §4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMethod {
    /// Discard the result.
    Ignore,
    /// `return` the result from the enclosing rule method.
    Return,
    /// Bind the result to a local variable of the given name.
    Var(String),
}

impl StorageMethod {
    /// The statement prefix the emitter splices in front of an expression,
    /// e.g. `""`, `"return "`, `"let n = "`.
    pub fn as_prefix(&self) -> String {
        match self {
            StorageMethod::Ignore => String::new(),
            StorageMethod::Return => "return ".to_string(),
            StorageMethod::Var(name) => format!("let {name} = "),
        }
    }
}
