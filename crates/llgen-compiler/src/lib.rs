//! Compiles an `llgen` grammar source file into a single self-contained JS
//! parser file.
//!
//! The pipeline is four stages, each its own module:
//! - `parser` - recursive-descent parsing with backtracking into an AST
//! - `analyze` - scope resolution plus type/storage decoration
//! - `emit` - walks the decorated tree into JS source, a token table, and
//!   an export list
//! - `driver` - glues the three together and renders the runtime template
//!
//! [`driver::compile`] is the facade most callers want.

pub mod analyze;
pub mod driver;
pub mod emit;
pub mod parser;

pub use driver::{compile, DriverError, Emitted};
