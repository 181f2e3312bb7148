//! Collaborators on either side of the rewrite: readers produce a
//! [`Module`], writers serialize one.

use crate::ir::Module;

/// Error that can occur when reading source code into a tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid syntax at line {line}, column {column}")]
    Syntax { line: usize, column: usize },

    #[error("unsupported syntax: {0}")]
    Unsupported(String),

    #[error("expected {expected}, got {got}")]
    UnexpectedNode { expected: String, got: String },
}

/// A reader parses source code into a [`Module`].
pub trait Reader {
    /// Language identifier (e.g., "python").
    fn language(&self) -> &'static str;

    /// File extensions this reader handles.
    fn extensions(&self) -> &'static [&'static str];

    fn read(&self, source: &str) -> Result<Module, ReadError>;
}

/// A writer emits a [`Module`] as source code.
///
/// Writers only borrow the tree: split assignments share their value
/// subtree, and a writer must not assume each node is visited once.
pub trait Writer {
    /// Language identifier (e.g., "lua").
    fn language(&self) -> &'static str;

    /// File extension for output (e.g., "lua").
    fn extension(&self) -> &'static str;

    fn write(&self, module: &Module) -> String;
}
