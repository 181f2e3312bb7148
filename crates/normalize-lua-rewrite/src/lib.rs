//! Structural rewriting of Python syntax trees into Lua-shaped trees.
//!
//! `normalize-lua-rewrite` takes a tree in Python's grammar and applies a
//! fixed set of rewrite rules, keyed on node kind, so the result maps onto
//! Lua constructs. It adjusts structure, not semantics: the output is only
//! as correct as a surface-level translation can be.
//!
//! # Architecture
//!
//! ```text
//!  Python source ─> Reader ─> Module ─> Rewriter ─> Module ─> Writer ─> Lua source
//!                 (input)    (ir.rs)   (engine.rs)           (output)
//!                                          │
//!                                  RuleSet + ScopeStack
//!                                 (rules.rs)  (scope.rs)
//! ```
//!
//! - [`rules`]: one rule per node kind. A rule reports a [`RewriteResult`]
//!   (unchanged, replaced, expanded into several statements, removed) and
//!   never touches children.
//! - [`engine`]: walks the tree, applies rule results, splices expansions,
//!   and keeps the [`ScopeStack`] that makes `return` rewriting depend on
//!   the enclosing block.
//! - [`driver`]: text in, text out, with failures reported as
//!   [`CompileError`].
//!
//! # Example
//!
//! ```ignore
//! use normalize_lua_rewrite::compile;
//!
//! let lua = compile("for i in range(1, 5):\n    print(i)\n")?;
//! // i = 1
//! // while (i < 5) do
//! //     print(i)
//! //     i = i + 1
//! // end
//! ```
//!
//! # Shared values
//!
//! `a = b = v` splits into one assignment per target, and all of them hold
//! the same `Rc<Expr>` for `v`. Writers must treat the tree as a DAG.

pub mod config;
pub mod driver;
pub mod engine;
pub mod ir;
pub mod rules;
pub mod scope;
pub mod traits;

pub mod input;
pub mod output;

// Re-exports: IR types
pub use ir::{BoolOperator, CmpOp, Constant, Expr, Module, Operator, Stmt, UnaryOperator};

// Re-exports: rewriting
pub use config::{ConfigError, RewriteConfig};
pub use engine::Rewriter;
pub use rules::{RewriteError, RewriteResult, RuleSet};
pub use scope::{ScopeFrame, ScopeStack};

// Re-exports: entry points
#[cfg(all(feature = "read-python", feature = "write-lua"))]
pub use driver::compile;
pub use driver::{CompileError, Compiler, transform};

// Re-exports: Traits
pub use traits::{ReadError, Reader, Writer};

// Re-exports: Built-in readers
#[cfg(feature = "read-python")]
pub use input::read_python;
#[cfg(feature = "read-python")]
pub use input::python::PythonReader;

// Re-exports: Built-in writers
#[cfg(feature = "write-lua")]
pub use output::LuaWriter;
#[cfg(feature = "write-lua")]
pub use output::lua::LuaWriterImpl;
#[cfg(feature = "write-python")]
pub use output::PythonWriter;
