//! Text-to-text entry points: read, rewrite, write.

use crate::config::RewriteConfig;
use crate::engine::Rewriter;
use crate::ir::Module;
use crate::rules::RewriteError;
use crate::traits::{ReadError, Reader, Writer};
use tracing::debug;

/// Why a compilation produced no output.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// The source could not be read into a tree.
    #[error("syntax error: {0}")]
    Syntax(#[from] ReadError),

    /// A node did not have the shape its rewrite rule requires.
    #[error(transparent)]
    Precondition(#[from] RewriteError),
}

/// Reads source, rewrites the tree, and writes it back out.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    rewriter: Rewriter,
}

impl Compiler {
    pub fn new(config: RewriteConfig) -> Self {
        Self {
            rewriter: Rewriter::new(config),
        }
    }

    pub fn config(&self) -> &RewriteConfig {
        self.rewriter.config()
    }

    /// Rewrite a tree that has already been parsed.
    pub fn transform(&self, module: Module) -> Result<Module, CompileError> {
        Ok(self.rewriter.rewrite_module(module)?)
    }

    /// Compile with explicit collaborators. A read failure stops before any
    /// rewriting happens.
    pub fn compile_with(
        &self,
        reader: &dyn Reader,
        writer: &dyn Writer,
        source: &str,
    ) -> Result<String, CompileError> {
        let module = reader.read(source)?;
        debug!(
            from = reader.language(),
            to = writer.language(),
            statements = module.body.len(),
            "read module"
        );
        let module = self.transform(module)?;
        Ok(writer.write(&module))
    }

    /// Compile Python source to Lua source.
    #[cfg(all(feature = "read-python", feature = "write-lua"))]
    pub fn compile(&self, source: &str) -> Result<String, CompileError> {
        self.compile_with(
            &crate::input::PYTHON_READER,
            &crate::output::LUA_WRITER,
            source,
        )
    }
}

/// Compile Python source to Lua source with the default names.
#[cfg(all(feature = "read-python", feature = "write-lua"))]
pub fn compile(source: &str) -> Result<String, CompileError> {
    Compiler::default().compile(source)
}

/// Rewrite a parsed tree with the default names.
pub fn transform(module: Module) -> Result<Module, CompileError> {
    Compiler::default().transform(module)
}
