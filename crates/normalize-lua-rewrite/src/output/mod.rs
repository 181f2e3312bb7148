//! Output writers - emit a [`crate::ir::Module`] as source code.

#[cfg(feature = "write-lua")]
pub mod lua;

#[cfg(feature = "write-lua")]
pub use lua::{LUA_WRITER, LuaWriter, LuaWriterImpl};

#[cfg(feature = "write-python")]
pub mod python;

#[cfg(feature = "write-python")]
pub use python::{PYTHON_WRITER, PythonWriter, PythonWriterImpl};
