//! vf-jinja - Jinja templating layer for Viewforge
//!
//! This crate renders view templates with `ref()` and `var()` functions,
//! wraps bare queries in `CREATE OR REPLACE VIEW`, and optionally writes
//! the compiled SQL to a mirrored output tree.

pub mod compiler;
pub mod environment;
pub mod error;
mod functions;
pub mod resolver;

pub use compiler::{CompiledOutput, CompiledView, TemplateCompiler};
pub use environment::JinjaEnvironment;
pub use error::{JinjaError, JinjaResult};
pub use resolver::RefResolver;
