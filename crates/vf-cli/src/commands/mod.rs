//! CLI command implementations

pub(crate) mod common;
pub(crate) mod compile;
pub(crate) mod deps;
pub(crate) mod run;
pub(crate) mod validate;
