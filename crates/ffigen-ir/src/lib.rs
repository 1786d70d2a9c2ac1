//! The language-agnostic API description consumed by the ffigen backends.
//!
//! This crate defines the read-only input tree: modules of records, enums,
//! flag-sets, functions and delegates, plus the metadata registry (known
//! opaque-handle names, derived-handle relations, reserved name prefixes,
//! the symbolic-constant table and banner text). The tree is produced by an
//! external parser, either in-process or across a JSON boundary via serde,
//! and is never mutated during translation.

mod item;
mod module;
mod registry;
mod types;

pub use item::*;
pub use module::*;
pub use registry::*;
pub use types::*;
