//! Declaration-translation backends for the ffigen code generator.
//!
//! Two output formats share one pipeline: the column-aligned emitter, the
//! table-driven type resolver and the struct classifier are backend
//! agnostic and parameterized by a [`BackendProfile`]; only initializer
//! policy, the duality generator and handle wiring differ per format.
//!
//! Translation is single-pass and purely functional: the same module and
//! registry always produce byte-identical output.

mod c99;
mod emit;
mod handles;
mod init;
mod managed;
mod profile;
mod resolve;

pub use emit::{
    count_field_name, header_guard, pascal_case, Column, DeclRow, Declaration, DeclarationList,
    EmitOptions, Emitter,
};
pub use init::InitRewriter;
pub use profile::{BackendKind, BackendProfile};
pub use resolve::{Marshal, ResolvedDecl, TypeResolver};

use ffigen_common::{Diagnostic, Result};
use ffigen_ir::{Module, Registry};

/// One fully emitted output unit plus the non-fatal diagnostics collected
/// while producing it.
#[derive(Debug)]
pub struct Unit {
    pub text: String,
    pub warnings: Vec<Diagnostic>,
}

/// Emit the ABI-literal, C-like header unit for one module.
pub fn translate_c99(module: &Module, registry: &Registry, options: &EmitOptions) -> Result<Unit> {
    c99::translate(module, registry, options)
}

/// Emit the managed-style interop binding unit for one module.
pub fn translate_managed(
    module: &Module,
    registry: &Registry,
    options: &EmitOptions,
) -> Result<Unit> {
    managed::translate(module, registry, options)
}
