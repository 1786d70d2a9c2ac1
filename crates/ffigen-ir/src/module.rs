use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::item::{DelegateDef, EnumDef, FlagSet, FunctionDef, Record};
use crate::registry::Registry;
use crate::types::TypeRef;

/// One module of the described API surface.
///
/// Declaration order is preserved verbatim in every output unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Module {
    pub name: SmolStr,

    #[serde(default)]
    pub structs: Vec<Record>,

    #[serde(default)]
    pub enums: Vec<EnumDef>,

    #[serde(default)]
    pub flags: Vec<FlagSet>,

    #[serde(default)]
    pub funcs: Vec<FunctionDef>,

    #[serde(default)]
    pub delegates: Vec<DelegateDef>,

    /// Types this module depends on; drives the per-backend include or
    /// using block of the output unit.
    #[serde(default)]
    pub type_deps: Vec<TypeRef>,
}

impl Module {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn find_struct(&self, name: &str) -> Option<&Record> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn find_flags(&self, name: &str) -> Option<&FlagSet> {
        self.flags.iter().find(|f| f.name == name)
    }
}

/// The complete input to a translation run: all modules plus the metadata
/// registry. Fully built before translation starts, read-only throughout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub modules: Vec<Module>,

    #[serde(default)]
    pub registry: Registry,
}
