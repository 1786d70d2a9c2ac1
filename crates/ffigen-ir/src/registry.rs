use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Ergonomic-surface options for one record in the managed backend.
///
/// Records absent from both surface tables are emitted only in their
/// ABI-literal form.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SurfaceOptions {
    /// Generate the ergonomic-to-ABI conversion direction.
    #[serde(default)]
    pub getter: bool,
    /// Generate the ABI-to-ergonomic conversion direction.
    #[serde(default)]
    pub setter: bool,
    /// Generate a constructor taking every non-deprecated field.
    #[serde(default)]
    pub full_ctor: bool,
}

impl SurfaceOptions {
    pub fn full_ctor() -> Self {
        Self {
            full_ctor: true,
            ..Self::default()
        }
    }

    pub fn getter() -> Self {
        Self {
            getter: true,
            ..Self::default()
        }
    }

    pub fn getter_setter() -> Self {
        Self {
            getter: true,
            setter: true,
            ..Self::default()
        }
    }
}

/// One base opaque-handle category and its closed set of derived kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandleRelation {
    pub base: SmolStr,
    pub derived: Vec<SmolStr>,
}

/// A conditionally included foreign header of the C-like output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalInclude {
    #[serde(default)]
    pub cond: Option<String>,
    #[serde(default)]
    pub include: Option<String>,
}

/// Metadata registry supplied next to the module tree.
///
/// Everything the backends must know beyond the declarations themselves:
/// opaque-handle names, derived-handle relations, reserved name prefixes,
/// the symbolic-constant table and the banner text blocks. All tables are
/// insertion-ordered so output stays byte-identical across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    /// Opaque-handle (interface) type names, in declared order.
    #[serde(default)]
    pub interfaces: Vec<SmolStr>,

    /// Raw handle type names lowered to a bare pointer-sized value.
    #[serde(default)]
    pub handles: Vec<SmolStr>,

    /// Declared base-to-derived handle relations.
    #[serde(default)]
    pub relations: Vec<HandleRelation>,

    /// Reserved prefix carried by the described API's type names.
    #[serde(default)]
    pub type_prefix: SmolStr,

    /// Reserved prefix carried by exported function names.
    #[serde(default)]
    pub func_prefix: SmolStr,

    /// Reserved prefix carried by delegate (callback) names.
    #[serde(default)]
    pub delegate_prefix: SmolStr,

    /// Symbolic-constant table resolved during initializer translation.
    #[serde(default)]
    pub constants: IndexMap<SmolStr, i128>,

    /// Copyright lines of the templated file banner.
    #[serde(default)]
    pub copyright: Vec<String>,

    /// Informational lines printed below the banner.
    #[serde(default)]
    pub info: Vec<String>,

    /// Baseline includes of every C-like output unit.
    #[serde(default)]
    pub includes: Vec<String>,

    /// Conditionally included foreign headers.
    #[serde(default)]
    pub externals: Vec<ExternalInclude>,

    /// Type names treated as strings rather than records.
    #[serde(default)]
    pub string_types: Vec<SmolStr>,

    /// Generated flag-entry names to drop instead of emitting a duplicate
    /// identifier (the collision is a known clear/reset synonym).
    #[serde(default)]
    pub suppressed_flag_entries: Vec<SmolStr>,

    /// Records emitted as ergonomic value types in the managed backend.
    #[serde(default)]
    pub value_records: IndexMap<SmolStr, SurfaceOptions>,

    /// Records emitted as ergonomic class types with native conversion.
    #[serde(default)]
    pub class_records: IndexMap<SmolStr, SurfaceOptions>,

    /// Record name to flag-set name hints for property typing.
    #[serde(default)]
    pub struct_flags: IndexMap<SmolStr, SmolStr>,

    /// Property names typed against a same-named flag-set when one exists.
    #[serde(default)]
    pub flag_properties: Vec<SmolStr>,
}

impl Registry {
    pub fn is_interface(&self, name: &str) -> bool {
        self.interfaces.iter().any(|i| i == name)
    }

    pub fn is_handle(&self, name: &str) -> bool {
        self.handles.iter().any(|h| h == name)
    }

    pub fn is_string_type(&self, name: &str) -> bool {
        self.string_types.iter().any(|s| s == name)
    }

    pub fn is_suppressed_flag_entry(&self, name: &str) -> bool {
        self.suppressed_flag_entries.iter().any(|s| s == name)
    }

    /// Ergonomic-surface options for a record, value table first.
    pub fn surface_options(&self, name: &str) -> Option<SurfaceOptions> {
        self.value_records
            .get(name)
            .or_else(|| self.class_records.get(name))
            .copied()
    }

    /// Strip the reserved type prefix from a name, if present.
    pub fn strip_type_prefix<'a>(&self, name: &'a str) -> &'a str {
        name.strip_prefix(self.type_prefix.as_str()).unwrap_or(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_stripping() {
        let registry = Registry {
            type_prefix: "XG".into(),
            ..Registry::default()
        };
        assert_eq!(registry.strip_type_prefix("XGBuffer"), "Buffer");
        assert_eq!(registry.strip_type_prefix("Extent2D"), "Extent2D");
    }

    #[test]
    fn test_surface_lookup_prefers_value_records() {
        let mut registry = Registry::default();
        registry
            .value_records
            .insert("Extent2D".into(), SurfaceOptions::full_ctor());
        registry
            .class_records
            .insert("Extent2D".into(), SurfaceOptions::getter());

        let options = registry.surface_options("Extent2D").unwrap();
        assert!(options.full_ctor);
        assert!(!options.getter);
    }
}
