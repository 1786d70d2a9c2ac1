//! Backend capability descriptors.
//!
//! The shared resolver and lowering pipeline is parameterized by one of
//! these; only the policy layers (initializer rewriting, duality
//! generation, handle wiring) branch on the backend kind directly.

use ffigen_ir::{BaseType, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// ABI-literal, C-like header format.
    C99,
    /// Managed-style interop binding format.
    Managed,
}

/// Everything the shared pipeline needs to know about one output format.
#[derive(Debug, Clone)]
pub struct BackendProfile {
    pub kind: BackendKind,
    /// Element-count type of a lowered dynamic array.
    pub count_type: &'static str,
    /// Null literal for plain pointers.
    pub null_literal: &'static str,
    /// Sentinel for a null opaque handle; a comparable domain value,
    /// distinct from `null_literal`.
    pub null_handle: String,
    /// Whether a fixed array of record elements can be embedded inline.
    /// Formats that cannot unroll such fields into indexed scalars.
    pub inline_record_arrays: bool,
}

impl BackendProfile {
    pub fn c99(registry: &Registry) -> Self {
        Self {
            kind: BackendKind::C99,
            count_type: "size_t",
            null_literal: "NULL",
            null_handle: format!("{}_NULL_OBJECT", registry.type_prefix.to_uppercase()),
            inline_record_arrays: true,
        }
    }

    pub fn managed(_registry: &Registry) -> Self {
        Self {
            kind: BackendKind::Managed,
            count_type: "UIntPtr",
            null_literal: "null",
            // Managed handle fields null out to `new <Handle>()` instead of
            // a shared sentinel; see the initializer rewriter.
            null_handle: String::new(),
            inline_record_arrays: false,
        }
    }

    /// Static builtin lookup, step (2) of the resolution precedence.
    pub fn builtin(&self, base: BaseType) -> Option<&'static str> {
        match self.kind {
            BackendKind::C99 => match base {
                BaseType::Void => Some("void"),
                BaseType::Bool => Some("bool"),
                BaseType::Char => Some("char"),
                BaseType::WChar => Some("wchar_t"),
                BaseType::Int8 => Some("int8_t"),
                BaseType::Int16 => Some("int16_t"),
                BaseType::Int32 => Some("int32_t"),
                BaseType::Int64 => Some("int64_t"),
                BaseType::Uint8 => Some("uint8_t"),
                BaseType::Uint16 => Some("uint16_t"),
                BaseType::Uint32 => Some("uint32_t"),
                BaseType::Uint64 => Some("uint64_t"),
                BaseType::Long => Some("long"),
                BaseType::SizeT => Some("size_t"),
                BaseType::Float => Some("float"),
                BaseType::Func | BaseType::Record => None,
            },
            BackendKind::Managed => match base {
                BaseType::Void => Some("void"),
                BaseType::Bool => Some("bool"),
                BaseType::Char => Some("byte"),
                BaseType::WChar => Some("char"),
                BaseType::Int8 => Some("sbyte"),
                BaseType::Int16 => Some("short"),
                BaseType::Int32 => Some("int"),
                BaseType::Int64 => Some("long"),
                BaseType::Uint8 => Some("byte"),
                BaseType::Uint16 => Some("ushort"),
                BaseType::Uint32 => Some("uint"),
                BaseType::Uint64 => Some("ulong"),
                BaseType::Long => Some("uint"),
                BaseType::SizeT => Some("UIntPtr"),
                BaseType::Float => Some("float"),
                BaseType::Func => Some("IntPtr"),
                BaseType::Record => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handle_sentinel_uses_prefix() {
        let registry = Registry {
            type_prefix: "Xg".into(),
            ..Registry::default()
        };
        let profile = BackendProfile::c99(&registry);
        assert_eq!(profile.null_handle, "XG_NULL_OBJECT");
    }

    #[test]
    fn test_builtin_tables_disagree_where_formats_do() {
        let registry = Registry::default();
        let c99 = BackendProfile::c99(&registry);
        let managed = BackendProfile::managed(&registry);

        assert_eq!(c99.builtin(BaseType::Uint8), Some("uint8_t"));
        assert_eq!(managed.builtin(BaseType::Uint8), Some("byte"));
        assert_eq!(managed.builtin(BaseType::Long), Some("uint"));
        assert_eq!(managed.builtin(BaseType::SizeT), Some("UIntPtr"));
        assert_eq!(c99.builtin(BaseType::Record), None);
    }
}
