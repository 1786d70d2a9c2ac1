//! Per-backend type resolution.
//!
//! Resolution precedence for every type reference:
//! 1. opaque-handle/interface names map to the backend handle wrapper,
//! 2. builtin base types resolve through the profile's static table,
//! 3. anything else keeps its name with prefix stripping or insertion,
//! 4. pointer, dynamic-array and fixed-array modifiers append in backend
//!    syntax,
//! 5. a plain boolean scalar picks up the single-byte interop hint.

use ffigen_ir::{ArraySize, BaseType, FieldAnnotation, Registry, TypeRef};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::profile::BackendProfile;

/// Marshaling hint attached to a resolved declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marshal {
    /// Pass a record by reference.
    Ref,
    /// Narrow string, marshaled as a single-byte character pointer.
    AnsiString,
    /// Wide string.
    WideString,
    /// Boolean normalized to one byte so every backend is wire-compatible.
    BoolByte,
    /// Fixed record array that must unroll into indexed scalar fields.
    Unroll,
}

impl Marshal {
    /// Attribute text for hints that print as their own annotation row.
    /// `Ref` and `Unroll` shape the declaration instead.
    pub fn attribute(self) -> Option<&'static str> {
        match self {
            Marshal::BoolByte => Some("MarshalAs(UnmanagedType.I1)"),
            Marshal::AnsiString => Some("MarshalAs(UnmanagedType.LPStr)"),
            Marshal::WideString => Some("MarshalAs(UnmanagedType.LPWStr)"),
            Marshal::Ref | Marshal::Unroll => None,
        }
    }
}

/// A type reference resolved to printable text.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDecl {
    pub ty: String,
    pub ident: String,
    pub marshal: Option<Marshal>,
}

impl ResolvedDecl {
    fn new(ident: &str) -> Self {
        Self {
            ident: ident.to_string(),
            ..Self::default()
        }
    }
}

/// Table-driven mapping from abstract type references to printable text.
pub struct TypeResolver<'a> {
    pub profile: &'a BackendProfile,
    pub registry: &'a Registry,
}

impl<'a> TypeResolver<'a> {
    pub fn new(profile: &'a BackendProfile, registry: &'a Registry) -> Self {
        Self { profile, registry }
    }

    fn sanitize_name(&self, name: &str, in_record: bool) -> String {
        if !self.registry.type_prefix.is_empty() {
            let stripped = self.registry.strip_type_prefix(name);
            if stripped != name {
                return stripped.to_string();
            }
        }
        if self.registry.is_string_type(name) {
            return if in_record { "byte*" } else { "string" }.to_string();
        }
        name.to_string()
    }

    /// Resolve a field or parameter for the managed format.
    ///
    /// `in_record` selects record-layout rules (raw pointers, inline or
    /// unrolled arrays) over parameter-passing rules (ref/string marshal).
    pub fn managed_decl(
        &self,
        name: &str,
        ty: &TypeRef,
        annotations: &[FieldAnnotation],
        in_record: bool,
    ) -> ResolvedDecl {
        let mut decl = ResolvedDecl::new(name);

        if ty.base == BaseType::Record && self.registry.is_interface(&ty.name) {
            decl.ty = self.sanitize_name(&ty.name, in_record);
        } else if ty.base == BaseType::Record && self.registry.is_handle(&ty.name) {
            // Raw handles lower to a generic pointer-sized value.
            decl.ty = "IntPtr".to_string();
        } else {
            let builtin = self.profile.builtin(ty.base);
            if in_record {
                if ty.fixed_array_len().is_some() && builtin.is_some() {
                    decl.ty.push_str("fixed ");
                }
                match builtin {
                    Some(b) => decl.ty.push_str(b),
                    None => decl.ty.push_str(&self.sanitize_name(&ty.name, in_record)),
                }
                if ty.is_pointer || ty.is_dynamic_array() {
                    decl.ty.push('*');
                } else if let Some(n) = ty.fixed_array_len() {
                    if builtin.is_some() {
                        decl.ident.push_str(&format!("[{}]", n));
                    } else if !self.profile.inline_record_arrays {
                        decl.marshal = Some(Marshal::Unroll);
                    }
                }
            } else {
                match builtin {
                    Some(b) => decl.ty.push_str(b),
                    None => decl.ty.push_str(&self.sanitize_name(&ty.name, in_record)),
                }
                if ty.is_pointer || ty.fixed_array_len().is_some() {
                    if annotations.contains(&FieldAnnotation::Nullable)
                        || annotations.contains(&FieldAnnotation::Array)
                    {
                        decl.ty.push('*');
                    } else if ty.base == BaseType::Record {
                        decl.marshal = Some(Marshal::Ref);
                    } else if ty.base == BaseType::Char {
                        decl.ty = "string".to_string();
                        decl.marshal = Some(Marshal::AnsiString);
                    } else if ty.base == BaseType::WChar {
                        decl.ty = "string".to_string();
                        decl.marshal = Some(Marshal::WideString);
                    } else {
                        decl.ty.push('*');
                    }
                }
            }
        }

        if ty.base == BaseType::Bool && !ty.is_pointer && ty.array == ArraySize::Scalar {
            decl.marshal = Some(Marshal::BoolByte);
        }

        decl
    }

    /// Resolve a struct field for the C-like format.
    ///
    /// Returns `(type text, declarator)`; the declarator carries the field
    /// name plus any bit-size annotation or fixed-array dimension.
    /// `sized_enums` maps enum names to the fixed bit width their entries
    /// must occupy in formats without explicit enum underlying types.
    pub fn c99_struct_field(
        &self,
        name: &str,
        ty: &TypeRef,
        sized_enums: &FxHashMap<SmolStr, u32>,
    ) -> (String, String) {
        let prefix = self.registry.type_prefix.as_str();
        let pointer_or_string = ty.is_pointer || self.registry.is_string_type(&ty.name);
        let mut type_str = String::new();

        // The element pointer of a lowered dynamic array is const.
        if ty.is_dynamic_array() && !pointer_or_string {
            type_str.push_str("const ");
        }

        if self.registry.is_string_type(&ty.name) {
            type_str.push_str("const char*");
        } else if ty.base == BaseType::Record && self.registry.is_interface(&ty.name) {
            type_str.push_str(prefix);
            type_str.push_str(&ty.name);
        } else {
            if ty.is_const {
                type_str.push_str("const ");
            }
            match self.profile.builtin(ty.base) {
                Some(b) => type_str.push_str(b),
                None => {
                    if ty.external_cond.is_none() {
                        type_str.push_str(prefix);
                    }
                    type_str.push_str(&ty.name);
                }
            }
            if ty.is_pointer {
                type_str.push('*');
            }
        }

        if ty.is_dynamic_array() {
            type_str.push_str(if pointer_or_string { " const*" } else { "*" });
        }

        let mut declarator = name.to_string();
        if let Some(bits) = sized_enums.get(&ty.name) {
            declarator.push_str(&format!(" : {}", bits));
        }
        if let Some(n) = ty.fixed_array_len() {
            declarator.push_str(&format!("[{}]", n));
        }

        (type_str, declarator)
    }

    /// Resolve a parameter or return type for the C-like format.
    pub fn c99_value_type(&self, ty: &TypeRef) -> String {
        let prefix = self.registry.type_prefix.as_str();
        if self.registry.is_string_type(&ty.name) {
            return "const char*".to_string();
        }

        let mut s = String::new();
        if ty.is_const {
            s.push_str("const ");
        }
        match self.profile.builtin(ty.base) {
            Some(b) => s.push_str(b),
            None if ty.name.is_empty() => s.push_str("void*"),
            None => {
                if ty.external_cond.is_none() {
                    s.push_str(prefix);
                }
                s.push_str(&ty.name);
            }
        }
        if ty.is_pointer {
            s.push('*');
        }
        if ty.is_dynamic_array() {
            s.push_str(if ty.is_pointer { " const*" } else { "*" });
        }
        s
    }
}
