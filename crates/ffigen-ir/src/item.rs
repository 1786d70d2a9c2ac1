use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::types::TypeRef;

/// Semantic annotations carried by fields and parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAnnotation {
    /// A pointer parameter that may legally be null.
    Nullable,
    /// A pointer parameter that addresses a sequence rather than one value.
    Array,
}

/// A record field or function parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: SmolStr,

    #[serde(rename = "type")]
    pub ty: TypeRef,

    /// Literal initializer expression in the source notation of the
    /// described API (scope tokens, `nullptr`, or-combined flags, aggregate
    /// brace lists, symbolic constant names).
    #[serde(default)]
    pub init: Option<String>,

    /// Deprecation message, if the field is kept for source compatibility.
    #[serde(default)]
    pub deprecated: Option<String>,

    #[serde(default)]
    pub annotations: Vec<FieldAnnotation>,
}

impl Field {
    pub fn new(name: impl Into<SmolStr>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            init: None,
            deprecated: None,
            annotations: Vec::new(),
        }
    }

    pub fn with_init(mut self, init: impl Into<String>) -> Self {
        self.init = Some(init.into());
        self
    }

    pub fn has_annotation(&self, annotation: FieldAnnotation) -> bool {
        self.annotations.contains(&annotation)
    }
}

/// A record (struct) in the API description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub name: SmolStr,
    pub fields: Vec<Field>,
}

impl Record {
    /// True iff every field carries a literal initializer, so the record
    /// lowers to named constants instead of an instantiable type.
    pub fn is_constant_only(&self) -> bool {
        !self.fields.is_empty() && self.fields.iter().all(|f| f.init.is_some())
    }
}

/// One (name, optional literal) entry of an enum or flag-set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumEntry {
    pub name: SmolStr,
    #[serde(default)]
    pub init: Option<String>,
}

/// An enumeration with an optional fixed underlying type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: SmolStr,
    /// Underlying type; its base determines a fixed bit width, if any.
    #[serde(default)]
    pub base: Option<TypeRef>,
    pub entries: Vec<EnumEntry>,
}

impl EnumDef {
    pub fn fixed_bit_width(&self) -> Option<u32> {
        self.base.as_ref().and_then(|b| b.base.fixed_bit_width())
    }
}

/// A bit-flag set. Entries may combine earlier entries bitwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagSet {
    pub name: SmolStr,
    pub entries: Vec<EnumEntry>,
}

impl FlagSet {
    /// The group basename, i.e. the name without a trailing `Flags`.
    pub fn basename(&self) -> &str {
        self.name.strip_suffix("Flags").unwrap_or(self.name.as_str())
    }
}

/// A function parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: SmolStr,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub annotations: Vec<FieldAnnotation>,
}

impl Param {
    pub fn new(name: impl Into<SmolStr>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
        }
    }
}

/// An exported function of the described API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: SmolStr,
    #[serde(rename = "return")]
    pub return_ty: TypeRef,
    pub params: Vec<Param>,
    #[serde(default)]
    pub is_variadic: bool,
}

/// A callback signature (function-pointer type) of the described API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegateDef {
    pub name: SmolStr,
    #[serde(rename = "return")]
    pub return_ty: TypeRef,
    pub params: Vec<Param>,
    #[serde(default)]
    pub is_variadic: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BaseType;

    #[test]
    fn test_constant_only_record() {
        let record = Record {
            name: "ColorMask".into(),
            fields: vec![
                Field::new("red", TypeRef::scalar(BaseType::Uint32)).with_init("0x1"),
                Field::new("green", TypeRef::scalar(BaseType::Uint32)).with_init("0x2"),
            ],
        };
        assert!(record.is_constant_only());
    }

    #[test]
    fn test_common_record_is_not_constant_only() {
        let record = Record {
            name: "Extent2D".into(),
            fields: vec![
                Field::new("width", TypeRef::scalar(BaseType::Uint32)).with_init("0"),
                Field::new("height", TypeRef::scalar(BaseType::Uint32)),
            ],
        };
        assert!(!record.is_constant_only());
    }

    #[test]
    fn test_flag_basename() {
        let flags = FlagSet {
            name: "ClearFlags".into(),
            entries: Vec::new(),
        };
        assert_eq!(flags.basename(), "Clear");

        let flags = FlagSet {
            name: "Misc".into(),
            entries: Vec::new(),
        };
        assert_eq!(flags.basename(), "Misc");
    }
}
