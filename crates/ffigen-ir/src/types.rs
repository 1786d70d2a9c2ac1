use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Base types common across all target formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseType {
    Void,
    Bool,
    Char,
    WChar,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Long,
    SizeT,
    Float,
    /// A bare function pointer.
    Func,
    /// A named aggregate: record, enum, flag-set, handle or delegate type.
    /// The name lives in [`TypeRef::name`].
    Record,
}

impl BaseType {
    /// Bit width for types with a fixed, well-known size.
    ///
    /// Used to annotate struct fields of sized enum types in formats whose
    /// enums cannot carry an explicit underlying type.
    pub fn fixed_bit_width(self) -> Option<u32> {
        match self {
            BaseType::Int8 | BaseType::Uint8 => Some(8),
            BaseType::Int16 | BaseType::Uint16 => Some(16),
            BaseType::Int32 | BaseType::Uint32 | BaseType::Long => Some(32),
            BaseType::Int64 | BaseType::Uint64 => Some(64),
            _ => None,
        }
    }

    pub fn is_sized_integer(self) -> bool {
        matches!(
            self,
            BaseType::Int8
                | BaseType::Int16
                | BaseType::Int32
                | BaseType::Int64
                | BaseType::Uint8
                | BaseType::Uint16
                | BaseType::Uint32
                | BaseType::Uint64
        )
    }
}

/// Array shape of a field or parameter type.
///
/// Replaces the usual 0 / N / -1 sentinel encoding with an explicit variant
/// so scalar, fixed and runtime-length cases cannot be confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArraySize {
    #[default]
    Scalar,
    Fixed(u32),
    /// Runtime-length sequence; always lowered to a (count, pointer) pair.
    Dynamic,
}

/// A reference to a type in the API description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub base: BaseType,

    /// Target type name; meaningful when `base` is [`BaseType::Record`]
    /// (or [`BaseType::Func`] referring to a named delegate type).
    #[serde(default)]
    pub name: SmolStr,

    #[serde(default)]
    pub is_pointer: bool,

    #[serde(default)]
    pub is_const: bool,

    #[serde(default)]
    pub array: ArraySize,

    /// Conditional-compilation guard for declarations that only exist for
    /// some build configurations of the described API.
    #[serde(default)]
    pub external_cond: Option<SmolStr>,
}

impl TypeRef {
    pub fn scalar(base: BaseType) -> Self {
        Self {
            base,
            name: SmolStr::default(),
            is_pointer: false,
            is_const: false,
            array: ArraySize::Scalar,
            external_cond: None,
        }
    }

    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self {
            base: BaseType::Record,
            name: name.into(),
            is_pointer: false,
            is_const: false,
            array: ArraySize::Scalar,
            external_cond: None,
        }
    }

    pub fn pointer_to(base: BaseType) -> Self {
        Self {
            is_pointer: true,
            ..Self::scalar(base)
        }
    }

    pub fn is_dynamic_array(&self) -> bool {
        self.array == ArraySize::Dynamic
    }

    pub fn fixed_array_len(&self) -> Option<u32> {
        match self.array {
            ArraySize::Fixed(n) => Some(n),
            _ => None,
        }
    }
}
