//! Integration tests for the ABI-literal header backend.

use ffigen_codegen::{translate_c99, EmitOptions};
use ffigen_common::TranslateError;
use ffigen_ir::{
    ArraySize, BaseType, EnumDef, EnumEntry, Field, FlagSet, FunctionDef, Module, Param, Record,
    Registry, TypeRef,
};

fn registry() -> Registry {
    let mut registry = Registry {
        type_prefix: "XG".into(),
        interfaces: vec!["Resource".into(), "Buffer".into(), "Texture".into()],
        string_types: vec!["Utf8String".into()],
        copyright: vec!["Copyright (c) 2025 Example Authors.".into()],
        info: vec!["AUTO GENERATED CODE - DO NOT EDIT".into()],
        includes: vec!["<XG-C/Types.h>".into()],
        ..Registry::default()
    };
    registry.constants.insert("XG_INVALID_SLOT".into(), -1);
    registry
}

fn translate(module: &Module, registry: &Registry) -> String {
    translate_c99(module, registry, &EmitOptions::default())
        .expect("translation failed")
        .text
}

fn dynamic(name: &str) -> TypeRef {
    TypeRef {
        array: ArraySize::Dynamic,
        ..TypeRef::named(name)
    }
}

#[test]
fn test_translation_is_deterministic() {
    let mut module = Module::new("RenderSystem");
    module.structs.push(Record {
        name: "Extent2D".into(),
        fields: vec![
            Field::new("width", TypeRef::scalar(BaseType::Uint32)),
            Field::new("height", TypeRef::scalar(BaseType::Uint32)),
        ],
    });
    let registry = registry();

    let first = translate(&module, &registry);
    let second = translate(&module, &registry);
    assert_eq!(first, second);
}

#[test]
fn test_banner_and_header_guard() {
    let module = Module::new("RenderSystem");
    let out = translate(&module, &registry());

    assert!(out.starts_with("/*\n * RenderSystem.h\n *\n * Copyright (c) 2025 Example Authors.\n */\n"));
    assert!(out.contains("/* AUTO GENERATED CODE - DO NOT EDIT */"));
    assert!(out.contains("#ifndef XG_C99_RENDER_SYSTEM_H"));
    assert!(out.contains("#define XG_C99_RENDER_SYSTEM_H"));
    assert!(out.contains("#endif /* XG_C99_RENDER_SYSTEM_H */"));
}

#[test]
fn test_includes_derived_from_type_dependencies() {
    let mut module = Module::new("Core");
    module.type_deps.push(TypeRef::scalar(BaseType::Bool));
    module.type_deps.push(TypeRef::scalar(BaseType::Uint32));
    module.type_deps.push(TypeRef::scalar(BaseType::SizeT));
    let out = translate(&module, &registry());

    let stdbool = out.find("#include <stdbool.h>").unwrap();
    let stddef = out.find("#include <stddef.h>").unwrap();
    let stdint = out.find("#include <stdint.h>").unwrap();
    let api = out.find("#include <XG-C/Types.h>").unwrap();
    assert!(stdbool < stddef && stddef < stdint && stdint < api);
}

#[test]
fn test_conditional_external_includes() {
    let module = Module::new("Core");
    let mut registry = registry();
    registry.externals.push(ffigen_ir::ExternalInclude {
        cond: Some("defined XG_OS_LINUX".into()),
        include: Some("<X11/Xlib.h>".into()),
    });
    let out = translate(&module, &registry);

    assert!(out.contains("#if defined XG_OS_LINUX\n#   include <X11/Xlib.h>\n#endif /* defined XG_OS_LINUX */"));
}

#[test]
fn test_struct_block_name_column_alignment() {
    let mut module = Module::new("Core");
    module.structs.push(Record {
        name: "SwapChainDescriptor".into(),
        fields: vec![
            Field::new("width", TypeRef::scalar(BaseType::Uint32)),
            Field::new("label", TypeRef::named("Utf8String")),
            Field::new("samples", TypeRef::scalar(BaseType::Uint32)).with_init("1"),
        ],
    });
    let out = translate(&module, &registry());

    // Longest type text is `const char*` (11 chars); every name starts one
    // column after it.
    assert!(out.contains("    uint32_t    width;\n"));
    assert!(out.contains("    const char* label;\n"));
    assert!(out.contains("    uint32_t    samples; /* = 1 */\n"));
    assert!(out.contains("typedef struct XGSwapChainDescriptor"));
    assert!(out.contains("XGSwapChainDescriptor;"));
}

#[test]
fn test_dynamic_array_lowers_to_count_then_pointer() {
    let mut module = Module::new("Core");
    module.structs.push(Record {
        name: "RenderPassDescriptor".into(),
        fields: vec![Field::new("targets", dynamic("AttachmentDescriptor"))],
    });
    let out = translate(&module, &registry());

    let count = out.find("size_t").expect("count field missing");
    let pointer = out
        .find("const XGAttachmentDescriptor* targets;")
        .expect("pointer field missing");
    assert!(count < pointer, "count must precede the pointer");
    assert!(out.contains("numTargets; /* = 0 */"));
    assert!(out.contains("targets;    /* = NULL */"));
}

#[test]
fn test_fixed_array_of_builtin_stays_inline() {
    let mut module = Module::new("Core");
    module.structs.push(Record {
        name: "ClearValue".into(),
        fields: vec![Field::new(
            "color",
            TypeRef {
                array: ArraySize::Fixed(4),
                ..TypeRef::scalar(BaseType::Float)
            },
        )],
    });
    let out = translate(&module, &registry());

    assert!(out.contains("float color[4];"));
}

#[test]
fn test_constant_only_record_lowers_to_defines() {
    let mut module = Module::new("Core");
    module.structs.push(Record {
        name: "ColorMask".into(),
        fields: vec![
            Field::new("red", TypeRef::scalar(BaseType::Uint32)).with_init("0x1"),
            Field::new("alpha", TypeRef::scalar(BaseType::Uint32)).with_init("0x8"),
        ],
    });
    let out = translate(&module, &registry());

    // Name column width comes from the longest constant name.
    assert!(out.contains("#define XG_COLORMASK_RED    ( 0x1 )"));
    assert!(out.contains("#define XG_COLORMASK_ALPHA  ( 0x8 )"));
    assert!(!out.contains("typedef struct XGColorMask"));
}

#[test]
fn test_sized_enum_field_carries_bit_annotation() {
    let mut module = Module::new("Core");
    module.enums.push(EnumDef {
        name: "Format".into(),
        base: Some(TypeRef::scalar(BaseType::Uint32)),
        entries: vec![
            EnumEntry {
                name: "Undefined".into(),
                init: None,
            },
            EnumEntry {
                name: "RGBA8".into(),
                init: None,
            },
        ],
    });
    module.structs.push(Record {
        name: "TextureDescriptor".into(),
        fields: vec![Field::new("format", TypeRef::named("Format"))],
    });
    let out = translate(&module, &registry());

    assert!(out.contains("typedef enum XGFormat"));
    assert!(out.contains("XGFormatUndefined,"));
    assert!(out.contains("XGFormat format : 32;"));
}

#[test]
fn test_null_handle_initializer_uses_sentinel() {
    let mut module = Module::new("Core");
    module.structs.push(Record {
        name: "BufferViewDescriptor".into(),
        fields: vec![
            Field::new("buffer", TypeRef::named("Buffer")).with_init("nullptr"),
            Field::new("userData", TypeRef::pointer_to(BaseType::Void)).with_init("nullptr"),
        ],
    });
    let out = translate(&module, &registry());

    assert!(out.contains("buffer;   /* = XG_NULL_OBJECT */"));
    assert!(out.contains("userData; /* = NULL */"));
}

#[test]
fn test_flag_entries_rebased_into_group_name_space() {
    let mut module = Module::new("Core");
    module.flags.push(FlagSet {
        name: "ClearFlags".into(),
        entries: vec![
            EnumEntry {
                name: "Color".into(),
                init: Some("(1<<0)".into()),
            },
            EnumEntry {
                name: "Depth".into(),
                init: Some("(1<<1)".into()),
            },
            EnumEntry {
                name: "All".into(),
                init: Some("Color|Depth".into()),
            },
        ],
    });
    let out = translate(&module, &registry());

    assert!(out.contains("typedef enum XGClearFlags"));
    assert!(out.contains("XGClearColor"));
    assert!(out.contains("= (1 << 0),"));
    assert!(out.contains("= XGClearColor | XGClearDepth,"));
}

#[test]
fn test_suppressed_flag_entry_is_dropped_with_notice() {
    let mut module = Module::new("Core");
    module.enums.push(EnumDef {
        name: "CPUAccess".into(),
        base: None,
        entries: vec![
            EnumEntry {
                name: "ReadOnly".into(),
                init: None,
            },
            EnumEntry {
                name: "ReadWrite".into(),
                init: None,
            },
        ],
    });
    module.flags.push(FlagSet {
        name: "CPUAccessFlags".into(),
        entries: vec![
            EnumEntry {
                name: "Read".into(),
                init: Some("(1<<0)".into()),
            },
            EnumEntry {
                name: "ReadWrite".into(),
                init: Some("(1<<0)|(1<<1)".into()),
            },
        ],
    });

    let mut registry = registry();
    registry.suppressed_flag_entries.push("XGCPUAccessReadWrite".into());

    let unit = translate_c99(&module, &registry, &EmitOptions::default()).unwrap();
    // The enum owns the identifier; the flag synonym is dropped once.
    assert_eq!(unit.text.matches("XGCPUAccessReadWrite").count(), 1);
    assert!(unit.text.contains("XGCPUAccessRead"));
    assert!(!unit.warnings.is_empty());
}

#[test]
fn test_uncovered_flag_name_collision_is_fatal() {
    let mut module = Module::new("Core");
    module.enums.push(EnumDef {
        name: "CPUAccess".into(),
        base: None,
        entries: vec![EnumEntry {
            name: "ReadWrite".into(),
            init: None,
        }],
    });
    module.flags.push(FlagSet {
        name: "CPUAccessFlags".into(),
        entries: vec![EnumEntry {
            name: "ReadWrite".into(),
            init: None,
        }],
    });

    let err = translate_c99(&module, &registry(), &EmitOptions::default()).unwrap_err();
    assert!(matches!(err, TranslateError::FlagNameCollision { .. }));
}

#[test]
fn test_conditional_fields_print_guards_at_column_zero() {
    let mut module = Module::new("Core");
    module.structs.push(Record {
        name: "WindowDescriptor".into(),
        fields: vec![
            Field::new("width", TypeRef::scalar(BaseType::Uint32)),
            Field::new(
                "nativeView",
                TypeRef {
                    external_cond: Some("defined XG_OS_MOBILE".into()),
                    is_pointer: true,
                    ..TypeRef::named("NativeViewHandle")
                },
            ),
        ],
    });
    let out = translate(&module, &registry());

    assert!(out.contains("\n#if defined XG_OS_MOBILE\n"));
    assert!(out.contains("\n#endif /* defined XG_OS_MOBILE */\n"));
    // Guarded foreign types keep their own name unprefixed.
    assert!(out.contains("NativeViewHandle*"));
    assert!(!out.contains("XGNativeViewHandle"));
}

#[test]
fn test_functions_and_delegates_emit_prototypes() {
    let mut module = Module::new("Core");
    module.funcs.push(FunctionDef {
        name: "xgCreateBuffer".into(),
        return_ty: TypeRef::named("Buffer"),
        params: vec![Param::new(
            "descriptor",
            TypeRef {
                is_const: true,
                is_pointer: true,
                ..TypeRef::named("BufferDescriptor")
            },
        )],
        is_variadic: false,
    });
    module.funcs.push(FunctionDef {
        name: "xgLogf".into(),
        return_ty: TypeRef::scalar(BaseType::Void),
        params: vec![Param::new("format", TypeRef::named("Utf8String"))],
        is_variadic: true,
    });
    module.delegates.push(ffigen_ir::DelegateDef {
        name: "XG_OnResize".into(),
        return_ty: TypeRef::scalar(BaseType::Void),
        params: vec![
            Param::new("width", TypeRef::scalar(BaseType::Uint32)),
            Param::new("height", TypeRef::scalar(BaseType::Uint32)),
        ],
        is_variadic: false,
    });
    let out = translate(&module, &registry());

    assert!(out.contains("typedef void (*XG_OnResize)(uint32_t width, uint32_t height);"));
    assert!(out.contains("XGBuffer xgCreateBuffer(const XGBufferDescriptor* descriptor);"));
    // Variadic entry points stay expressible in this format.
    assert!(out.contains("void xgLogf(const char* format, ...);"));
}

#[test]
fn test_empty_module_emits_no_sections() {
    let out = translate(&Module::new("Empty"), &registry());

    assert!(!out.contains("----- Constants -----"));
    assert!(!out.contains("----- Enumerations -----"));
    assert!(!out.contains("----- Structures -----"));
    assert!(!out.contains("----- Functions -----"));
}
