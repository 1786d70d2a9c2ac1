//! ABI-literal, C-like header backend.
//!
//! One call emits one complete output unit for a module: banner, header
//! guard, dependency includes, constants, enumerations, flags, structures,
//! delegate typedefs and function prototypes, all in declaration order.

use std::collections::BTreeSet;

use ffigen_common::{Diagnostic, Result, TranslateError};
use ffigen_ir::{BaseType, Module, Param, Record, Registry};
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::emit::{
    count_field_name, header_guard, Column, DeclRow, Declaration, DeclarationList, EmitOptions,
    Emitter,
};
use crate::init::InitRewriter;
use crate::profile::BackendProfile;
use crate::resolve::TypeResolver;
use crate::Unit;

pub fn translate(module: &Module, registry: &Registry, options: &EmitOptions) -> Result<Unit> {
    let backend = C99Backend {
        e: Emitter::new(options),
        module,
        registry,
        profile: BackendProfile::c99(registry),
        sized_enums: FxHashMap::default(),
        used_names: FxHashSet::default(),
        warnings: Vec::new(),
    };
    backend.run()
}

struct C99Backend<'a> {
    e: Emitter,
    module: &'a Module,
    registry: &'a Registry,
    profile: BackendProfile,
    /// Enum name to fixed bit width, for field bit-size annotations.
    sized_enums: FxHashMap<SmolStr, u32>,
    /// Identifiers already emitted into the unit's flat name space.
    used_names: FxHashSet<String>,
    warnings: Vec<Diagnostic>,
}

impl<'a> C99Backend<'a> {
    fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(&self.profile, self.registry)
    }

    fn rewriter(&self) -> InitRewriter<'_> {
        InitRewriter::new(self.module, self.registry, &self.profile)
    }

    fn run(mut self) -> Result<Unit> {
        self.banner();
        let guard = self.open_header_guard();
        self.includes();
        self.constants();
        self.enums();
        self.flags()?;
        self.structs()?;
        self.delegates();
        self.functions();

        self.e.statement(&format!("#endif /* {} */", guard));
        self.e.blank();
        self.e.blank();
        self.e.blank();
        self.e.statement(
            "/* ================================================================================ */",
        );
        self.e.blank();

        Ok(Unit {
            text: self.e.finish(),
            warnings: self.warnings,
        })
    }

    fn banner(&mut self) {
        let registry = self.registry;
        self.e.statement("/*");
        self.e.statement(&format!(" * {}.h", self.module.name));
        self.e.statement(" *");
        for line in &registry.copyright {
            self.e.statement(&format!(" * {}", line));
        }
        self.e.statement(" */");
        self.e.blank();
        for line in &registry.info {
            self.e.statement(&format!("/* {} */", line));
        }
        self.e.blank();
    }

    fn open_header_guard(&mut self) -> String {
        let guard = format!(
            "{}_C99{}_H",
            self.registry.type_prefix.to_uppercase(),
            header_guard(&self.module.name)
        );
        self.e.statement(&format!("#ifndef {}", guard));
        self.e.statement(&format!("#define {}", guard));
        self.e.blank();
        self.e.blank();
        guard
    }

    fn includes(&mut self) {
        let registry = self.registry;
        let mut std_includes = BTreeSet::new();
        for dep in &self.module.type_deps {
            match dep.base {
                BaseType::Bool => {
                    std_includes.insert("<stdbool.h>");
                }
                b if b.is_sized_integer() => {
                    std_includes.insert("<stdint.h>");
                }
                BaseType::SizeT => {
                    std_includes.insert("<stddef.h>");
                }
                _ => {}
            }
        }

        if std_includes.is_empty() && registry.includes.is_empty() {
            return;
        }
        for inc in &std_includes {
            self.e.statement(&format!("#include {}", inc));
        }
        for inc in &registry.includes {
            self.e.statement(&format!("#include {}", inc));
        }
        for external in &registry.externals {
            if let (Some(cond), Some(include)) = (&external.cond, &external.include) {
                self.e.blank();
                self.e.statement(&format!("#if {}", cond));
                self.e.statement(&format!("#   include {}", include));
                self.e.statement(&format!("#endif /* {} */", cond));
            }
        }
        self.e.blank();
        self.e.blank();
    }

    fn constants(&mut self) {
        let module = self.module;
        let const_structs: Vec<&Record> =
            module.structs.iter().filter(|s| s.is_constant_only()).collect();
        if const_structs.is_empty() {
            return;
        }

        let prefix_upper = self.registry.type_prefix.to_uppercase();
        self.e.statement("/* ----- Constants ----- */");
        self.e.blank();

        for record in const_structs {
            let mut list = DeclarationList::new();
            for field in &record.fields {
                let name = format!(
                    "{}_{}_{}",
                    prefix_upper,
                    record.name.to_uppercase(),
                    field.name.to_uppercase()
                );
                list.push(DeclRow::Field(
                    Declaration::new("", name).with_init(field.init.clone()),
                ));
            }
            for row in list.rows() {
                let Some(decl) = row.decl() else { continue };
                self.e.statement(&format!(
                    "#define {}{} ( {} )",
                    decl.name,
                    list.spaces(Column::Name, &decl.name),
                    decl.init.as_deref().unwrap_or_default()
                ));
            }
            self.e.blank();
        }
        self.e.blank();
    }

    fn enums(&mut self) {
        let module = self.module;
        if module.enums.is_empty() {
            return;
        }
        let prefix = self.registry.type_prefix.clone();

        self.e.statement("/* ----- Enumerations ----- */");
        self.e.blank();

        for def in &module.enums {
            if let Some(bits) = def.fixed_bit_width() {
                self.sized_enums.insert(def.name.clone(), bits);
            }

            self.e.statement(&format!("typedef enum {}{}", prefix, def.name));
            self.e.open_scope();

            let mut list = DeclarationList::new();
            for entry in &def.entries {
                let name = format!("{}{}{}", prefix, def.name, entry.name);
                self.used_names.insert(name.clone());
                list.push(DeclRow::Field(
                    Declaration::new("", name).with_init(entry.init.clone()),
                ));
            }
            self.write_entry_rows(&list);

            self.e.close_scope();
            self.e.statement(&format!("{}{};", prefix, def.name));
            self.e.blank();
        }
        self.e.blank();
    }

    fn flags(&mut self) -> Result<()> {
        let module = self.module;
        if module.flags.is_empty() {
            return Ok(());
        }
        let prefix = self.registry.type_prefix.clone();

        self.e.statement("/* ----- Flags ----- */");
        self.e.blank();

        for flags in &module.flags {
            self.e.statement(&format!("typedef enum {}{}", prefix, flags.name));
            let basename = flags.basename().to_string();
            self.e.open_scope();

            let mut list = DeclarationList::new();
            for entry in &flags.entries {
                let name = format!("{}{}{}", prefix, basename, entry.name);
                if self.registry.is_suppressed_flag_entry(&name) {
                    self.warnings.push(
                        Diagnostic::info(format!(
                            "flag entry '{}' suppressed: the name is owned by another declaration",
                            name
                        )),
                    );
                    continue;
                }
                if !self.used_names.insert(name.clone()) {
                    return Err(TranslateError::FlagNameCollision {
                        name,
                        group: flags.name.to_string(),
                    });
                }
                let init = entry
                    .init
                    .as_deref()
                    .map(|i| self.rewriter().c99_flag_entry(&basename, i));
                list.push(DeclRow::Field(Declaration::new("", name).with_init(init)));
            }
            self.write_entry_rows(&list);

            self.e.close_scope();
            self.e.statement(&format!("{}{};", prefix, flags.name));
            self.e.blank();
        }
        self.e.blank();
        Ok(())
    }

    /// Entry rows of an enum or flag scope, initializers aligned.
    fn write_entry_rows(&mut self, list: &DeclarationList) {
        for row in list.rows() {
            let Some(decl) = row.decl() else { continue };
            if let Some(init) = &decl.init {
                self.e.statement(&format!(
                    "{}{}= {},",
                    decl.name,
                    list.spaces(Column::Name, &decl.name),
                    init
                ));
            } else {
                self.e.statement(&format!("{},", decl.name));
            }
        }
    }

    fn structs(&mut self) -> Result<()> {
        let module = self.module;
        let common: Vec<&Record> = module
            .structs
            .iter()
            .filter(|s| !s.is_constant_only())
            .collect();
        if common.is_empty() {
            return Ok(());
        }
        let prefix = self.registry.type_prefix.clone();

        self.e.statement("/* ----- Structures ----- */");
        self.e.blank();

        for record in common {
            self.e.statement(&format!("typedef struct {}{}", prefix, record.name));
            self.e.open_scope();

            let mut list = DeclarationList::new();
            for field in &record.fields {
                if let Some(cond) = &field.ty.external_cond {
                    list.push(DeclRow::Directive(format!("#if {}", cond)));
                }
                if field.ty.is_dynamic_array() {
                    list.push(DeclRow::Field(
                        Declaration::new(self.profile.count_type, count_field_name(&field.name))
                            .with_init(Some("0".to_string())),
                    ));
                }

                let (ty_text, declarator) =
                    self.resolver()
                        .c99_struct_field(&field.name, &field.ty, &self.sized_enums);
                let init = self.rewriter().c99_field(&field.ty, field.init.as_deref());
                let comment = field.deprecated.as_ref().map(|_| "DEPRECATED".to_string());
                list.push(DeclRow::Field(
                    Declaration::new(ty_text, declarator)
                        .with_init(init)
                        .with_comment(comment),
                ));

                if let Some(cond) = &field.ty.external_cond {
                    list.push(DeclRow::Directive(format!("#endif /* {} */", cond)));
                }
            }

            for row in list.rows() {
                match row {
                    DeclRow::Directive(directive) => self.e.statement(directive),
                    DeclRow::Attribute(_) => {}
                    DeclRow::Field(d) | DeclRow::Unrolled(d) => {
                        if let Some(comment) = &d.comment {
                            self.e.statement(&format!(
                                "{}{}{};{}/* {} */",
                                d.ty,
                                list.spaces(Column::Type, &d.ty),
                                d.name,
                                list.spaces(Column::Name, &d.name),
                                comment
                            ));
                        } else if let Some(init) = &d.init {
                            self.e.statement(&format!(
                                "{}{}{};{}/* = {} */",
                                d.ty,
                                list.spaces(Column::Type, &d.ty),
                                d.name,
                                list.spaces(Column::Name, &d.name),
                                init
                            ));
                        } else {
                            self.e.statement(&format!(
                                "{}{}{};",
                                d.ty,
                                list.spaces(Column::Type, &d.ty),
                                d.name
                            ));
                        }
                    }
                }
            }

            self.e.close_scope();
            self.e.statement(&format!("{}{};", prefix, record.name));
            self.e.blank();
        }
        self.e.blank();
        Ok(())
    }

    fn delegates(&mut self) {
        let module = self.module;
        if module.delegates.is_empty() {
            return;
        }
        self.e.statement("/* ----- Delegates ----- */");
        self.e.blank();
        for delegate in &module.delegates {
            let ret = self.resolver().c99_value_type(&delegate.return_ty);
            let params = self.param_list(&delegate.params, delegate.is_variadic);
            self.e
                .statement(&format!("typedef {} (*{})({});", ret, delegate.name, params));
        }
        self.e.blank();
        self.e.blank();
    }

    fn functions(&mut self) {
        let module = self.module;
        if module.funcs.is_empty() {
            return;
        }
        self.e.statement("/* ----- Functions ----- */");
        self.e.blank();
        for func in &module.funcs {
            let ret = self.resolver().c99_value_type(&func.return_ty);
            let params = self.param_list(&func.params, func.is_variadic);
            self.e
                .statement(&format!("{} {}({});", ret, func.name, params));
        }
        self.e.blank();
        self.e.blank();
    }

    fn param_list(&self, params: &[Param], is_variadic: bool) -> String {
        if params.is_empty() && !is_variadic {
            return "void".to_string();
        }
        let mut s = String::new();
        for param in params {
            if !s.is_empty() {
                s.push_str(", ");
            }
            s.push_str(&self.resolver().c99_value_type(&param.ty));
            s.push(' ');
            s.push_str(&param.name);
        }
        if is_variadic {
            s.push_str(", ...");
        }
        s
    }
}
