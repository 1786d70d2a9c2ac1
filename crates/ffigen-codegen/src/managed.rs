//! Managed-style interop binding backend.
//!
//! Emits one namespace per module: constants, enumerations, flags, the
//! ergonomic record surface (value records and class records with native
//! conversion), then the native interop class holding handle structs,
//! ABI-literal record mirrors, delegates and entry points.
//!
//! Records listed in the registry's surface tables get the paired
//! representation: an accessor-based ergonomic form that owns dynamic
//! collections safely, an ABI-literal form with raw pointer fields, and
//! bidirectional conversion bodies between the two.

use ffigen_common::{Diagnostic, Result, TranslateError};
use ffigen_ir::{Module, Param, Record, Registry, SurfaceOptions};

use crate::emit::{
    count_field_name, pascal_case, Column, DeclRow, Declaration, DeclarationList, EmitOptions,
    Emitter,
};
use crate::handles;
use crate::init::InitRewriter;
use crate::profile::BackendProfile;
use crate::resolve::{Marshal, TypeResolver};
use crate::Unit;

pub fn translate(module: &Module, registry: &Registry, options: &EmitOptions) -> Result<Unit> {
    let backend = ManagedBackend {
        e: Emitter::new(options),
        module,
        registry,
        profile: BackendProfile::managed(registry),
        warnings: Vec::new(),
    };
    backend.run()
}

struct ManagedBackend<'a> {
    e: Emitter,
    module: &'a Module,
    registry: &'a Registry,
    profile: BackendProfile,
    warnings: Vec<Diagnostic>,
}

impl<'a> ManagedBackend<'a> {
    fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(&self.profile, self.registry)
    }

    fn rewriter(&self) -> InitRewriter<'_> {
        InitRewriter::new(self.module, self.registry, &self.profile)
    }

    fn native_class(&self) -> String {
        format!("Native{}", self.registry.type_prefix)
    }

    fn run(mut self) -> Result<Unit> {
        self.banner();

        self.e.statement(&format!("namespace {}", self.registry.type_prefix));
        self.e.open_scope();

        self.constants()?;
        self.enums();
        self.flags();
        self.ergonomic_records()?;
        self.native_interop()?;

        self.e.close_scope();
        self.e.blank();
        self.e.blank();
        self.e.blank();
        self.e.blank();
        self.e.statement(
            "// ================================================================================",
        );

        Ok(Unit {
            text: self.e.finish(),
            warnings: self.warnings,
        })
    }

    fn banner(&mut self) {
        let registry = self.registry;
        self.e.statement("/*");
        self.e.statement(&format!(" * {}.cs", self.module.name));
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
        self.e.statement("using System;");
        self.e.statement("using System.Text;");
        self.e.statement("using System.Runtime.InteropServices;");
        self.e.blank();
    }

    /// Constant-only records lower to one named constant per field, scoped
    /// by the record name; no instantiable type is emitted for them.
    fn constants(&mut self) -> Result<()> {
        let module = self.module;
        let const_structs: Vec<&Record> =
            module.structs.iter().filter(|s| s.is_constant_only()).collect();
        if const_structs.is_empty() {
            return Ok(());
        }

        self.e.statement("/* ----- Constants ----- */");
        self.e.blank();

        for record in const_structs {
            self.e.statement(&format!("public enum {} : int", record.name));
            self.e.open_scope();

            let mut list = DeclarationList::new();
            for field in &record.fields {
                list.push(DeclRow::Field(
                    Declaration::new("", field.name.as_str()).with_init(field.init.clone()),
                ));
            }
            for row in list.rows() {
                let Some(decl) = row.decl() else { continue };
                self.e.statement(&format!(
                    "{}{} = {},",
                    decl.name,
                    list.spaces(Column::Name, &decl.name),
                    decl.init.as_deref().unwrap_or_default()
                ));
            }

            self.e.close_scope();
            self.e.blank();
        }
        self.e.blank();
        Ok(())
    }

    fn enums(&mut self) {
        let module = self.module;
        if module.enums.is_empty() {
            return;
        }
        self.e.statement("/* ----- Enumerations ----- */");
        self.e.blank();

        for def in &module.enums {
            self.e.statement(&format!("public enum {}", def.name));
            self.e.open_scope();

            let mut list = DeclarationList::new();
            for entry in &def.entries {
                list.push(DeclRow::Field(
                    Declaration::new("", entry.name.as_str()).with_init(entry.init.clone()),
                ));
            }
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

            self.e.close_scope();
            self.e.blank();
        }
        self.e.blank();
    }

    fn flags(&mut self) {
        let module = self.module;
        if module.flags.is_empty() {
            return;
        }
        self.e.statement("/* ----- Flags ----- */");
        self.e.blank();

        for flags in &module.flags {
            self.e.statement("[Flags]");
            self.e.statement(&format!("public enum {} : uint", flags.name));
            self.e.open_scope();

            let mut list = DeclarationList::new();
            for entry in &flags.entries {
                let init = entry
                    .init
                    .as_deref()
                    .map(|i| self.rewriter().managed_flag_entry(i));
                list.push(DeclRow::Field(
                    Declaration::new("", entry.name.as_str()).with_init(init),
                ));
            }
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

            self.e.close_scope();
            self.e.blank();
        }
        self.e.blank();
    }

    /// The ergonomic record surface: value records first, then class
    /// records with native conversion, both in declaration order.
    fn ergonomic_records(&mut self) -> Result<()> {
        let module = self.module;
        let common: Vec<&Record> = module
            .structs
            .iter()
            .filter(|s| !s.is_constant_only())
            .collect();
        if common.is_empty() {
            return Ok(());
        }

        self.e.statement("/* ----- Structures ----- */");
        self.e.blank();
        for record in &common {
            if self.registry.value_records.contains_key(record.name.as_str()) {
                self.write_record(record, None, None, true)?;
            }
        }
        self.e.blank();

        self.e.statement("/* ----- Classes ----- */");
        self.e.blank();
        for record in &common {
            if let Some(options) = self.registry.class_records.get(record.name.as_str()).copied() {
                self.write_record(record, None, Some(options), true)?;
            }
        }
        self.e.blank();
        Ok(())
    }

    fn native_interop(&mut self) -> Result<()> {
        let module = self.module;
        let native_class = self.native_class();
        let dll = self.registry.type_prefix.clone();

        self.e.statement(&format!("internal static class {}", native_class));
        self.e.open_scope();

        self.e.statement("#if DEBUG");
        self.e.statement(&format!("const string DllName = \"{}D\";", dll));
        self.e.statement("#else");
        self.e.statement(&format!("const string DllName = \"{}\";", dll));
        self.e.statement("#endif");
        self.e.blank();
        self.e.statement("#pragma warning disable 0649 // Disable warning about unused fields");
        self.e.blank();

        handles::write_handles(&mut self.e, self.registry);

        let common: Vec<&Record> = module
            .structs
            .iter()
            .filter(|s| !s.is_constant_only())
            .collect();
        if !common.is_empty() {
            self.e.statement("/* ----- Native structures ----- */");
            self.e.blank();
            for record in &common {
                if !self.registry.value_records.contains_key(record.name.as_str()) {
                    self.write_record(record, Some("unsafe"), None, false)?;
                }
            }
            self.e.blank();
        }

        self.delegates();
        self.functions();

        self.e.statement("#pragma warning restore 0649 // Restore warning about unused fields");
        self.e.blank();

        self.e.close_scope();
        Ok(())
    }

    fn delegates(&mut self) {
        let module = self.module;
        if module.delegates.is_empty() {
            return;
        }
        self.e.statement("/* ----- Native delegates ----- */");
        self.e.blank();

        for delegate in &module.delegates {
            self.e
                .statement("[UnmanagedFunctionPointer(CallingConvention.Cdecl)]");

            let ret = self.resolver().managed_decl("", &delegate.return_ty, &[], false);
            if let Some(attr) = ret.marshal.filter(|m| *m != Marshal::Ref).and_then(Marshal::attribute)
            {
                self.e.statement(&format!("[return: {}]", attr));
            }

            let name = delegate
                .name
                .strip_prefix(self.registry.delegate_prefix.as_str())
                .unwrap_or(delegate.name.as_str());
            self.e.statement(&format!(
                "public unsafe delegate {} {}Delegate({});",
                ret.ty,
                name,
                self.param_list(&delegate.params)
            ));
            self.e.blank();
        }
        self.e.blank();
    }

    fn functions(&mut self) {
        let module = self.module;
        if module.funcs.is_empty() {
            return;
        }
        self.e.statement("/* ----- Native functions ----- */");
        self.e.blank();

        for func in &module.funcs {
            if func.is_variadic {
                // Omission is safe where a silent mis-translation would
                // not be; skip the declaration and make it visible.
                tracing::warn!(function = %func.name, "skipping variadic function");
                self.warnings.push(
                    Diagnostic::warning(format!(
                        "skipped variadic function '{}'",
                        func.name
                    ))
                    .with_help("variadic entry points have no managed projection"),
                );
                continue;
            }

            self.e.statement(&format!(
                "[DllImport(DllName, EntryPoint=\"{}\", CallingConvention=CallingConvention.Cdecl)]",
                func.name
            ));

            let ret = self.resolver().managed_decl("", &func.return_ty, &[], false);
            if let Some(attr) = ret.marshal.filter(|m| *m != Marshal::Ref).and_then(Marshal::attribute)
            {
                self.e.statement(&format!("[return: {}]", attr));
            }

            let name = func
                .name
                .strip_prefix(self.registry.func_prefix.as_str())
                .unwrap_or(func.name.as_str());
            self.e.statement(&format!(
                "public static extern unsafe {} {}({});",
                ret.ty,
                name,
                self.param_list(&func.params)
            ));
            self.e.blank();
        }
    }

    fn param_list(&self, params: &[Param]) -> String {
        let mut s = String::new();
        for param in params {
            if !s.is_empty() {
                s.push_str(", ");
            }
            let decl = self
                .resolver()
                .managed_decl(&param.name, &param.ty, &param.annotations, false);
            if let Some(marshal) = decl.marshal {
                if marshal == Marshal::Ref {
                    s.push_str("ref ");
                } else if let Some(attr) = marshal.attribute() {
                    s.push_str(&format!("[{}] ", attr));
                }
            }
            s.push_str(&decl.ty);
            s.push(' ');
            s.push_str(&decl.ident);
        }
        s
    }

    /// Map a resolved ABI field type to its ergonomic property type.
    fn property_type(&self, ty: &str, prop_name: &str, class_name: &str) -> String {
        if let Some(element) = ty.strip_suffix('*') {
            if ty == "byte*" {
                return "string".to_string();
            }
            return format!("{}[]", element);
        }
        // Lengths surface as a plain signed count.
        if ty == "UIntPtr" {
            return "int".to_string();
        }
        if prop_name == "Flags" {
            let flags_name = class_to_flags_name(class_name);
            if let Some(flags) = self.module.find_flags(&flags_name) {
                return flags.name.to_string();
            }
        }
        if prop_name.ends_with("Flags")
            || self.registry.flag_properties.iter().any(|p| p == prop_name)
        {
            if let Some(flags) = self.module.find_flags(prop_name) {
                return flags.name.to_string();
            }
            if let Some(known) = self.registry.struct_flags.get(class_name) {
                return known.to_string();
            }
        }
        ty.to_string()
    }

    fn is_safe_type(&self, name: &str) -> bool {
        self.registry.value_records.contains_key(name)
            || self.module.find_enum(name).is_some()
            || self.module.find_flags(name).is_some()
    }

    fn needs_native_conversion(&self, ty: &str) -> bool {
        (self.registry.is_interface(ty) || self.module.find_struct(ty).is_some())
            && !self.registry.value_records.contains_key(ty)
    }

    /// Build the declaration rows of one record block.
    fn record_rows(&self, record: &Record, managed: bool, as_properties: bool) -> DeclarationList {
        let mut rows = DeclarationList::new();
        for field in &record.fields {
            if field.ty.external_cond.is_some() {
                continue;
            }

            if field.ty.is_dynamic_array() && !managed {
                rows.push(DeclRow::Field(Declaration::new(
                    self.profile.count_type,
                    count_field_name(&field.name),
                )));
            }

            if let Some(msg) = &field.deprecated {
                rows.push(DeclRow::Attribute(format!(
                    "Obsolete({})",
                    msg.replace("::", ".")
                )));
            }

            let resolved = self
                .resolver()
                .managed_decl(&field.name, &field.ty, &field.annotations, true);
            let decl_name = if as_properties {
                pascal_case(&resolved.ident)
            } else {
                resolved.ident.clone()
            };

            if managed {
                let prop_ty = self.property_type(&resolved.ty, &decl_name, &record.name);
                rows.push(DeclRow::Field(Declaration {
                    ty: prop_ty,
                    original_ty: resolved.ty.clone(),
                    name: decl_name,
                    original_name: resolved.ident.clone(),
                    init: field.init.clone(),
                    comment: None,
                    deprecated: field.deprecated.is_some(),
                }));
            } else if resolved.marshal == Some(Marshal::Unroll) {
                let n = field.ty.fixed_array_len().unwrap_or(0);
                for index in 0..n {
                    rows.push(DeclRow::Unrolled(Declaration {
                        ty: resolved.ty.clone(),
                        original_ty: resolved.ty.clone(),
                        name: format!("{}{}", decl_name, index),
                        original_name: resolved.ident.clone(),
                        init: if field.deprecated.is_none() {
                            field.init.clone()
                        } else {
                            None
                        },
                        comment: None,
                        deprecated: field.deprecated.is_some(),
                    }));
                }
            } else {
                if let Some(attr) = resolved.marshal.and_then(Marshal::attribute) {
                    rows.push(DeclRow::Attribute(attr.to_string()));
                }
                rows.push(DeclRow::Field(Declaration {
                    ty: resolved.ty.clone(),
                    original_ty: resolved.ty.clone(),
                    name: decl_name,
                    original_name: resolved.ident.clone(),
                    init: if field.deprecated.is_none() {
                        field.init.clone()
                    } else {
                        None
                    },
                    comment: None,
                    deprecated: field.deprecated.is_some(),
                }));
            }
        }
        rows
    }

    /// Emit one record declaration: either an ABI-literal struct or the
    /// ergonomic half of a managed/native pair.
    fn write_record(
        &mut self,
        record: &Record,
        modifier: Option<&str>,
        managed: Option<SurfaceOptions>,
        as_properties: bool,
    ) -> Result<()> {
        let kind = if managed.is_some() { "class" } else { "struct" };
        let modifier = modifier.map(|m| format!("{} ", m)).unwrap_or_default();
        self.e
            .statement(&format!("public {}{} {}", modifier, kind, record.name));
        self.e.open_scope();

        let rows = self.record_rows(record, managed.is_some(), as_properties);
        let has_unsafe = managed.is_some()
            && rows
                .rows()
                .iter()
                .filter_map(DeclRow::decl)
                .any(|d| d.original_ty.ends_with('*'));

        if as_properties {
            if let Some(options) = self.registry.surface_options(&record.name) {
                if options.full_ctor {
                    self.write_full_ctor(record, &rows)?;
                }
            }
        }

        for row in rows.rows() {
            match row {
                DeclRow::Directive(d) => self.e.statement(d),
                DeclRow::Attribute(a) => self.e.statement(&format!("[{}]", a)),
                DeclRow::Field(d) | DeclRow::Unrolled(d) => {
                    if managed.is_some() && d.original_ty.ends_with('*') {
                        if d.original_ty == "byte*" {
                            self.write_string_property(d);
                        } else {
                            self.write_array_property(d, &rows);
                        }
                    } else {
                        self.write_plain_declaration(d, &rows, managed.is_some(), as_properties)?;
                    }
                }
            }
        }

        if let Some(options) = managed {
            self.write_native_conversion(record, &rows, options, has_unsafe);
        }

        self.e.close_scope();
        self.e.blank();
        Ok(())
    }

    /// Full-field constructor with translated default arguments.
    /// Deprecated fields never participate.
    fn write_full_ctor(&mut self, record: &Record, rows: &DeclarationList) -> Result<()> {
        let mut param_list = String::new();
        let mut has_no_default = false;
        let mut defaults_started = false;

        for row in rows.rows() {
            let Some(decl) = row.decl() else { continue };
            if decl.deprecated {
                continue;
            }
            if !param_list.is_empty() {
                param_list.push_str(", ");
            }
            param_list.push_str(&format!("{} {}", decl.ty, decl.original_name));

            let default = self.rewriter().managed(decl.init.as_deref(), &decl.ty, true)?;
            if let Some(default) = default {
                defaults_started = true;
                param_list.push_str(&format!(" = {}", default));
            } else {
                has_no_default = true;
                if defaults_started {
                    return Err(TranslateError::DefaultArgumentGap {
                        param: decl.original_name.clone(),
                        record: record.name.to_string(),
                    });
                }
            }
        }

        if has_no_default && !param_list.is_empty() {
            self.e.statement(&format!("public {}() {{ }}", record.name));
        }

        self.e.statement(&format!("public {}({})", record.name, param_list));
        self.e.open_scope();
        for row in rows.rows() {
            let Some(decl) = row.decl() else { continue };
            if decl.deprecated {
                continue;
            }
            self.e.statement(&format!(
                "{}{}= {};",
                decl.name,
                rows.spaces(Column::Name, &decl.name),
                decl.original_name
            ));
        }
        self.e.close_scope();
        self.e.blank();
        Ok(())
    }

    /// A scalar field, inline array slot or auto property.
    fn write_plain_declaration(
        &mut self,
        decl: &Declaration,
        rows: &DeclarationList,
        managed: bool,
        as_properties: bool,
    ) -> Result<()> {
        let mut stmt = format!(
            "public {}{}{}",
            decl.ty,
            rows.spaces(Column::Type, &decl.ty),
            decl.name
        );
        if as_properties {
            stmt.push_str(" { get; set; }");
            if let Some(init) = self.rewriter().managed(decl.init.as_deref(), &decl.ty, false)? {
                stmt.push_str(&rows.spaces(Column::Name, &decl.name));
                if managed {
                    stmt.push_str(&format!("= {};", init));
                } else {
                    stmt.push_str(&format!("/* = {} */", init));
                }
            }
        } else {
            stmt.push(';');
            if decl.init.is_some() {
                if let Some(init) = self.rewriter().managed(decl.init.as_deref(), &decl.ty, false)? {
                    stmt.push_str(&rows.spaces(Column::Name, &decl.name));
                    stmt.push_str(&format!("/* = {} */", init));
                }
            }
        }
        self.e.statement(&stmt);
        Ok(())
    }

    /// String duality: the ergonomic property keeps a private ASCII
    /// backing array that conversion pins into the native field.
    fn write_string_property(&mut self, decl: &Declaration) {
        let orig = &decl.original_name;
        self.e.statement(&format!("private string {};", orig));
        self.e.statement(&format!("private byte[] {}Ascii;", orig));
        self.e.statement(&format!("public string {}", decl.name));
        self.e.open_scope();

        self.e.statement("get");
        self.e.open_scope();
        self.e.statement(&format!("return {};", orig));
        self.e.close_scope();

        self.e.statement("set");
        self.e.open_scope();
        self.e.statement(&format!("{} = value;", orig));
        self.e.statement(&format!(
            "{}Ascii = Encoding.ASCII.GetBytes({} + \"\\0\");",
            orig, orig
        ));
        self.e.close_scope();

        self.e.close_scope();
    }

    /// Array duality: safe element types surface as an auto property;
    /// everything else keeps a private native mirror updated on set.
    fn write_array_property(&mut self, decl: &Declaration, rows: &DeclarationList) {
        let element = decl.ty.strip_suffix("[]").unwrap_or(&decl.ty);
        if self.is_safe_type(element) {
            self.e.statement(&format!(
                "public {}{}{} {{ get; set; }}",
                decl.ty,
                rows.spaces(Column::Type, &decl.ty),
                decl.name
            ));
            return;
        }

        let orig = &decl.original_name;
        let native_element = format!(
            "{}.{}",
            self.native_class(),
            decl.original_ty.strip_suffix('*').unwrap_or(&decl.original_ty)
        );

        self.e.statement(&format!("private {} {};", decl.ty, orig));
        self.e
            .statement(&format!("private {}[] {}Native;", native_element, orig));
        self.e.statement(&format!("public {} {}", decl.ty, decl.name));
        self.e.open_scope();

        self.e.statement("get");
        self.e.open_scope();
        self.e.statement(&format!("return {};", orig));
        self.e.close_scope();

        self.e.statement("set");
        self.e.open_scope();
        self.e.statement("if (value != null)");
        self.e.open_scope();
        self.e.statement(&format!("{} = value;", orig));
        self.e.statement(&format!(
            "{}Native = new {}[{}.Length];",
            orig, native_element, orig
        ));
        self.e.statement(&format!(
            "for (int {0}Index = 0; {0}Index < {0}.Length; ++{0}Index)",
            orig
        ));
        self.e.open_scope();
        self.e
            .statement(&format!("{0}Native[{0}Index] = {0}[{0}Index].Native;", orig));
        self.e.close_scope();
        self.e.close_scope();
        self.e.statement("else");
        self.e.open_scope();
        self.e.statement(&format!("{} = null;", orig));
        self.e.statement(&format!("{}Native = null;", orig));
        self.e.close_scope();
        self.e.close_scope();

        self.e.close_scope();
    }

    /// Bidirectional conversion between the ergonomic and ABI-literal
    /// representations. Deprecated fields take part in neither direction.
    fn write_native_conversion(
        &mut self,
        record: &Record,
        rows: &DeclarationList,
        options: SurfaceOptions,
        has_unsafe: bool,
    ) {
        let native_class = self.native_class();

        if options.setter {
            self.e.blank();
            self.e.statement(&format!("public {}() {{ }}", record.name));
            self.e.blank();
            self.e.statement(&format!(
                "internal {}({}.{} native)",
                record.name, native_class, record.name
            ));
            self.e.open_scope();
            self.e.statement("Native = native;");
            self.e.close_scope();
        }

        self.e.blank();
        self.e.statement(&format!(
            "internal {}.{} Native",
            native_class, record.name
        ));
        self.e.open_scope();

        if options.getter {
            self.write_native_getter(record, rows, has_unsafe, &native_class);
        }
        if options.setter {
            self.write_native_setter(rows);
        }

        self.e.close_scope();
    }

    /// Ergonomic-to-ABI direction: pin dynamic collections into (count,
    /// pointer) pairs, convert nested aggregates through their own native
    /// form, copy handles and scalars directly.
    fn write_native_getter(
        &mut self,
        record: &Record,
        rows: &DeclarationList,
        has_unsafe: bool,
        native_class: &str,
    ) {
        self.e.statement("get");
        self.e.open_scope();
        self.e
            .statement(&format!("var native = new {}.{}();", native_class, record.name));

        if has_unsafe {
            self.e.statement("unsafe");
            self.e.open_scope();
        }

        for row in rows.rows() {
            let Some(decl) = row.decl() else { continue };
            if decl.ty.is_empty() || decl.deprecated {
                continue;
            }

            if decl.original_ty.ends_with('*') {
                let orig = &decl.original_name;
                if decl.original_ty == "byte*" {
                    self.e
                        .statement(&format!("fixed (byte* {0}Ptr = {0}Ascii)", orig));
                    self.e.open_scope();
                    self.e.statement(&format!("native.{0} = {0}Ptr;", orig));
                    self.e.close_scope();
                } else {
                    let element = decl.ty.strip_suffix("[]").unwrap_or(&decl.ty);
                    let count = count_field_name(orig);
                    if self.registry.value_records.contains_key(element) {
                        self.e.statement(&format!("if ({} != null)", decl.name));
                        self.e.open_scope();
                        self.e.statement(&format!(
                            "native.{} = (UIntPtr){}.Length;",
                            count, decl.name
                        ));
                        self.e.statement(&format!(
                            "fixed ({} {}Ptr = {})",
                            decl.original_ty, orig, decl.name
                        ));
                        self.e.open_scope();
                        self.e.statement(&format!("native.{0} = {0}Ptr;", orig));
                        self.e.close_scope();
                        self.e.close_scope();
                    } else {
                        self.e.statement(&format!("if ({} != null)", orig));
                        self.e.open_scope();
                        self.e
                            .statement(&format!("native.{} = (UIntPtr){}.Length;", count, orig));
                        self.e.statement(&format!(
                            "fixed ({}.{} {}Ptr = {}Native)",
                            native_class, decl.original_ty, orig, orig
                        ));
                        self.e.open_scope();
                        self.e.statement(&format!("native.{0} = {0}Ptr;", orig));
                        self.e.close_scope();
                        self.e.close_scope();
                    }
                }
            } else if self.needs_native_conversion(&decl.ty) {
                self.e.statement(&format!("if ({} != null)", decl.name));
                self.e.open_scope();
                let value = if decl.ty != decl.original_ty {
                    format!("({}){}", decl.original_ty, decl.name)
                } else {
                    decl.name.clone()
                };
                self.e.statement(&format!(
                    "native.{} = {}.Native;",
                    decl.original_name, value
                ));
                self.e.close_scope();
            } else {
                let value = if decl.ty != decl.original_ty {
                    format!("({}){}", decl.original_ty, decl.name)
                } else {
                    decl.name.clone()
                };
                self.e.statement(&format!(
                    "native.{}{}= {};",
                    decl.original_name,
                    rows.spaces(Column::Name, &decl.name),
                    value
                ));
            }
        }

        if has_unsafe {
            self.e.close_scope();
        }

        self.e.statement("return native;");
        self.e.close_scope();
    }

    /// ABI-to-ergonomic direction, omitted for pointer-backed fields whose
    /// ergonomic form owns the storage.
    fn write_native_setter(&mut self, rows: &DeclarationList) {
        self.e.statement("set");
        self.e.open_scope();

        for row in rows.rows() {
            let Some(decl) = row.decl() else { continue };
            if decl.ty.is_empty() || decl.deprecated || decl.original_ty.ends_with('*') {
                continue;
            }

            let mut target = decl.name.clone();
            if self.needs_native_conversion(&decl.ty) {
                target.push_str(".Native");
            }
            let value = if decl.ty != decl.original_ty {
                format!("({})value.{}", decl.ty, decl.original_name)
            } else {
                format!("value.{}", decl.original_name)
            };
            self.e.statement(&format!(
                "{}{}= {};",
                target,
                rows.spaces(Column::Name, &target),
                value
            ));
        }

        self.e.close_scope();
    }
}

/// Flag-set name conventionally owned by a record: `FooDescriptor`
/// looks up `FooFlags`.
fn class_to_flags_name(class_name: &str) -> String {
    let base = class_name.strip_suffix("Descriptor").unwrap_or(class_name);
    format!("{}Flags", base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_to_flags_name() {
        assert_eq!(class_to_flags_name("CommandBufferDescriptor"), "CommandBufferFlags");
        assert_eq!(class_to_flags_name("BindingSlot"), "BindingSlotFlags");
    }
}
