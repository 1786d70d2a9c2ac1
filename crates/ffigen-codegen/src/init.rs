//! Literal-initializer rewriting.
//!
//! Source expressions arrive in the notation of the described API: scope
//! tokens (`Scope::Name`), `nullptr`, or-combined flag literals, aggregate
//! brace lists and symbolic constant names. Each backend re-renders them
//! in its own syntax; an aggregate whose arity disagrees with its target
//! record is an authoring defect and aborts the run.

use ffigen_common::{Result, TranslateError};
use ffigen_ir::{Module, Registry, TypeRef};

use crate::emit::pascal_case;
use crate::profile::BackendProfile;

/// Rewrites initializer expressions for one (module, backend) run.
pub struct InitRewriter<'a> {
    module: &'a Module,
    registry: &'a Registry,
    profile: &'a BackendProfile,
}

impl<'a> InitRewriter<'a> {
    pub fn new(module: &'a Module, registry: &'a Registry, profile: &'a BackendProfile) -> Self {
        Self {
            module,
            registry,
            profile,
        }
    }

    /// Translate a struct-field initializer for the C-like format.
    ///
    /// Lowered dynamic arrays always initialize their pointer to null. A
    /// null handle maps to the distinguished null-object sentinel so it
    /// stays a comparable domain value.
    pub fn c99_field(&self, ty: &TypeRef, init: Option<&str>) -> Option<String> {
        if ty.is_dynamic_array() {
            return Some(self.profile.null_literal.to_string());
        }
        let init = init?;
        if init == "nullptr" {
            return Some(if self.registry.is_interface(&ty.name) {
                self.profile.null_handle.clone()
            } else {
                self.profile.null_literal.to_string()
            });
        }
        let mut s = rewrite_scope_tokens(init, self.registry.type_prefix.as_str());
        s = space_bars(&s);
        Some(s.replace("Flags", ""))
    }

    /// Translate a flag-entry initializer for the C-like format: every
    /// identifier is rebased into the group's global name space and the
    /// bitwise operators are spaced out.
    pub fn c99_flag_entry(&self, basename: &str, init: &str) -> String {
        let prefix = format!("{}{}", self.registry.type_prefix, basename);
        prefix_identifiers_and_space(init, &prefix)
    }

    /// Translate a flag-entry initializer for the managed format.
    pub fn managed_flag_entry(&self, init: &str) -> String {
        prefix_identifiers_and_space(init, "")
    }

    /// Translate an initializer for the managed format.
    ///
    /// `target_ty` is the resolved managed type text of the destination.
    /// `is_param_list` applies the stricter rules of default arguments:
    /// value-record parameters get no default at all, and anything without
    /// a compile-time representation defaults to null.
    pub fn managed(
        &self,
        init: Option<&str>,
        target_ty: &str,
        is_param_list: bool,
    ) -> Result<Option<String>> {
        if is_param_list && self.registry.value_records.contains_key(target_ty) {
            return Ok(None);
        }

        let Some(init) = init else {
            if is_param_list {
                return Ok(Some("null".to_string()));
            }
            if let Some(record) = self.module.find_struct(target_ty) {
                return Ok(Some(format!("new {}()", record.name)));
            }
            return Ok(None);
        };

        let mut s = init.replace("::", ".");
        s = s.replace("nullptr", "null");
        s = space_bars(&s);

        if s == "null" && !is_param_list && self.registry.is_interface(target_ty) {
            // Null handle: a default-constructed wrapper, not the absence
            // of a reference.
            return Ok(Some(format!("new {}()", target_ty)));
        }

        if s.starts_with('{') && s.ends_with('}') {
            if is_param_list {
                return Ok(Some("null".to_string()));
            }
            return self.aggregate_to_named_fields(&s, target_ty).map(Some);
        }

        if let Some(&value) = self.registry.constants.get(s.as_str()) {
            return Ok(Some(render_constant(value, target_ty)));
        }

        Ok(Some(s))
    }

    /// Re-emit a positional aggregate list as named field-initializer
    /// syntax, matching sub-expressions against the target record's field
    /// order.
    fn aggregate_to_named_fields(&self, init: &str, target_ty: &str) -> Result<String> {
        let record = self
            .module
            .find_struct(target_ty)
            .ok_or_else(|| TranslateError::UnknownRecord(target_ty.to_string()))?;

        let inner = &init[1..init.len() - 1];
        let exprs: Vec<&str> = inner.split(',').map(str::trim).collect();
        if exprs.len() != record.fields.len() {
            return Err(TranslateError::InitializerArity {
                record: record.name.to_string(),
                exprs: exprs.len(),
                fields: record.fields.len(),
            });
        }

        let mut body = String::new();
        for (field, expr) in record.fields.iter().zip(&exprs) {
            if !body.is_empty() {
                body.push_str(", ");
            }
            body.push_str(&pascal_case(&field.name));
            body.push_str(" = ");
            body.push_str(expr);
        }
        Ok(format!("new {}() {{ {} }}", target_ty, body))
    }
}

/// Bit width of an unsigned managed destination type, if fixed.
fn unsigned_bit_width(ty: &str) -> Option<u32> {
    match ty {
        "byte" => Some(8),
        "ushort" => Some(16),
        "uint" => Some(32),
        "ulong" => Some(64),
        _ => None,
    }
}

/// Render a symbolic-constant value for a destination type, re-biasing
/// negative values into the unsigned representation of the destination
/// bit width by two's-complement wraparound.
fn render_constant(value: i128, target_ty: &str) -> String {
    let value = if value < 0 {
        match unsigned_bit_width(target_ty) {
            Some(bits) => (1i128 << bits) + value,
            None => return format!("({}){}", target_ty, value),
        }
    } else {
        value
    };
    format!("({})0x{:X}", target_ty, value)
}

/// Space out or-combined flag literals: `A|B` becomes `A | B`.
fn space_bars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch == '|' {
            if !out.ends_with(' ') {
                out.push(' ');
            }
            out.push('|');
            out.push(' ');
        } else if ch == ' ' && out.ends_with("| ") {
            // already spaced
        } else {
            out.push(ch);
        }
    }
    out
}

/// Rewrite qualified scope tokens: each `Scope::` turns into the reserved
/// prefix glued onto the scoped name.
fn rewrite_scope_tokens(init: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(init.len() + prefix.len());
    let chars: Vec<char> = init.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_ident_start(c) && !prev_is_ident(&chars, i) {
            let start = i;
            while i < chars.len() && is_ident_continue(chars[i]) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            if chars.get(i) == Some(&':') && chars.get(i + 1) == Some(&':') {
                out.push_str(prefix);
                out.push_str(&word);
                i += 2;
            } else {
                out.push_str(&word);
            }
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

/// Prefix every identifier with `prefix` and space out the bitwise and
/// arithmetic operators.
fn prefix_identifiers_and_space(init: &str, prefix: &str) -> String {
    let chars: Vec<char> = init.chars().collect();
    let mut out = String::with_capacity(init.len() + prefix.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_ident_start(c) && !prev_is_ident(&chars, i) {
            let start = i;
            while i < chars.len() && is_ident_continue(chars[i]) {
                i += 1;
            }
            out.push_str(prefix);
            for ch in &chars[start..i] {
                out.push(*ch);
            }
        } else if matches!(c, '|' | '+' | '-' | '*' | '/') {
            push_spaced(&mut out, &chars, &mut i, 1);
        } else if c == '<' && chars.get(i + 1) == Some(&'<') {
            push_spaced(&mut out, &chars, &mut i, 2);
        } else if c == '>' && chars.get(i + 1) == Some(&'>') {
            push_spaced(&mut out, &chars, &mut i, 2);
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

fn push_spaced(out: &mut String, chars: &[char], i: &mut usize, len: usize) {
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
    for k in 0..len {
        out.push(chars[*i + k]);
    }
    *i += len;
    if chars.get(*i) != Some(&' ') {
        out.push(' ');
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn prev_is_ident(chars: &[char], i: usize) -> bool {
    i > 0 && is_ident_continue(chars[i - 1])
}
