//! Indentation-aware output buffer and the column-aligned declaration list.
//!
//! Every translation run owns one [`Emitter`]; nothing here is global, so
//! independent runs can execute concurrently without interference.

/// Per-run formatting configuration.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    pub tab_size: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self { tab_size: 4 }
    }
}

/// Output buffer with scope-based indentation.
///
/// Blank lines and `#`-directive lines always print at column 0 regardless
/// of the current depth.
#[derive(Debug)]
pub struct Emitter {
    out: String,
    indent: usize,
    tab_size: usize,
}

impl Emitter {
    pub fn new(options: &EmitOptions) -> Self {
        Self {
            out: String::new(),
            indent: 0,
            tab_size: options.tab_size,
        }
    }

    pub fn statement(&mut self, line: &str) {
        if line.is_empty() {
            self.out.push('\n');
        } else if line.starts_with('#') {
            self.out.push_str(line);
            self.out.push('\n');
        } else {
            for _ in 0..self.indent * self.tab_size {
                self.out.push(' ');
            }
            self.out.push_str(line);
            self.out.push('\n');
        }
    }

    pub fn blank(&mut self) {
        self.statement("");
    }

    pub fn open_scope(&mut self) {
        self.open_scope_with("{");
    }

    pub fn open_scope_with(&mut self, stmt: &str) {
        self.statement(stmt);
        self.indent += 1;
    }

    pub fn close_scope(&mut self) {
        self.close_scope_with("}");
    }

    pub fn close_scope_with(&mut self, stmt: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.statement(stmt);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// One declaration while building an aligned block.
///
/// `original_*` keep the pre-resolution spelling for conversion bodies that
/// must address the ABI-literal field behind an ergonomic property.
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    pub ty: String,
    pub original_ty: String,
    pub name: String,
    pub original_name: String,
    pub init: Option<String>,
    pub comment: Option<String>,
    pub deprecated: bool,
}

impl Declaration {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        let ty = ty.into();
        let name = name.into();
        Self {
            original_ty: ty.clone(),
            original_name: name.clone(),
            ty,
            name,
            ..Self::default()
        }
    }

    pub fn with_init(mut self, init: Option<String>) -> Self {
        self.init = init;
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }
}

/// One row of an aligned block.
#[derive(Debug, Clone)]
pub enum DeclRow {
    /// Conditional-compilation guard, printed verbatim at column 0.
    Directive(String),
    /// Marshal or deprecation annotation printed on its own line.
    Attribute(String),
    /// A regular field declaration.
    Field(Declaration),
    /// One element of an unrolled fixed array.
    Unrolled(Declaration),
}

impl DeclRow {
    pub fn decl(&self) -> Option<&Declaration> {
        match self {
            DeclRow::Field(d) | DeclRow::Unrolled(d) => Some(d),
            _ => None,
        }
    }
}

/// Alignment columns of a declaration block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Type,
    Name,
    Init,
}

/// Ordered declarations plus the running maximum width of each column.
///
/// Widths update on append; directive and attribute rows never affect them.
/// Instances live for exactly one emitted block.
#[derive(Debug, Default)]
pub struct DeclarationList {
    rows: Vec<DeclRow>,
    widths: [usize; 3],
}

impl DeclarationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: DeclRow) {
        if let Some(decl) = row.decl() {
            self.widths[0] = self.widths[0].max(decl.ty.len());
            self.widths[1] = self.widths[1].max(decl.name.len());
            self.widths[2] = self.widths[2].max(decl.init.as_deref().map_or(0, str::len));
        }
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[DeclRow] {
        &self.rows
    }

    pub fn width(&self, column: Column) -> usize {
        self.widths[column as usize]
    }

    /// Padding after `text` so the next column starts at a shared offset:
    /// `max(1, width − len + 1)` blanks.
    pub fn spaces(&self, column: Column, text: &str) -> String {
        " ".repeat(self.widths[column as usize].saturating_sub(text.len()) + 1)
    }
}

/// Abbreviations kept fully uppercase when converting to pascal case.
const ABBREVIATIONS: &[&str] = &["CPU", "GPU"];

/// Convert a camelCase identifier to PascalCase.
pub fn pascal_case(ident: &str) -> String {
    for abbr in ABBREVIATIONS {
        if ident.len() >= abbr.len() && ident[..abbr.len()].eq_ignore_ascii_case(abbr) {
            return format!("{}{}", abbr, &ident[abbr.len()..]);
        }
    }
    let mut chars = ident.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Derive a header-guard fragment: an underscore before every run of
/// uppercase letters, then everything uppercased.
pub fn header_guard(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_upper = false;
    for ch in name.chars() {
        let upper = ch.is_ascii_uppercase();
        if upper && !prev_upper {
            out.push('_');
        }
        out.push(ch.to_ascii_uppercase());
        prev_upper = upper;
    }
    out
}

/// Name of the element-count field a dynamic array lowers to.
pub fn count_field_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => format!("num{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "num".to_string(),
    }
}
