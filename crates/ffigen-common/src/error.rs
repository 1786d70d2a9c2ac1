//! Error types shared across the ffigen crates.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

/// Result type for translation operations.
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Errors that abort a translation run.
///
/// Every variant is an authoring inconsistency in the API description:
/// the run stops at the first one and no partial output unit is produced.
#[derive(Error, Debug, MietteDiagnostic)]
pub enum TranslateError {
    /// An aggregate initializer has a different number of sub-expressions
    /// than the target record has fields.
    #[error("initializer mismatch for '{record}': {exprs} expressions against {fields} fields")]
    #[diagnostic(
        code(ffigen::initializer_arity),
        help("the aggregate initializer must list one expression per record field, in field order")
    )]
    InitializerArity {
        record: String,
        exprs: usize,
        fields: usize,
    },

    /// An aggregate initializer targets a record that is not declared
    /// anywhere in the module.
    #[error("aggregate initializer targets unknown record '{0}'")]
    #[diagnostic(code(ffigen::unknown_record))]
    UnknownRecord(String),

    /// A generated flag entry name collides with an identifier already
    /// emitted in the same unit and the collision is not covered by the
    /// registry's suppression table.
    #[error("flag entry '{name}' in '{group}' collides with an existing identifier")]
    #[diagnostic(
        code(ffigen::flag_name_collision),
        help("add the generated name to the registry's suppressed flag entries to drop it deliberately")
    )]
    FlagNameCollision { name: String, group: String },

    /// A full-field constructor parameter has no default argument after
    /// the default argument list has already started.
    #[error("no initializer for parameter '{param}' in constructor '{record}', but default arguments already started")]
    #[diagnostic(code(ffigen::default_argument_gap))]
    DefaultArgumentGap { param: String, record: String },

    /// The API description handed across the JSON boundary does not decode.
    #[error("failed to decode API description: {0}")]
    #[diagnostic(code(ffigen::decode))]
    Decode(#[from] serde_json::Error),
}
