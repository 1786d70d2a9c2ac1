//! Translation driver: orchestrates (module, backend) runs over one
//! immutable API description.
//!
//! Each run is synchronous, single-pass and owns its emitter, so
//! independent runs are safely parallelizable by the caller; only the
//! line order within one unit is semantically significant. A run either
//! yields one complete output unit or fails on the first authoring
//! inconsistency with no partial output.

use ffigen_codegen::{translate_c99, translate_managed, EmitOptions, Unit};
use ffigen_common::TranslateError;
use ffigen_ir::{Module, Program, Registry};
use miette::Result;
use smol_str::SmolStr;

/// One target output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// ABI-literal, C-like header format.
    C99,
    /// Managed-style interop binding format.
    Managed,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::C99, Backend::Managed];
}

/// One emitted output unit, labeled with its origin.
#[derive(Debug)]
pub struct GeneratedUnit {
    pub module: SmolStr,
    pub backend: Backend,
    pub text: String,
    pub warnings: Vec<ffigen_common::Diagnostic>,
}

/// Orchestrates translation runs with a fixed per-run configuration.
pub struct Driver {
    options: EmitOptions,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            options: EmitOptions::default(),
        }
    }

    pub fn with_options(options: EmitOptions) -> Self {
        Self { options }
    }

    /// Decode an API description handed across the JSON boundary.
    pub fn load_program(json: &str) -> Result<Program> {
        let program = serde_json::from_str(json).map_err(TranslateError::Decode)?;
        Ok(program)
    }

    /// Run one (module, backend) translation.
    pub fn translate_module(
        &self,
        module: &Module,
        registry: &Registry,
        backend: Backend,
    ) -> Result<Unit> {
        let unit = match backend {
            Backend::C99 => translate_c99(module, registry, &self.options)?,
            Backend::Managed => translate_managed(module, registry, &self.options)?,
        };
        Ok(unit)
    }

    /// Translate every module of a program for each requested backend,
    /// in program order.
    pub fn translate_program(
        &self,
        program: &Program,
        backends: &[Backend],
    ) -> Result<Vec<GeneratedUnit>> {
        let mut units = Vec::with_capacity(program.modules.len() * backends.len());
        for module in &program.modules {
            for &backend in backends {
                let unit = self.translate_module(module, &program.registry, backend)?;
                units.push(GeneratedUnit {
                    module: module.name.clone(),
                    backend,
                    text: unit.text,
                    warnings: unit.warnings,
                });
            }
        }
        Ok(units)
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffigen_ir::{BaseType, EnumDef, EnumEntry, Field, Record, TypeRef};

    fn sample_program() -> Program {
        let mut module = Module::new("RenderSystem");
        module.enums.push(EnumDef {
            name: "Format".into(),
            base: None,
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
            name: "Extent2D".into(),
            fields: vec![
                Field::new("width", TypeRef::scalar(BaseType::Uint32)).with_init("0"),
                Field::new("height", TypeRef::scalar(BaseType::Uint32)),
            ],
        });

        let mut program = Program::default();
        program.registry.type_prefix = "XG".into();
        program.modules.push(module);
        program
    }

    #[test]
    fn test_translate_program_yields_one_unit_per_pair() {
        let program = sample_program();
        let driver = Driver::new();
        let units = driver
            .translate_program(&program, &Backend::ALL)
            .expect("translation failed");

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].backend, Backend::C99);
        assert_eq!(units[1].backend, Backend::Managed);
        assert!(units[0].text.contains("typedef enum XGFormat"));
        assert!(units[1].text.contains("public enum Format"));
    }

    #[test]
    fn test_identical_runs_are_byte_identical() {
        let program = sample_program();
        let driver = Driver::new();

        let first = driver
            .translate_module(&program.modules[0], &program.registry, Backend::Managed)
            .unwrap();
        let second = driver
            .translate_module(&program.modules[0], &program.registry, Backend::Managed)
            .unwrap();
        assert_eq!(first.text, second.text);
    }

    #[test]
    fn test_load_program_from_json() {
        let json = r#"{
            "modules": [
                {
                    "name": "Core",
                    "structs": [
                        {
                            "name": "Extent2D",
                            "fields": [
                                { "name": "width",  "type": { "base": "uint32" } },
                                { "name": "height", "type": { "base": "uint32" } }
                            ]
                        }
                    ]
                }
            ],
            "registry": { "type_prefix": "XG" }
        }"#;

        let program = Driver::load_program(json).expect("decode failed");
        assert_eq!(program.modules.len(), 1);
        assert_eq!(program.modules[0].structs[0].fields.len(), 2);
        assert_eq!(program.registry.type_prefix, "XG");
    }

    #[test]
    fn test_load_program_rejects_malformed_input() {
        assert!(Driver::load_program("{ not json }").is_err());
    }
}
