//! Opaque-handle structs and declared base/derived relation wiring.
//!
//! Every handle shares one pointer-sized representation, so each generated
//! conversion is a representation-preserving reinterpretation: a derived
//! kind gets a constructor upcasting to its base plus paired "as" accessors
//! in both directions. The relations come from the registry; nothing here
//! is specific to any particular handle set.

use ffigen_ir::{HandleRelation, Registry};

use crate::emit::Emitter;

/// Emit the handle structs of the managed format, wiring every declared
/// relation the interface participates in.
pub fn write_handles(e: &mut Emitter, registry: &Registry) {
    e.statement("/* ----- Handles ----- */");
    e.blank();

    for interface in &registry.interfaces {
        e.statement(&format!("public unsafe struct {}", interface));
        e.open_scope();
        e.statement("internal unsafe void* ptr;");
        for relation in &registry.relations {
            write_relation(e, interface, relation);
        }
        e.close_scope();
        e.blank();
    }

    e.blank();
}

fn write_relation(e: &mut Emitter, interface: &str, relation: &HandleRelation) {
    if relation.derived.iter().any(|d| d == interface) {
        write_ctor(e, interface, &relation.base);
        write_interpret(e, &relation.base);
    } else if interface == relation.base {
        for derived in &relation.derived {
            write_ctor(e, interface, derived);
            write_interpret(e, derived);
        }
    }
}

/// Constructor reinterpreting `other` as `interface`; total by declaration.
fn write_ctor(e: &mut Emitter, interface: &str, other: &str) {
    e.statement(&format!("public {}({} instance)", interface, other));
    e.open_scope();
    e.statement("ptr = instance.ptr;");
    e.close_scope();
}

fn write_interpret(e: &mut Emitter, target: &str) {
    e.statement(&format!("public {0} As{0}()", target));
    e.open_scope();
    e.statement(&format!("return new {}(this);", target));
    e.close_scope();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::EmitOptions;

    fn registry() -> Registry {
        Registry {
            interfaces: vec!["Resource".into(), "Buffer".into(), "Texture".into()],
            relations: vec![HandleRelation {
                base: "Resource".into(),
                derived: vec!["Buffer".into(), "Texture".into()],
            }],
            ..Registry::default()
        }
    }

    #[test]
    fn test_base_gets_ctor_and_accessor_per_derived_kind() {
        let mut e = Emitter::new(&EmitOptions::default());
        write_handles(&mut e, &registry());
        let out = e.finish();

        assert!(out.contains("public Resource(Buffer instance)"));
        assert!(out.contains("public Resource(Texture instance)"));
        assert!(out.contains("public Buffer AsBuffer()"));
        assert!(out.contains("public Texture AsTexture()"));
    }

    #[test]
    fn test_derived_gets_upcast_ctor_and_as_base() {
        let mut e = Emitter::new(&EmitOptions::default());
        write_handles(&mut e, &registry());
        let out = e.finish();

        assert!(out.contains("public Buffer(Resource instance)"));
        assert!(out.contains("public Resource AsResource()"));
    }

    #[test]
    fn test_conversions_copy_the_opaque_reference() {
        let mut e = Emitter::new(&EmitOptions::default());
        write_handles(&mut e, &registry());
        let out = e.finish();

        // Every ctor body is a plain pointer copy; the round trip through
        // base and back cannot change the reference value.
        let copies = out.matches("ptr = instance.ptr;").count();
        assert_eq!(copies, 4);
    }
}
