//! Declaration-shape fingerprints.
//!
//! The shape of a file is everything name binding and handler discovery can
//! observe: using directives, namespace nesting, and for each type its kind,
//! modifiers, name, type parameters, base list, and constructor signatures.
//! Member bodies, fields, properties, methods, comments, and positions are left
//! out, so editing a method body leaves the shape unchanged.

use routegen_core::{Fingerprint, FingerprintBuilder};

use crate::ast::{CompilationUnit, Item, Member, Param, TypeDecl, UsingDirective};

mod tags {
    pub const USING: u8 = 1;
    pub const NAMESPACE: u8 = 2;
    pub const TYPE: u8 = 3;
    pub const CONSTRUCTOR: u8 = 4;
    pub const PRIMARY_CONSTRUCTOR: u8 = 5;
    pub const END: u8 = 6;
}

/// Fingerprint the declaration shape of a parsed file.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn shape_fingerprint(unit: &CompilationUnit<'_>) -> Fingerprint {
    let mut builder = FingerprintBuilder::new();
    write_usings(&mut builder, unit.usings);
    write_items(&mut builder, unit.items);
    builder.finish()
}

fn write_usings(builder: &mut FingerprintBuilder, usings: &[UsingDirective<'_>]) {
    for using in usings {
        builder
            .tag(tags::USING)
            .str(&using.path_string())
            .str(using.alias.map_or("", |alias| alias.name))
            .u64(u64::from(using.is_static) | (u64::from(using.is_global) << 1));
    }
}

fn write_items(builder: &mut FingerprintBuilder, items: &[Item<'_>]) {
    for item in items {
        match item {
            Item::Namespace(ns) => {
                builder
                    .tag(tags::NAMESPACE)
                    .str(&ns.path_string())
                    .u64(u64::from(ns.file_scoped));
                write_usings(builder, ns.usings);
                write_items(builder, ns.items);
                builder.tag(tags::END);
            }
            Item::Type(decl) => write_type(builder, decl),
        }
    }
}

fn write_type(builder: &mut FingerprintBuilder, decl: &TypeDecl<'_>) {
    builder
        .tag(tags::TYPE)
        .str(decl.kind.as_str())
        .u64(u64::from(decl.modifiers.bits()))
        .str(decl.name.name)
        .strs(decl.type_params.iter().map(|p| p.name))
        .strs(decl.bases.iter().map(|b| b.to_string()));

    if let Some(params) = decl.primary_ctor {
        builder.tag(tags::PRIMARY_CONSTRUCTOR);
        write_params(builder, params);
    }

    for member in decl.members {
        match member {
            Member::Constructor(ctor) => {
                builder
                    .tag(tags::CONSTRUCTOR)
                    .u64(u64::from(ctor.modifiers.bits()));
                write_params(builder, ctor.params);
            }
            Member::Type(nested) => write_type(builder, nested),
            Member::Method(_) | Member::Field(_) | Member::Property(_) => {}
        }
    }

    builder.tag(tags::END);
}

fn write_params(builder: &mut FingerprintBuilder, params: &[Param<'_>]) {
    builder.u64(params.len() as u64);
    for param in params {
        builder
            .u64(u64::from(param.modifiers.bits()))
            .str(&param.ty.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;
    use bumpalo::Bump;

    fn shape(source: &str) -> Fingerprint {
        let arena = Bump::new();
        let unit = Parser::parse(source, &arena).unwrap();
        shape_fingerprint(&unit)
    }

    const BASE: &str = r#"
        namespace App;
        public class GetTime
        {
            public class Handler : IEndpoint
            {
                public Handler(IClock clock) { }
                public void MapEndpoint(IEndpointRouteBuilder endpoints) { endpoints.MapGet("/", () => 1); }
            }
        }
    "#;

    #[test]
    fn body_and_comment_edits_keep_shape() {
        let edited = BASE
            .replace("() => 1", "() => 2")
            .replace("namespace App;", "// routes\nnamespace App;");
        assert_eq!(shape(BASE), shape(&edited));
    }

    #[test]
    fn method_signature_edits_keep_shape() {
        let edited = BASE.replace("public void MapEndpoint", "public void MapEndpoint2");
        assert_eq!(shape(BASE), shape(&edited));
    }

    #[test]
    fn declaration_edits_change_shape() {
        assert_ne!(shape(BASE), shape(&BASE.replace("Handler : IEndpoint", "Handler")));
        assert_ne!(shape(BASE), shape(&BASE.replace("IClock clock", "IClock clock, int n")));
        assert_ne!(shape(BASE), shape(&BASE.replace("namespace App;", "namespace App.V2;")));
        assert_ne!(
            shape(BASE),
            shape(&BASE.replace("namespace App;", "namespace App;\nusing App.Time;"))
        );
    }

    #[test]
    fn nesting_is_part_of_the_shape() {
        assert_ne!(
            shape("class A { class B {} } class C {}"),
            shape("class A { } class B {} class C {}")
        );
    }
}
