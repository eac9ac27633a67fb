//! Constructor Pass (Pass 3) - collect instance constructors.
//!
//! Explicit constructors are kept in declaration order, with a primary
//! constructor first. Static constructors are not instance constructors.
//! After all parts of a type are seen, implicit constructors are added:
//!
//! - a class or record with no explicit constructor gets a parameterless one
//! - a struct always has a parameterless one unless it declares its own
//! - a record class gets a copy constructor taking the record itself
//!
//! Static classes, interfaces, and enums have none.

use routegen_syntax::{Param, TypeKind};

use crate::compilation::Compilation;
use crate::passes::registration::PendingDecl;
use crate::scope::{LookupContext, NameLookup};
use crate::symbols::ConstructorInfo;
use crate::type_resolver::TypeResolver;

#[cfg_attr(feature = "profiling", profiling::function)]
pub(crate) fn bind_constructors(compilation: &mut Compilation, decls: &[PendingDecl<'_>]) {
    let mut collected = Vec::new();
    let mut diagnostics = Vec::new();
    let mut copy_ctor_params = Vec::new();
    {
        let lookup = NameLookup::new(
            &compilation.namespaces,
            &compilation.symbols,
            &compilation.scopes,
        );
        let mut resolver = TypeResolver::new(lookup);

        for pending in decls {
            let decl = pending.decl;
            if !decl.kind.is_class_like() {
                continue;
            }
            let ctx = LookupContext {
                scope: pending.scope,
                ty: Some(pending.symbol),
                in_base_list: false,
            };

            let display = |resolver: &mut TypeResolver<'_>, params: &[Param<'_>]| -> Vec<String> {
                params.iter().map(|p| resolver.display(&ctx, &p.ty)).collect()
            };

            let mut explicit = Vec::new();
            if let Some(params) = decl.primary_ctor {
                explicit.push(ConstructorInfo::explicit(display(&mut resolver, params)));
            }
            for ctor in decl.constructors().filter(|ctor| !ctor.is_static()) {
                explicit.push(ConstructorInfo::explicit(display(&mut resolver, ctor.params)));
            }

            if decl.kind == TypeKind::Record {
                copy_ctor_params.push((pending.symbol, resolver.display_symbol(pending.symbol, &[])));
            }

            diagnostics.extend(
                resolver
                    .take_errors()
                    .into_iter()
                    .map(|error| (pending.tree, error)),
            );
            collected.push((pending.symbol, explicit));
        }
    }

    compilation.diagnostics.extend(diagnostics);
    for (symbol, explicit) in collected {
        compilation.symbols[symbol.index()]
            .constructors
            .extend(explicit);
    }

    for symbol in &mut compilation.symbols {
        if !symbol.kind.is_class_like() || symbol.is_static() {
            continue;
        }
        let has_parameterless = symbol
            .constructors
            .iter()
            .any(|ctor| ctor.parameters.is_empty());
        let needs_default = match symbol.kind {
            TypeKind::Struct | TypeKind::RecordStruct => !has_parameterless,
            _ => symbol.constructors.is_empty(),
        };
        if needs_default {
            symbol.constructors.push(ConstructorInfo::implicit(Vec::new()));
        }
    }

    for (symbol, own_type) in copy_ctor_params {
        let record = &mut compilation.symbols[symbol.index()];
        let copy = vec![own_type];
        if !record.constructors.iter().any(|ctor| ctor.parameters == copy) {
            record.constructors.push(ConstructorInfo::implicit(copy));
        }
    }
}
