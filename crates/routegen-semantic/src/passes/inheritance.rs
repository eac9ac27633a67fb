//! Inheritance Pass (Pass 2) - resolve base lists, then reject cycles (Pass 4).
//!
//! For a class or record, a first base entry naming a non-interface type is
//! its base class; every entry naming an interface is a directly implemented
//! interface. Interfaces only collect interfaces. Entries naming type
//! parameters or non-inheritable types are dropped without a diagnostic. Enum
//! base lists name the underlying integral type and are not bound.

use routegen_core::BindError;
use routegen_syntax::TypeKind;

use crate::compilation::Compilation;
use crate::passes::registration::PendingDecl;
use crate::scope::{LookupContext, NameLookup, Resolved};
use crate::symbols::SymbolId;
use crate::type_resolver::TypeResolver;

#[derive(Debug, Default)]
struct BaseList {
    base_class: Option<SymbolId>,
    interfaces: Vec<SymbolId>,
}

/// Pass 2: bind every base list.
#[cfg_attr(feature = "profiling", profiling::function)]
pub(crate) fn bind_bases(compilation: &mut Compilation, decls: &[PendingDecl<'_>]) {
    let mut resolved = Vec::with_capacity(decls.len());
    let mut diagnostics = Vec::new();
    {
        let lookup = NameLookup::new(
            &compilation.namespaces,
            &compilation.symbols,
            &compilation.scopes,
        );
        let mut resolver = TypeResolver::new(lookup);

        for pending in decls {
            if pending.decl.kind == TypeKind::Enum {
                continue;
            }
            let ctx = LookupContext {
                scope: pending.scope,
                ty: Some(pending.symbol),
                in_base_list: true,
            };
            let owner_kind = compilation.symbols[pending.symbol.index()].kind;

            let mut list = BaseList::default();
            for (position, base) in pending.decl.bases.iter().enumerate() {
                let Some(Resolved::Type(target)) = resolver.resolve_base(&ctx, base) else {
                    continue;
                };
                let target_symbol = &compilation.symbols[target.index()];
                if target_symbol.is_interface() {
                    if !list.interfaces.contains(&target) {
                        list.interfaces.push(target);
                    }
                } else if position == 0
                    && matches!(owner_kind, TypeKind::Class | TypeKind::Record)
                    && target_symbol.kind == owner_kind
                {
                    list.base_class = Some(target);
                }
            }
            diagnostics.extend(
                resolver
                    .take_errors()
                    .into_iter()
                    .map(|error| (pending.tree, error)),
            );
            resolved.push((pending.symbol, list));
        }
    }

    compilation.diagnostics.extend(diagnostics);
    for (symbol, list) in resolved {
        let target = &mut compilation.symbols[symbol.index()];
        // Partial parts contribute to one symbol; the first base class wins.
        if target.base_class.is_none() {
            target.base_class = list.base_class;
        }
        for interface in list.interfaces {
            if !target.interfaces.contains(&interface) {
                target.interfaces.push(interface);
            }
        }
    }
}

/// Pass 4: cut every inheritance cycle.
///
/// Symbols are visited in registration order. A symbol that can reach itself
/// through its bases gets a `CircularInheritance` diagnostic and loses its
/// base list, which breaks the cycle for every other member.
#[cfg_attr(feature = "profiling", profiling::function)]
pub(crate) fn check_cycles(compilation: &mut Compilation) -> usize {
    let mut cut = 0;
    for index in 0..compilation.symbols.len() {
        let id = SymbolId::new(index as u32);
        if !reaches_itself(compilation, id) {
            continue;
        }

        let symbol = &mut compilation.symbols[index];
        symbol.base_class = None;
        symbol.interfaces.clear();
        if let Some(site) = symbol.primary_site() {
            let error = BindError::CircularInheritance {
                name: symbol.qualified.to_string(),
                span: site.span,
            };
            let tree = site.tree;
            compilation.diagnostics.push((tree, error));
        }
        cut += 1;
    }
    cut
}

fn reaches_itself(compilation: &Compilation, start: SymbolId) -> bool {
    let mut visited = vec![false; compilation.symbols.len()];
    let mut stack = compilation.bases_of(start);
    while let Some(current) = stack.pop() {
        if current == start {
            return true;
        }
        if std::mem::replace(&mut visited[current.index()], true) {
            continue;
        }
        stack.extend(compilation.bases_of(current));
    }
    false
}
