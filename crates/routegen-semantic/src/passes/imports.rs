//! Import Pass (Pass 1b) - bind using directives.
//!
//! Targets are resolved from the namespace the directive is written in,
//! outward to the root. Namespaces this compilation never declares (framework
//! namespaces, for instance) have nothing to import and are skipped quietly.
//!
//! `global using N;` becomes a `Uses` edge on the root namespace. Global
//! aliases and global static imports are copied into every file scope.

use crate::compilation::Compilation;
use crate::passes::registration::PendingUsing;
use crate::scope::{AliasTarget, NameLookup, Resolved, ScopeId};

enum Binding {
    Import(Resolved),
    Static(Resolved),
    Alias(String, AliasTarget),
}

pub(crate) fn bind_imports(compilation: &mut Compilation, usings: &[PendingUsing<'_>]) -> usize {
    let bindings: Vec<(ScopeId, bool, Binding)> = {
        let lookup = NameLookup::new(
            &compilation.namespaces,
            &compilation.symbols,
            &compilation.scopes,
        );
        usings
            .iter()
            .filter_map(|pending| {
                let using = pending.using;
                let from = compilation.scopes[pending.scope.index()].namespace;
                let path: Vec<&str> = using.path.iter().map(|ident| ident.name).collect();
                let target = lookup.lookup_path(from, &path);

                let binding = match (using.alias, target) {
                    (Some(alias), Some(Resolved::Namespace(node))) => {
                        Binding::Alias(alias.name.to_string(), AliasTarget::Namespace(node))
                    }
                    (Some(alias), Some(Resolved::Type(id))) => {
                        Binding::Alias(alias.name.to_string(), AliasTarget::Type(id))
                    }
                    (Some(alias), _) => Binding::Alias(
                        alias.name.to_string(),
                        AliasTarget::Unresolved(using.path_string()),
                    ),
                    (None, Some(resolved)) if using.is_static => Binding::Static(resolved),
                    (None, Some(resolved)) => Binding::Import(resolved),
                    (None, None) => {
                        tracing::trace!(
                            namespace = %using.path_string(),
                            tree = pending.tree.index(),
                            "using directive names nothing declared in this compilation"
                        );
                        return None;
                    }
                };
                Some((pending.scope, using.is_global, binding))
            })
            .collect()
    };

    let file_scopes: Vec<ScopeId> = compilation
        .scopes
        .iter()
        .enumerate()
        .filter(|(_, scope)| scope.is_file_scope())
        .map(|(index, _)| ScopeId::new(index as u32))
        .collect();

    let bound = bindings.len();
    for (scope, is_global, binding) in bindings {
        match (binding, is_global) {
            (Binding::Import(Resolved::Namespace(node)), true) => {
                let root = compilation.namespaces.root();
                compilation.namespaces.add_using_directive(root, node);
            }
            (Binding::Import(Resolved::Namespace(node)), false) => {
                let imports = &mut compilation.scopes[scope.index()].imports;
                if !imports.contains(&node) {
                    imports.push(node);
                }
            }
            (Binding::Import(_), _) => {}
            (Binding::Static(Resolved::Type(id)), global) => {
                let targets = if global { file_scopes.clone() } else { vec![scope] };
                for target in targets {
                    compilation.scopes[target.index()].static_imports.push(id);
                }
            }
            (Binding::Static(_), _) => {}
            (Binding::Alias(name, target), global) => {
                let targets = if global { file_scopes.clone() } else { vec![scope] };
                for scope in targets {
                    compilation.scopes[scope.index()]
                        .aliases
                        .entry(name.clone())
                        .or_insert_with(|| target.clone());
                }
            }
        }
    }
    bound
}
