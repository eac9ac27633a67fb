//! Registration Pass (Pass 1) - create a symbol for every type declaration.
//!
//! Walks every tree, opens a scope per file and per namespace declaration,
//! and registers each type in its namespace or containing type. Base lists,
//! using directives, and constructors are only collected here; later passes
//! resolve them once every type is known, so forward references work.
//!
//! Partial declarations of the same kind merge into one symbol. Any other
//! repeat of a qualified name keeps the first declaration and reports
//! `DuplicateType`; the repeat and everything nested in it get no symbol.

use petgraph::graph::NodeIndex;
use routegen_core::{BindError, QualifiedName, TreeId};
use routegen_syntax::{Item, Modifiers, SyntaxTree, TypeDecl, UsingDirective};
use rustc_hash::FxHashMap;

use crate::compilation::Compilation;
use crate::scope::{Scope, ScopeId};
use crate::symbols::{DeclSite, SymbolId, TypeKey, TypeSymbol};

/// A registered declaration waiting for base and constructor binding.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PendingDecl<'ast> {
    pub tree: TreeId,
    pub decl: &'ast TypeDecl<'ast>,
    pub symbol: SymbolId,
    pub scope: ScopeId,
}

/// A using directive waiting for its target to be bound.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PendingUsing<'ast> {
    pub tree: TreeId,
    pub using: &'ast UsingDirective<'ast>,
    pub scope: ScopeId,
}

/// Output of the registration pass.
#[derive(Debug, Default)]
pub(crate) struct RegistrationOutput<'ast> {
    pub types_registered: usize,
    pub partial_merges: usize,
    pub decls: Vec<PendingDecl<'ast>>,
    pub usings: Vec<PendingUsing<'ast>>,
}

/// Pass 1: register all type declarations.
pub(crate) struct RegistrationPass<'c, 'ast> {
    compilation: &'c mut Compilation,
    output: RegistrationOutput<'ast>,
}

impl<'c, 'ast> RegistrationPass<'c, 'ast> {
    pub fn new(compilation: &'c mut Compilation) -> Self {
        Self {
            compilation,
            output: RegistrationOutput::default(),
        }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, trees: &[SyntaxTree<'ast>]) -> RegistrationOutput<'ast> {
        for tree in trees {
            let root = self.compilation.namespaces.root();
            let scope = self.push_scope(root, None);
            let unit = tree.unit();
            self.collect_usings(tree.id(), scope, unit.usings);
            self.register_items(tree.id(), scope, root, unit.items);
        }
        self.output
    }

    fn push_scope(&mut self, namespace: NodeIndex, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId::new(self.compilation.scopes.len() as u32);
        self.compilation.scopes.push(Scope::new(namespace, parent));
        id
    }

    fn collect_usings(&mut self, tree: TreeId, scope: ScopeId, usings: &'ast [UsingDirective<'ast>]) {
        self.output
            .usings
            .extend(usings.iter().map(|using| PendingUsing { tree, using, scope }));
    }

    fn register_items(
        &mut self,
        tree: TreeId,
        scope: ScopeId,
        namespace: NodeIndex,
        items: &'ast [Item<'ast>],
    ) {
        for item in items {
            match item {
                Item::Namespace(decl) => {
                    let path: Vec<&str> = decl.path.iter().map(|ident| ident.name).collect();
                    let node = self
                        .compilation
                        .namespaces
                        .get_or_create_path(namespace, &path);
                    let inner = self.push_scope(node, Some(scope));
                    self.collect_usings(tree, inner, decl.usings);
                    self.register_items(tree, inner, node, decl.items);
                }
                Item::Type(decl) => self.register_type(tree, scope, namespace, None, decl),
            }
        }
    }

    fn register_type(
        &mut self,
        tree: TreeId,
        scope: ScopeId,
        namespace: NodeIndex,
        containing: Option<SymbolId>,
        decl: &'ast TypeDecl<'ast>,
    ) {
        let key = TypeKey::new(decl.name.name, decl.type_params.len());
        let site = DeclSite {
            tree,
            decl: decl.id,
            span: decl.name.span,
        };

        let existing = match containing {
            Some(outer) => self.compilation.symbols[outer.index()]
                .nested
                .get(&key)
                .copied(),
            None => self.compilation.namespaces.get_type(namespace, &key),
        };

        let symbol = match existing {
            Some(previous) => {
                let prior = &mut self.compilation.symbols[previous.index()];
                if !(prior.is_partial()
                    && decl.modifiers.contains(Modifiers::PARTIAL)
                    && prior.kind == decl.kind)
                {
                    let error = BindError::DuplicateType {
                        name: prior.qualified.to_string(),
                        span: decl.name.span,
                    };
                    self.compilation.diagnostics.push((tree, error));
                    return;
                }
                prior.sites.push(site);
                prior.modifiers |= decl.modifiers;
                self.output.partial_merges += 1;
                previous
            }
            None => {
                let id = SymbolId::new(self.compilation.symbols.len() as u32);
                let qualified = match containing {
                    Some(outer) => self.compilation.symbols[outer.index()]
                        .qualified
                        .child(decl.name.name),
                    None => QualifiedName::new(
                        decl.name.name,
                        self.compilation.namespaces.get_namespace_path(namespace),
                    ),
                };
                self.compilation.symbols.push(TypeSymbol {
                    name: decl.name.name.to_string(),
                    kind: decl.kind,
                    modifiers: decl.modifiers,
                    qualified,
                    namespace,
                    containing,
                    type_params: decl.type_params.iter().map(|p| p.name.to_string()).collect(),
                    sites: vec![site],
                    base_class: None,
                    interfaces: Vec::new(),
                    constructors: Vec::new(),
                    nested: FxHashMap::default(),
                });
                match containing {
                    Some(outer) => {
                        self.compilation.symbols[outer.index()]
                            .nested
                            .insert(key, id);
                    }
                    None => {
                        // Checked above, so the key is free.
                        let _ = self.compilation.namespaces.register_type(namespace, key, id);
                    }
                }
                self.output.types_registered += 1;
                id
            }
        };

        self.compilation.decl_symbols.insert((tree, decl.id), symbol);
        self.output.decls.push(PendingDecl {
            tree,
            decl,
            symbol,
            scope,
        });

        for nested in decl.nested_types() {
            self.register_type(tree, scope, namespace, Some(symbol), nested);
        }
    }
}
