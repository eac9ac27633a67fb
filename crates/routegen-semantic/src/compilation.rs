//! The bound view of a set of syntax trees.

use routegen_core::{BindError, DeclId, QualifiedName, TreeId};
use routegen_syntax::SyntaxTree;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::namespace_tree::NamespaceTree;
use crate::passes::{constructors, imports, inheritance, registration::RegistrationPass};
use crate::scope::{NameLookup, Resolved, Scope};
use crate::symbols::{SymbolId, TypeSymbol};

/// Every type declared across a set of trees, with bases and constructors
/// bound.
///
/// Building a compilation never fails: problems are recorded as diagnostics
/// and the affected declarations bind to less (or nothing).
#[derive(Debug, Default)]
pub struct Compilation {
    pub(crate) namespaces: NamespaceTree,
    pub(crate) symbols: Vec<TypeSymbol>,
    pub(crate) scopes: Vec<Scope>,
    pub(crate) decl_symbols: FxHashMap<(TreeId, DeclId), SymbolId>,
    pub(crate) diagnostics: Vec<(TreeId, BindError)>,
}

impl Compilation {
    /// Bind `trees`. The result owns everything it needs; the trees and their
    /// arena may be dropped afterwards.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn new(trees: &[SyntaxTree<'_>]) -> Self {
        let mut compilation = Self::default();

        let registration = RegistrationPass::new(&mut compilation).run(trees);
        let imports_bound = imports::bind_imports(&mut compilation, &registration.usings);
        inheritance::bind_bases(&mut compilation, &registration.decls);
        constructors::bind_constructors(&mut compilation, &registration.decls);
        let cycles = inheritance::check_cycles(&mut compilation);

        tracing::debug!(
            trees = trees.len(),
            types = registration.types_registered,
            partial_merges = registration.partial_merges,
            imports = imports_bound,
            cycles,
            diagnostics = compilation.diagnostics.len(),
            "compilation bound"
        );
        compilation
    }

    pub fn namespaces(&self) -> &NamespaceTree {
        &self.namespaces
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&TypeSymbol> {
        self.symbols.get(id.index())
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &TypeSymbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| (SymbolId::new(index as u32), symbol))
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// The symbol bound to a declaration, if it got one.
    pub fn symbol_for_decl(&self, tree: TreeId, decl: DeclId) -> Option<SymbolId> {
        self.decl_symbols.get(&(tree, decl)).copied()
    }

    /// Find a non-generic type by qualified name.
    pub fn lookup(&self, name: &QualifiedName) -> Option<SymbolId> {
        let mut path: Vec<&str> = name.qualifier.iter().map(String::as_str).collect();
        path.push(&name.name);
        let lookup = NameLookup::new(&self.namespaces, &self.symbols, &self.scopes);
        match lookup.lookup_path(self.namespaces.root(), &path)? {
            Resolved::Type(id) => Some(id),
            _ => None,
        }
    }

    /// Binder diagnostics, each with the tree it was reported in.
    pub fn diagnostics(&self) -> &[(TreeId, BindError)] {
        &self.diagnostics
    }

    /// Direct bases: the base class, then the interfaces.
    pub(crate) fn bases_of(&self, id: SymbolId) -> Vec<SymbolId> {
        let Some(symbol) = self.symbol(id) else {
            return Vec::new();
        };
        symbol
            .base_class
            .iter()
            .chain(symbol.interfaces.iter())
            .copied()
            .collect()
    }

    /// Every interface `id` implements, through base classes and base
    /// interfaces, in first-reached order. The type itself is not included.
    pub fn all_interface_symbols(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        let mut queue = std::collections::VecDeque::from(self.bases_of(id));
        seen.insert(id);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            if self.symbols[current.index()].is_interface() {
                order.push(current);
            }
            queue.extend(self.bases_of(current));
        }
        order
    }

    /// Name of an interface as matched against the marker contract.
    ///
    /// Generic interfaces carry their type parameter list in the simple name,
    /// so `IHandler<T>` never equals a non-generic `IHandler`.
    pub fn interface_name(&self, id: SymbolId) -> QualifiedName {
        let symbol = &self.symbols[id.index()];
        if symbol.is_generic() {
            let mut name = symbol.qualified.clone();
            name.name = format!("{}<{}>", symbol.name, symbol.type_params.join(", "));
            name
        } else {
            symbol.qualified.clone()
        }
    }
}
