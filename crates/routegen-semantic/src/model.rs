//! The semantic capabilities handler discovery consumes.

use routegen_core::{QualifiedName, TreeId};
use routegen_syntax::TypeDecl;
use rustc_hash::FxHashSet;

use crate::compilation::Compilation;
use crate::symbols::{ConstructorInfo, SymbolId};

/// Read-only semantic queries over one compilation.
///
/// Symbol arguments must come from the same model; passing a foreign
/// [`SymbolId`] may panic.
pub trait SemanticModel {
    /// The symbol a type declaration in `tree` binds to.
    fn declared_symbol(&self, tree: TreeId, decl: &TypeDecl<'_>) -> Option<SymbolId>;

    /// Simple name, without type parameters.
    fn symbol_name(&self, symbol: SymbolId) -> &str;

    /// Dotted name including namespaces and containing types.
    fn qualified_name(&self, symbol: SymbolId) -> &QualifiedName;

    /// Dotted containing namespace; empty for the global namespace.
    fn namespace_name(&self, symbol: SymbolId) -> String;

    fn is_generic(&self, symbol: SymbolId) -> bool;

    /// Every interface implemented directly or through bases.
    fn all_interfaces(&self, symbol: SymbolId) -> FxHashSet<QualifiedName>;

    fn containing_type(&self, symbol: SymbolId) -> Option<SymbolId>;

    /// Instance constructors in declaration order, implicit ones last.
    fn instance_constructors(&self, symbol: SymbolId) -> &[ConstructorInfo];
}

impl SemanticModel for Compilation {
    fn declared_symbol(&self, tree: TreeId, decl: &TypeDecl<'_>) -> Option<SymbolId> {
        self.symbol_for_decl(tree, decl.id)
    }

    fn symbol_name(&self, symbol: SymbolId) -> &str {
        &self.symbols[symbol.index()].name
    }

    fn qualified_name(&self, symbol: SymbolId) -> &QualifiedName {
        &self.symbols[symbol.index()].qualified
    }

    fn namespace_name(&self, symbol: SymbolId) -> String {
        self.namespaces
            .namespace_string(self.symbols[symbol.index()].namespace)
    }

    fn is_generic(&self, symbol: SymbolId) -> bool {
        self.symbols[symbol.index()].is_generic()
    }

    fn all_interfaces(&self, symbol: SymbolId) -> FxHashSet<QualifiedName> {
        self.all_interface_symbols(symbol)
            .into_iter()
            .map(|interface| self.interface_name(interface))
            .collect()
    }

    fn containing_type(&self, symbol: SymbolId) -> Option<SymbolId> {
        self.symbols[symbol.index()].containing
    }

    fn instance_constructors(&self, symbol: SymbolId) -> &[ConstructorInfo] {
        &self.symbols[symbol.index()].constructors
    }
}
