//! Hand-built semantic model for unit tests.

use routegen_core::{QualifiedName, TreeId};
use routegen_semantic::{ConstructorInfo, SemanticModel, SymbolId};
use routegen_syntax::TypeDecl;
use rustc_hash::{FxHashMap, FxHashSet};

struct MockSymbol {
    name: String,
    namespace: String,
    qualified: QualifiedName,
    containing: Option<SymbolId>,
    generic: bool,
    interfaces: FxHashSet<QualifiedName>,
    constructors: Vec<ConstructorInfo>,
}

/// A model whose answers are set up by the test. Declarations bind by
/// `(tree, simple name)`.
#[derive(Default)]
pub(crate) struct MockModel {
    symbols: Vec<MockSymbol>,
    bindings: FxHashMap<(TreeId, String), SymbolId>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, namespace: &str, containing: Option<SymbolId>) -> SymbolId {
        let qualified = match containing {
            Some(outer) => self.symbols[outer.index()].qualified.child(name),
            None if namespace.is_empty() => QualifiedName::global(name),
            None => QualifiedName::parse(namespace).child(name),
        };
        let id = SymbolId::new(self.symbols.len() as u32);
        self.symbols.push(MockSymbol {
            name: name.to_string(),
            namespace: namespace.to_string(),
            qualified,
            containing,
            generic: false,
            interfaces: FxHashSet::default(),
            constructors: vec![ConstructorInfo::implicit(Vec::new())],
        });
        id
    }

    pub fn implements(&mut self, symbol: SymbolId, interface: &str) {
        self.symbols[symbol.index()]
            .interfaces
            .insert(QualifiedName::parse(interface));
    }

    pub fn generic(&mut self, symbol: SymbolId) {
        self.symbols[symbol.index()].generic = true;
    }

    pub fn constructors(&mut self, symbol: SymbolId, constructors: Vec<ConstructorInfo>) {
        self.symbols[symbol.index()].constructors = constructors;
    }

    pub fn bind(&mut self, tree: TreeId, decl_name: &str, symbol: SymbolId) {
        self.bindings.insert((tree, decl_name.to_string()), symbol);
    }
}

impl SemanticModel for MockModel {
    fn declared_symbol(&self, tree: TreeId, decl: &TypeDecl<'_>) -> Option<SymbolId> {
        self.bindings.get(&(tree, decl.name.name.to_string())).copied()
    }

    fn symbol_name(&self, symbol: SymbolId) -> &str {
        &self.symbols[symbol.index()].name
    }

    fn qualified_name(&self, symbol: SymbolId) -> &QualifiedName {
        &self.symbols[symbol.index()].qualified
    }

    fn namespace_name(&self, symbol: SymbolId) -> String {
        self.symbols[symbol.index()].namespace.clone()
    }

    fn is_generic(&self, symbol: SymbolId) -> bool {
        self.symbols[symbol.index()].generic
    }

    fn all_interfaces(&self, symbol: SymbolId) -> FxHashSet<QualifiedName> {
        self.symbols[symbol.index()].interfaces.clone()
    }

    fn containing_type(&self, symbol: SymbolId) -> Option<SymbolId> {
        self.symbols[symbol.index()].containing
    }

    fn instance_constructors(&self, symbol: SymbolId) -> &[ConstructorInfo] {
        &self.symbols[symbol.index()].constructors
    }
}
